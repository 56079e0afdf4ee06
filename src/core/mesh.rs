// Copyright @yucwang 2026

use crate::core::error::MeshError;
use crate::core::normals::estimate_adjacency_normals;
use crate::math::aabb::AABB;
use crate::math::constants::{ Vector2f, Vector3f, Vector4f };

pub type TriangleIndices = [u32; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Normal,
    Color,
    TexCoord,
}

impl AttributeKind {
    pub fn components(&self) -> usize {
        match self {
            AttributeKind::Normal => 3,
            AttributeKind::Color => 4,
            AttributeKind::TexCoord => 2,
        }
    }
}

/// Per-vertex data other than position.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Normal(Vec<Vector3f>),
    Color(Vec<Vector4f>),
    TexCoord(Vec<Vector2f>),
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Normal(_) => AttributeKind::Normal,
            Attribute::Color(_) => AttributeKind::Color,
            Attribute::TexCoord(_) => AttributeKind::TexCoord,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Attribute::Normal(v) => v.len(),
            Attribute::Color(v) => v.len(),
            Attribute::TexCoord(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flatten_into(&self, out: &mut Vec<f32>) {
        out.reserve(self.len() * self.kind().components());
        match self {
            Attribute::Normal(v) => v.iter().for_each(|n| out.extend_from_slice(n.as_slice())),
            Attribute::Color(v) => v.iter().for_each(|c| out.extend_from_slice(c.as_slice())),
            Attribute::TexCoord(v) => v.iter().for_each(|t| out.extend_from_slice(t.as_slice())),
        }
    }
}

/// Positions, per-vertex attributes in declared order, and triangles.
///
/// Every triangle index is in bounds and every attribute has one entry per
/// position. Both are checked whenever the mesh is built or extended.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vector3f>,
    attributes: Vec<Attribute>,
    triangles: Vec<TriangleIndices>,
}

impl Mesh {
    pub fn new(positions: Vec<Vector3f>, triangles: Vec<TriangleIndices>) -> Result<Self, MeshError> {
        let vertex_count = positions.len();
        if let Some((idx, tri)) = triangles
            .iter()
            .enumerate()
            .find(|(_, tri)| tri.iter().any(|&v| v as usize >= vertex_count))
        {
            return Err(MeshError::invalid(format!(
                "triangle {} {:?} references a vertex outside 0..{}",
                idx, tri, vertex_count
            )));
        }

        Ok(Self { positions, attributes: Vec::new(), triangles })
    }

    /// Adds an attribute, or replaces the existing attribute of the same kind
    /// while keeping its slot in the declared order.
    pub fn set_attribute(&mut self, attribute: Attribute) -> Result<(), MeshError> {
        if attribute.len() != self.positions.len() {
            return Err(MeshError::invalid(format!(
                "{:?} attribute has {} entries for {} vertices",
                attribute.kind(),
                attribute.len(),
                self.positions.len()
            )));
        }

        let kind = attribute.kind();
        match self.attributes.iter_mut().find(|a| a.kind() == kind) {
            Some(slot) => *slot = attribute,
            None => self.attributes.push(attribute),
        }
        Ok(())
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Result<Self, MeshError> {
        self.set_attribute(attribute)?;
        Ok(self)
    }

    pub fn attribute(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.kind() == kind)
    }

    pub fn has_attribute(&self, kind: AttributeKind) -> bool {
        self.attribute(kind).is_some()
    }

    pub fn normals(&self) -> Option<&[Vector3f]> {
        match self.attribute(AttributeKind::Normal) {
            Some(Attribute::Normal(n)) => Some(n),
            _ => None,
        }
    }

    /// Estimates normals from triangle adjacency and installs them.
    pub fn add_adjacency_normals(&mut self) -> Result<(), MeshError> {
        let normals = estimate_adjacency_normals(&self.positions, &self.triangles);
        self.set_attribute(Attribute::Normal(normals))
    }

    pub fn positions(&self) -> &[Vector3f] {
        &self.positions
    }

    /// Positions may move freely; the vertex count is fixed.
    pub fn positions_mut(&mut self) -> &mut [Vector3f] {
        &mut self.positions
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn triangles(&self) -> &[TriangleIndices] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bounding_box(&self) -> AABB {
        AABB::from_points(&self.positions)
    }
}
