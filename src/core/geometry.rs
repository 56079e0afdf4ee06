// Copyright @yucwang 2026

use crate::core::mesh::{ AttributeKind, Mesh };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
}

/// One flattened per-vertex attribute and the shader location it binds to.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBuffer {
    pub kind: AttributeKind,
    pub location: u32,
    pub components: usize,
    pub data: Vec<f32>,
}

/// Renderer-ready flattening of a mesh. Positions bind to location 0 and the
/// remaining attributes follow in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBundle {
    pub mode: DrawMode,
    pub positions: Vec<f32>,
    pub attributes: Vec<AttributeBuffer>,
    pub indices: Vec<u32>,
    pub triangle_count: usize,
}

impl GeometryBundle {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut positions = Vec::with_capacity(mesh.vertex_count() * 3);
        for p in mesh.positions() {
            positions.extend_from_slice(p.as_slice());
        }

        let attributes = mesh
            .attributes()
            .iter()
            .enumerate()
            .map(|(slot, attribute)| {
                let mut data = Vec::new();
                attribute.flatten_into(&mut data);
                AttributeBuffer {
                    kind: attribute.kind(),
                    location: slot as u32 + 1,
                    components: attribute.kind().components(),
                    data,
                }
            })
            .collect();

        let indices: Vec<u32> = mesh.triangles().iter().flat_map(|t| t.iter().copied()).collect();

        Self {
            mode: DrawMode::Triangles,
            positions,
            attributes,
            indices,
            triangle_count: mesh.triangle_count(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Element count for an indexed draw call.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn attribute(&self, kind: AttributeKind) -> Option<&AttributeBuffer> {
        self.attributes.iter().find(|a| a.kind == kind)
    }
}
