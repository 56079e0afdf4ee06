// Copyright @yucwang 2026

use crate::core::error::MeshError;
use crate::core::mesh::{ Attribute, Mesh };
use crate::core::normals::estimate_grid_normals;
use crate::math::constants::Float;

/// Indices of the four lattice neighbors of a vertex. A missing neighbor on
/// the boundary is replaced by the vertex itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridNeighbors {
    pub north: usize,
    pub south: usize,
    pub west: usize,
    pub east: usize,
}

/// A mesh whose positions form a `resolution x resolution` lattice, stored
/// row-major: `row = i / resolution`, `col = i % resolution`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    mesh: Mesh,
    resolution: usize,
}

impl Grid {
    pub(crate) fn from_mesh(mesh: Mesh, resolution: usize) -> Result<Self, MeshError> {
        if mesh.vertex_count() != resolution * resolution {
            return Err(MeshError::invalid(format!(
                "grid of resolution {} needs {} vertices, got {}",
                resolution,
                resolution * resolution,
                mesh.vertex_count()
            )));
        }
        Ok(Self { mesh, resolution })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    pub fn neighbors(&self, i: usize) -> GridNeighbors {
        let r = self.resolution;
        let row = i / r;
        let col = i % r;

        GridNeighbors {
            north: if row == 0 { i } else { i - r },
            south: if row == r - 1 { i } else { i + r },
            west: if col == 0 { i } else { i - 1 },
            east: if col == r - 1 { i } else { i + 1 },
        }
    }

    pub fn height(&self, i: usize) -> Float {
        self.mesh.positions()[i].y
    }

    /// Lowest and highest vertex height.
    pub fn height_range(&self) -> (Float, Float) {
        let bound = self.mesh.bounding_box();
        (bound.p_min.y, bound.p_max.y)
    }

    /// Estimates lattice normals and installs them as the normal attribute.
    pub fn add_normals(&mut self) -> Result<(), MeshError> {
        let normals = estimate_grid_normals(self);
        self.mesh.set_attribute(Attribute::Normal(normals))
    }
}

#[cfg(test)]
mod tests {
    use crate::shapes::grid::generate_grid;

    #[test]
    fn test_interior_neighbors() {
        let grid = generate_grid(4).unwrap();
        let n = grid.neighbors(5);
        assert_eq!((n.north, n.south, n.west, n.east), (1, 9, 4, 6));
    }

    #[test]
    fn test_boundary_self_substitution() {
        let grid = generate_grid(3).unwrap();

        let corner = grid.neighbors(0);
        assert_eq!((corner.north, corner.south, corner.west, corner.east), (0, 3, 0, 1));

        let far_corner = grid.neighbors(8);
        assert_eq!((far_corner.north, far_corner.south, far_corner.west, far_corner.east), (5, 8, 7, 8));
    }

    #[test]
    fn test_flat_height_range() {
        let grid = generate_grid(5).unwrap();
        assert_eq!(grid.height_range(), (0.0, 0.0));
    }
}
