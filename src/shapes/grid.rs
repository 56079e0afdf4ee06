// Copyright @yucwang 2026

use crate::core::error::MeshError;
use crate::core::grid::Grid;
use crate::core::mesh::{ Attribute, Mesh, TriangleIndices };
use crate::math::constants::{ Float, Vector2f, Vector3f };

pub const MIN_GRID_RESOLUTION: usize = 2;
pub const MAX_GRID_RESOLUTION: usize = 255;

fn check_resolution(resolution: usize) -> Result<(), MeshError> {
    if resolution < MIN_GRID_RESOLUTION || resolution > MAX_GRID_RESOLUTION {
        return Err(MeshError::invalid(format!(
            "grid size {} is outside {}..={}",
            resolution, MIN_GRID_RESOLUTION, MAX_GRID_RESOLUTION
        )));
    }
    Ok(())
}

fn lattice_triangles(resolution: usize) -> Vec<TriangleIndices> {
    let r = resolution as u32;
    let mut triangles = Vec::with_capacity(2 * (resolution - 1) * (resolution - 1));
    for j in 0..r - 1 {
        for i in 0..r - 1 {
            triangles.push([i + j * r, i + 1 + j * r, i + r + j * r]);
            triangles.push([i + 1 + j * r, i + r + j * r, i + r + 1 + j * r]);
        }
    }
    triangles
}

fn lattice_positions(resolution: usize) -> Vec<Vector3f> {
    let step = 2.0 / (resolution - 1) as Float;
    let mut positions = Vec::with_capacity(resolution * resolution);
    for j in 0..resolution {
        for i in 0..resolution {
            positions.push(Vector3f::new(i as Float * step - 1.0, 0.0, j as Float * step - 1.0));
        }
    }
    positions
}

/// Flat `resolution x resolution` lattice spanning [-1, 1] in x and z.
pub fn generate_grid(resolution: usize) -> Result<Grid, MeshError> {
    check_resolution(resolution)?;
    let mesh = Mesh::new(lattice_positions(resolution), lattice_triangles(resolution))?;
    Grid::from_mesh(mesh, resolution)
}

/// Same lattice with texture coordinates running 0..1 across it.
pub fn generate_textured_grid(resolution: usize) -> Result<Grid, MeshError> {
    check_resolution(resolution)?;
    let tex_step = 1.0 / (resolution - 1) as Float;
    let mut tex_coords = Vec::with_capacity(resolution * resolution);
    for j in 0..resolution {
        for i in 0..resolution {
            tex_coords.push(Vector2f::new(i as Float * tex_step, j as Float * tex_step));
        }
    }

    let mesh = Mesh::new(lattice_positions(resolution), lattice_triangles(resolution))?
        .with_attribute(Attribute::TexCoord(tex_coords))?;
    Grid::from_mesh(mesh, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::AttributeKind;

    #[test]
    fn test_grid_counts() {
        for r in [2usize, 3, 10, 64, 255].iter() {
            let r = *r;
            let grid = generate_grid(r).unwrap();
            let mesh = grid.mesh();
            assert_eq!(mesh.vertex_count(), r * r);
            assert_eq!(mesh.triangle_count(), 2 * (r - 1) * (r - 1));
            assert!(mesh.triangles().iter().flatten().all(|&v| (v as usize) < r * r));
        }
    }

    #[test]
    fn test_grid_bounds_rejected() {
        assert!(matches!(generate_grid(0), Err(MeshError::InvalidParameter(_))));
        assert!(matches!(generate_grid(1), Err(MeshError::InvalidParameter(_))));
        assert!(matches!(generate_grid(256), Err(MeshError::InvalidParameter(_))));
        assert!(generate_textured_grid(1).is_err());
    }

    #[test]
    fn test_grid_layout_and_winding() {
        let grid = generate_grid(3).unwrap();
        let p = grid.mesh().positions();
        assert_eq!(p[0], Vector3f::new(-1.0, 0.0, -1.0));
        assert_eq!(p[1], Vector3f::new(0.0, 0.0, -1.0));
        assert_eq!(p[3], Vector3f::new(-1.0, 0.0, 0.0));
        assert_eq!(p[8], Vector3f::new(1.0, 0.0, 1.0));

        let t = grid.mesh().triangles();
        assert_eq!(t[0], [0, 1, 3]);
        assert_eq!(t[1], [1, 3, 4]);
        assert_eq!(t[2], [1, 2, 4]);
    }

    #[test]
    fn test_textured_grid_coordinates() {
        let grid = generate_textured_grid(5).unwrap();
        match grid.mesh().attribute(AttributeKind::TexCoord) {
            Some(Attribute::TexCoord(uv)) => {
                assert_eq!(uv.len(), 25);
                assert_eq!(uv[0], Vector2f::new(0.0, 0.0));
                assert_eq!(uv[24], Vector2f::new(1.0, 1.0));
                assert_eq!(uv[7], Vector2f::new(0.5, 0.25));
            }
            other => panic!("missing texture coordinates: {:?}", other),
        }
    }
}
