// Copyright @yucwang 2026

use crate::core::error::MeshError;
use crate::core::mesh::{ Attribute, Mesh, TriangleIndices };
use crate::math::constants::{ Float, Vector3f, Vector4f };

/// Illini orange.
pub const LOGO_COLOR: [Float; 4] = [1.0, 0.373, 0.02, 1.0];

// Bottom bar, stem, top bar; two triangles each, listed as unshared corners.
const LOGO_CORNERS: [[Float; 2]; 18] = [
    [-0.4, -0.7], [0.4, -0.7], [0.4, -0.4],
    [-0.4, -0.7], [0.4, -0.4], [-0.4, -0.4],
    [-0.2, -0.5], [0.2, -0.5], [0.2, 0.5],
    [-0.2, -0.5], [0.2, 0.5], [-0.2, 0.5],
    [-0.4, 0.4], [0.4, 0.4], [0.4, 0.7],
    [-0.4, 0.4], [0.4, 0.7], [-0.4, 0.7],
];

/// The block "I" logo in the z = 0 plane with a flat color attribute.
pub fn generate_logo() -> Result<Mesh, MeshError> {
    let positions: Vec<Vector3f> = LOGO_CORNERS
        .iter()
        .map(|c| Vector3f::new(c[0], c[1], 0.0))
        .collect();
    let triangles: Vec<TriangleIndices> = (0..positions.len() as u32 / 3)
        .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
        .collect();
    let color = Vector4f::from(LOGO_COLOR);
    let colors = vec![color; positions.len()];

    Mesh::new(positions, triangles)?.with_attribute(Attribute::Color(colors))
}
