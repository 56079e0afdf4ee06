// Copyright @yucwang 2026

use crate::core::error::MeshError;
use crate::core::mesh::{ Attribute, Mesh, TriangleIndices };
use crate::core::normals::estimate_radial_normals;
use crate::math::constants::{ Float, Vector3f, PI };

pub const MAX_RINGS: usize = 1024;
pub const MAX_SLICES: usize = 1024;
pub const MIN_SLICES: usize = 4;

/// Unit sphere with a vertex at each pole and `rings` latitude bands of
/// `slices` vertices in between. Normals are radial.
pub fn generate_sphere(rings: usize, slices: usize) -> Result<Mesh, MeshError> {
    if rings == 0 || rings > MAX_RINGS {
        return Err(MeshError::invalid(format!("rings {} is outside 1..={}", rings, MAX_RINGS)));
    }
    if slices < MIN_SLICES || slices > MAX_SLICES {
        return Err(MeshError::invalid(format!(
            "slices {} is outside {}..={}",
            slices, MIN_SLICES, MAX_SLICES
        )));
    }

    let mut positions = Vec::with_capacity(rings * slices + 2);
    positions.push(Vector3f::new(0.0, 1.0, 0.0));
    for i in 1..=rings {
        let theta = PI / (rings + 1) as Float * i as Float;
        for j in 0..slices {
            let phi = 2.0 * PI / slices as Float * j as Float;
            positions.push(Vector3f::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()));
        }
    }
    positions.push(Vector3f::new(0.0, -1.0, 0.0));

    let r = rings as u32;
    let s = slices as u32;
    let mut triangles: Vec<TriangleIndices> = Vec::with_capacity(2 * slices * rings);

    for i in 1..=s {
        let next = (i % s) + 1;
        triangles.push([0, i, next]);
    }

    for h in 1..r {
        for a in 1..=s {
            let current = (h - 1) * s + a;
            let below = current + s;
            let (right, diagonal) = if a == s {
                ((h - 1) * s + 1, current + 1)
            } else {
                (current + 1, below + 1)
            };
            triangles.push([current, right, below]);
            triangles.push([right, diagonal, below]);
        }
    }

    let south = r * s + 1;
    for i in 1..=s {
        let current = (r - 1) * s + i;
        let next = if i == s { (r - 1) * s + 1 } else { current + 1 };
        triangles.push([south, next, current]);
    }

    let normals = estimate_radial_normals(&positions);
    Mesh::new(positions, triangles)?.with_attribute(Attribute::Normal(normals))
}
