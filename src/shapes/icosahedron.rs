// Copyright @yucwang 2026

use std::collections::HashMap;

use crate::core::error::MeshError;
use crate::core::mesh::{ Mesh, TriangleIndices };
use crate::math::constants::{ Float, Int, Vector3f };

pub const MAX_SUBDIVISION_ROUNDS: Int = 6;

const ICOSAHEDRON_FACES: [TriangleIndices; 20] = [
    [0, 1, 4], [0, 6, 1], [1, 11, 9], [1, 6, 11], [0, 10, 6], [0, 8, 10], [0, 4, 8], [1, 9, 4],
    [4, 9, 5], [4, 5, 8], [6, 10, 7], [6, 7, 11],
    [2, 3, 7], [2, 5, 3], [2, 7, 10], [3, 11, 7], [11, 3, 9], [2, 10, 8], [3, 5, 9], [2, 8, 5],
];

/// Regular icosahedron built from three golden rectangles, faces wound
/// counter-clockwise seen from outside.
pub fn generate_icosahedron() -> Result<Mesh, MeshError> {
    let phi: Float = (1.0 + (5.0 as Float).sqrt()) / 2.0;
    let positions = vec![
        Vector3f::new(1.0, phi, 0.0),
        Vector3f::new(-1.0, phi, 0.0),
        Vector3f::new(1.0, -phi, 0.0),
        Vector3f::new(-1.0, -phi, 0.0),
        Vector3f::new(0.0, 1.0, phi),
        Vector3f::new(0.0, -1.0, phi),
        Vector3f::new(0.0, 1.0, -phi),
        Vector3f::new(0.0, -1.0, -phi),
        Vector3f::new(phi, 0.0, 1.0),
        Vector3f::new(-phi, 0.0, 1.0),
        Vector3f::new(phi, 0.0, -1.0),
        Vector3f::new(-phi, 0.0, -1.0),
    ];

    Mesh::new(positions, ICOSAHEDRON_FACES.to_vec())
}

/// Splits every triangle into four through its edge midpoints, `rounds`
/// times. Midpoints are shared between the two faces of an edge. With
/// `project` set, each midpoint is pushed out to the radius of its edge's
/// first endpoint, which keeps sphere-like meshes round.
///
/// Attributes do not survive subdivision; estimate normals afterwards.
pub fn subdivide(mesh: &Mesh, rounds: Int, project: bool) -> Result<Mesh, MeshError> {
    if rounds < 0 || rounds > MAX_SUBDIVISION_ROUNDS {
        return Err(MeshError::invalid(format!(
            "subdivision rounds {} is outside 0..={}",
            rounds, MAX_SUBDIVISION_ROUNDS
        )));
    }

    let mut positions = mesh.positions().to_vec();
    let mut triangles = mesh.triangles().to_vec();

    for _ in 0..rounds {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut next_triangles = Vec::with_capacity(triangles.len() * 4);

        let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vector3f>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let pa = positions[a as usize];
                let pb = positions[b as usize];
                let mut m = (pa + pb) * 0.5;
                if project {
                    m = m.normalize() * pa.norm();
                }
                positions.push(m);
                (positions.len() - 1) as u32
            })
        };

        for &[a, b, c] in &triangles {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            next_triangles.push([a, ab, ca]);
            next_triangles.push([ab, b, bc]);
            next_triangles.push([ca, bc, c]);
            next_triangles.push([ab, bc, ca]);
        }
        triangles = next_triangles;
    }

    Mesh::new(positions, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icosahedron_normals_outward() {
        let mut mesh = generate_icosahedron().unwrap();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 20);

        mesh.add_adjacency_normals().unwrap();
        let normals = mesh.normals().unwrap();
        for (p, n) in mesh.positions().iter().zip(normals) {
            assert!((n.norm() - 1.0).abs() < 1e-5);
            assert!((n - p.normalize()).norm() < 1e-4);
        }
    }

    #[test]
    fn test_subdivision_counts() {
        let ico = generate_icosahedron().unwrap();
        let once = subdivide(&ico, 1, true).unwrap();
        assert_eq!(once.vertex_count(), 42);
        assert_eq!(once.triangle_count(), 80);

        let twice = subdivide(&ico, 2, true).unwrap();
        assert_eq!(twice.vertex_count(), 162);
        assert_eq!(twice.triangle_count(), 320);

        let radius = ico.positions()[0].norm();
        for p in twice.positions() {
            assert!((p.norm() - radius).abs() < 1e-4);
        }
    }

    #[test]
    fn test_zero_rounds_is_copy() {
        let ico = generate_icosahedron().unwrap();
        let same = subdivide(&ico, 0, false).unwrap();
        assert_eq!(same.positions(), ico.positions());
        assert_eq!(same.triangles(), ico.triangles());
    }

    #[test]
    fn test_rounds_out_of_range() {
        let ico = generate_icosahedron().unwrap();
        assert!(subdivide(&ico, -1, true).is_err());
        assert!(subdivide(&ico, MAX_SUBDIVISION_ROUNDS + 1, true).is_err());
    }
}
