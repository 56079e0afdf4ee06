// Copyright @yucwang 2026

use crate::core::grid::Grid;
use crate::core::mesh::TriangleIndices;
use crate::math::constants::Vector3f;

/// Lattice normals: `normalize(cross(north - south, west - east))`.
///
/// Boundary vertices stand in for their missing neighbors, so every vertex
/// still has a non-degenerate pair of differences when `resolution >= 2`.
pub fn estimate_grid_normals(grid: &Grid) -> Vec<Vector3f> {
    let positions = grid.mesh().positions();
    (0..positions.len())
        .map(|i| {
            let nb = grid.neighbors(i);
            let north_south = positions[nb.north] - positions[nb.south];
            let west_east = positions[nb.west] - positions[nb.east];
            north_south.cross(&west_east).normalize()
        })
        .collect()
}

/// Area-weighted vertex normals from triangle adjacency.
///
/// Each face contributes its unnormalized normal `cross(p1 - p0, p2 - p0)` to
/// its three corners; the sums are normalized at the end. A vertex that no
/// triangle references keeps a zero sum, and normalizing it yields NaN
/// components. Callers that may feed unreferenced vertices must check.
pub fn estimate_adjacency_normals(positions: &[Vector3f], triangles: &[TriangleIndices]) -> Vec<Vector3f> {
    let mut normals = vec![Vector3f::zeros(); positions.len()];

    for tri in triangles {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = positions[i0];
        let face_normal = (positions[i1] - p0).cross(&(positions[i2] - p0));
        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals.iter().map(|n| n.normalize()).collect()
}

/// Radial normals for shapes centered on the origin.
pub fn estimate_radial_normals(positions: &[Vector3f]) -> Vec<Vector3f> {
    positions.iter().map(|p| p.normalize()).collect()
}
