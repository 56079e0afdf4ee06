// Copyright @yucwang 2026

use crate::core::error::MeshError;
use crate::core::grid::Grid;
use crate::math::constants::Int;

/// Height smoothing: every pass pulls each vertex halfway toward the mean of
/// its four lattice neighbors. Vertices are updated in index order and in
/// place, so a vertex already sees the smoothed heights of its north and west
/// neighbors within the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weathering {
    passes: Int,
}

impl Weathering {
    pub fn new(passes: Int) -> Self {
        Self { passes }
    }

    pub fn passes(&self) -> Int {
        self.passes
    }

    pub fn apply(&self, grid: &mut Grid) -> Result<(), MeshError> {
        if self.passes < 0 {
            return Err(MeshError::invalid(format!("weathering passes {} is negative", self.passes)));
        }

        let vertex_count = grid.mesh().vertex_count();
        for _ in 0..self.passes {
            for i in 0..vertex_count {
                let nb = grid.neighbors(i);
                let mean = (grid.height(nb.north)
                    + grid.height(nb.south)
                    + grid.height(nb.west)
                    + grid.height(nb.east))
                    / 4.0;
                let current = grid.height(i);
                grid.mesh_mut().positions_mut()[i].y = 0.5 * (current + mean);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;
    use crate::perturb::fault::FaultFormation;
    use crate::shapes::grid::generate_grid;

    fn roughness(grid: &Grid) -> f32 {
        (0..grid.mesh().vertex_count())
            .map(|i| {
                let nb = grid.neighbors(i);
                (grid.height(i) - grid.height(nb.east)).abs() + (grid.height(i) - grid.height(nb.south)).abs()
            })
            .sum()
    }

    #[test]
    fn test_flat_grid_unchanged() {
        let mut grid = generate_grid(6).unwrap();
        let before = grid.clone();
        Weathering::new(5).apply(&mut grid).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_single_spike_spreads() {
        let mut grid = generate_grid(3).unwrap();
        grid.mesh_mut().positions_mut()[4].y = 1.0;
        Weathering::new(1).apply(&mut grid).unwrap();

        // Vertex 1 sees the spike as its south neighbor: (0 + 1/4) / 2.
        assert!((grid.height(1) - 0.125).abs() < 1e-6);
        // The spike averages its own height with four neighbors, two of which
        // were already raised earlier in the pass.
        assert!(grid.height(4) < 1.0 && grid.height(4) > 0.5);
    }

    #[test]
    fn test_smoothing_reduces_roughness() {
        let mut grid = generate_grid(32).unwrap();
        FaultFormation::new(80, 1.0).apply(&mut grid, &mut LcgRng::new(17)).unwrap();
        let rough = roughness(&grid);
        Weathering::new(4).apply(&mut grid).unwrap();
        assert!(roughness(&grid) < rough);
    }

    #[test]
    fn test_negative_passes_rejected() {
        let mut grid = generate_grid(4).unwrap();
        grid.mesh_mut().positions_mut()[5].y = 2.0;
        let before = grid.clone();
        assert!(Weathering::new(-1).apply(&mut grid).is_err());
        assert_eq!(grid, before);
    }
}
