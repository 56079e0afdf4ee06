// Copyright @yucwang 2026

use crate::core::error::MeshError;
use crate::core::grid::Grid;
use crate::core::rng::LcgRng;
use crate::math::constants::{ Float, Int, PI };

/// Fault-formation terrain: repeated random half-plane splits of the XZ
/// domain, one side raised and the other lowered, followed by a rescale of
/// the heights into `[-scale/2, scale/2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultFormation {
    faults: Int,
    scale: Float,
}

impl FaultFormation {
    pub fn new(faults: Int, scale: Float) -> Self {
        Self { faults, scale }
    }

    pub fn faults(&self) -> Int {
        self.faults
    }

    pub fn scale(&self) -> Float {
        self.scale
    }

    pub fn apply(&self, grid: &mut Grid, rng: &mut LcgRng) -> Result<(), MeshError> {
        if self.faults < 0 {
            return Err(MeshError::invalid(format!("fault count {} is negative", self.faults)));
        }
        if !self.scale.is_finite() {
            return Err(MeshError::invalid(format!("fault scale {} is not finite", self.scale)));
        }
        if self.faults == 0 {
            return Ok(());
        }

        let positions = grid.mesh_mut().positions_mut();
        for _ in 0..self.faults {
            let displacement = rng.next_f32();
            let theta = rng.next_f32() * 2.0 * PI;
            let px = rng.next_range(-1.0, 1.0);
            let pz = rng.next_range(-1.0, 1.0);
            let (nz, nx) = theta.sin_cos();

            for v in positions.iter_mut() {
                if (v.x - px) * nx + (v.z - pz) * nz > 0.0 {
                    v.y += displacement;
                } else {
                    v.y -= displacement;
                }
            }
        }

        let (min_h, max_h) = grid.height_range();
        let range = max_h - min_h;
        if range == 0.0 {
            log::debug!("fault heights are flat after {} faults, skipping rescale", self.faults);
            return Ok(());
        }

        let mid = 0.5 * (max_h + min_h);
        for v in grid.mesh_mut().positions_mut() {
            v.y = (v.y - mid) / range * self.scale;
        }
        Ok(())
    }
}
