// Copyright @yucwang 2026

use crate::core::mesh::Mesh;
use crate::core::rng::LcgRng;
use crate::math::constants::Float;

pub const DEFAULT_JITTER_AMPLITUDE: Float = 0.001;

/// Per-frame random walk of every vertex in the xy plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    amplitude: Float,
}

impl Default for Jitter {
    fn default() -> Self {
        Self { amplitude: DEFAULT_JITTER_AMPLITUDE }
    }
}

impl Jitter {
    pub fn new(amplitude: Float) -> Self {
        Self { amplitude }
    }

    pub fn amplitude(&self) -> Float {
        self.amplitude
    }

    /// Offsets x and y of each position by `(u - 0.5) * amplitude`.
    pub fn apply(&self, mesh: &mut Mesh, rng: &mut LcgRng) {
        for p in mesh.positions_mut() {
            p.x += (rng.next_f32() - 0.5) * self.amplitude;
            p.y += (rng.next_f32() - 0.5) * self.amplitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::logo::generate_logo;

    #[test]
    fn test_jitter_is_bounded() {
        let mut logo = generate_logo().unwrap();
        let before = logo.clone();
        let jitter = Jitter::new(0.01);
        let mut rng = LcgRng::new(1);
        jitter.apply(&mut logo, &mut rng);

        let mut moved = false;
        for (a, b) in logo.positions().iter().zip(before.positions()) {
            assert!((a.x - b.x).abs() <= 0.0051);
            assert!((a.y - b.y).abs() <= 0.0051);
            assert_eq!(a.z, b.z);
            moved |= a != b;
        }
        assert!(moved);
        assert_eq!(logo.triangles(), before.triangles());
    }

    #[test]
    fn test_zero_amplitude_is_identity() {
        let mut logo = generate_logo().unwrap();
        let before = logo.clone();
        Jitter::new(0.0).apply(&mut logo, &mut LcgRng::new(2));
        assert_eq!(logo, before);
    }
}
