// Copyright 2026 @TwoCookingMice

use super::constants::{ Float, Matrix4f, Vector3f };

use nalgebra::{ Point3, Rotation3, Unit };

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity() }
    }
}

impl Transform {
    pub fn new(matrix: Matrix4f) -> Self {
        Self { matrix: matrix }
    }

    pub fn rotation(axis: &Vector3f, angle: Float) -> Self {
        let rot = Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle);
        Self::new(rot.to_homogeneous())
    }

    pub fn rotation_y(angle: Float) -> Self {
        Self::rotation(&Vector3f::y(), angle)
    }

    pub fn rotation_z(angle: Float) -> Self {
        Self::rotation(&Vector3f::z(), angle)
    }

    pub fn translation(offset: &Vector3f) -> Self {
        Self::new(Matrix4f::new_translation(offset))
    }

    pub fn scale(factor: Float) -> Self {
        Self::new(Matrix4f::new_scaling(factor))
    }

    /// World-to-camera transform looking from `eye` at `target`.
    pub fn look_at(eye: &Vector3f, target: &Vector3f, up: &Vector3f) -> Self {
        Self::new(Matrix4f::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up))
    }

    pub fn matrix(&self) -> &Matrix4f {
        &self.matrix
    }

    /// `self` applied after `other`.
    pub fn compose(&self, other: &Transform) -> Self {
        Self::new(self.matrix * other.matrix)
    }
}

/// Rotates `v` about the axis `k` by `theta` radians (Rodrigues' formula).
/// `k` is expected to be unit length.
pub fn rotate_about_axis(v: &Vector3f, k: &Vector3f, theta: Float) -> Vector3f {
    let (sin_t, cos_t) = theta.sin_cos();
    v * cos_t + k.cross(v) * sin_t + k * (k.dot(v) * (1.0 - cos_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::PI;

    fn approx(a: &Vector3f, b: &Vector3f) -> bool {
        (a - b).norm() < 1e-5
    }

    fn apply_point(t: &Transform, p: Vector3f) -> Vector3f {
        t.matrix().transform_point(&Point3::from(p)).coords
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let t = Transform::rotation_y(0.5 * PI);
        let p = apply_point(&t, Vector3f::new(1.0, 0.0, 0.0));
        assert!(approx(&p, &Vector3f::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_compose_applies_right_first() {
        let a = Transform::translation(&Vector3f::new(1.0, 2.0, 3.0));
        let b = Transform::scale(2.0).compose(&Transform::rotation_z(0.5 * PI));
        let ab = a.compose(&b);
        let q = apply_point(&ab, Vector3f::new(1.0, 0.0, 0.0));
        assert!(approx(&q, &Vector3f::new(1.0, 4.0, 3.0)));
        assert_eq!(Transform::default().compose(&a), a);
    }

    #[test]
    fn test_rotate_about_axis_matches_rotation() {
        let v = Vector3f::new(0.0, 0.0, -1.0);
        let k = Vector3f::new(0.0, 1.0, 0.0);
        let r = rotate_about_axis(&v, &k, 0.3);
        let expected = Transform::rotation(&k, 0.3).matrix().transform_vector(&v);
        assert!(approx(&r, &expected));
        assert!((r.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vector3f::new(1.0, 2.0, 1.0);
        let view = Transform::look_at(&eye, &Vector3f::zeros(), &Vector3f::y());
        assert!(approx(&apply_point(&view, eye), &Vector3f::zeros()));
        let target = apply_point(&view, Vector3f::zeros());
        assert!(target.z < 0.0);
    }
}
