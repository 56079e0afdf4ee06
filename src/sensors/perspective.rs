// Copyright @yucwang 2026

use crate::math::constants::{ Matrix4f, Vector3f };
use crate::math::transform::Transform;
use crate::sensors::camera::{ Camera, Projection };

/// Fixed camera looking from `origin` at `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    origin: Vector3f,
    target: Vector3f,
    up: Vector3f,
    view: Transform,
    projection: Projection,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f, target: Vector3f, up: Vector3f, projection: Projection) -> Self {
        Self {
            origin,
            target,
            up,
            view: Transform::look_at(&origin, &target, &up),
            projection,
        }
    }

    pub fn target(&self) -> Vector3f {
        self.target
    }

    pub fn up(&self) -> Vector3f {
        self.up
    }
}

impl Camera for PerspectiveCamera {
    fn view(&self) -> Matrix4f {
        *self.view.matrix()
    }

    fn projection(&self) -> Matrix4f {
        self.projection.matrix()
    }

    fn eye(&self) -> Vector3f {
        self.origin
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera\n  origin: {:?}\n  target: {:?}\n  fov_y: {}",
                self.origin.as_slice(), self.target.as_slice(), self.projection.fov_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_camera_center_projects_to_center() {
        let origin = Vector3f::new(1.0, 1.1, 1.0);
        let cam = PerspectiveCamera::new(origin, Vector3f::zeros(), Vector3f::y(), Projection::default());
        let clip = cam.projection() * cam.view() * Vector3f::zeros().push(1.0);

        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
        assert!(clip.w > 0.0);
        assert!(!cam.clone().steer(crate::sensors::camera::FlightControl::Forward));
    }
}
