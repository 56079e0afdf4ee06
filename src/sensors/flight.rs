// Copyright @yucwang 2026

use crate::math::constants::{ Float, Matrix4f, Vector3f, PI };
use crate::math::transform::{ rotate_about_axis, Transform };
use crate::sensors::camera::{ Camera, FlightControl, Projection };

pub const MAX_PITCH: Float = PI / 2.0 - 0.1;
pub const TURN_STEP: Float = PI / 180.0;
pub const MOVE_STEP: Float = 0.01;

/// Free-flying camera steered one step per command. Pitch turns about the
/// camera's right vector, yaw about the world up axis.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightCamera {
    position: Vector3f,
    forward: Vector3f,
    pitch: Float,
    projection: Projection,
}

impl FlightCamera {
    pub fn new(position: Vector3f, projection: Projection) -> Self {
        Self {
            position,
            forward: Vector3f::new(0.0, 0.0, -1.0),
            pitch: 0.0,
            projection,
        }
    }

    pub fn position(&self) -> Vector3f {
        self.position
    }

    pub fn forward(&self) -> Vector3f {
        self.forward
    }

    pub fn pitch(&self) -> Float {
        self.pitch
    }

    pub fn right(&self) -> Vector3f {
        self.forward.cross(&Vector3f::y()).normalize()
    }

    pub fn up(&self) -> Vector3f {
        self.right().cross(&self.forward).normalize()
    }

    fn turn(&mut self, axis: Vector3f, angle: Float) {
        self.forward = rotate_about_axis(&self.forward, &axis, angle).normalize();
    }
}

impl Camera for FlightCamera {
    fn view(&self) -> Matrix4f {
        let target = self.position + self.forward;
        *Transform::look_at(&self.position, &target, &self.up()).matrix()
    }

    fn projection(&self) -> Matrix4f {
        self.projection.matrix()
    }

    fn eye(&self) -> Vector3f {
        self.position
    }

    fn steer(&mut self, control: FlightControl) -> bool {
        match control {
            FlightControl::PitchUp => {
                if self.pitch < MAX_PITCH {
                    let right = self.right();
                    self.turn(right, TURN_STEP);
                    self.pitch += TURN_STEP;
                }
            }
            FlightControl::PitchDown => {
                if self.pitch > -MAX_PITCH {
                    let right = self.right();
                    self.turn(right, -TURN_STEP);
                    self.pitch -= TURN_STEP;
                }
            }
            FlightControl::YawLeft => self.turn(Vector3f::y(), TURN_STEP),
            FlightControl::YawRight => self.turn(Vector3f::y(), -TURN_STEP),
            FlightControl::Forward => self.position += self.forward * MOVE_STEP,
            FlightControl::Back => self.position -= self.forward * MOVE_STEP,
            FlightControl::StrafeLeft => self.position -= self.right() * MOVE_STEP,
            FlightControl::StrafeRight => self.position += self.right() * MOVE_STEP,
        }
        true
    }

    fn describe(&self) -> String {
        format!("FlightCamera\n  position: {:?}\n  forward: {:?}\n  pitch: {}",
                self.position.as_slice(), self.forward.as_slice(), self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> FlightCamera {
        FlightCamera::new(Vector3f::new(0.0, 0.2, 0.0), Projection::default())
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = camera();
        for _ in 0..200 {
            cam.steer(FlightControl::PitchUp);
        }
        assert!(cam.pitch() <= MAX_PITCH + TURN_STEP);
        assert!((cam.forward().y - cam.pitch().sin()).abs() < 1e-3);
        assert!(cam.forward().y < 1.0);

        for _ in 0..400 {
            cam.steer(FlightControl::PitchDown);
        }
        assert!(cam.pitch() >= -MAX_PITCH - TURN_STEP);
        assert!(cam.forward().y < 0.0);
    }

    #[test]
    fn test_yaw_left_quarter_turn() {
        let mut cam = camera();
        for _ in 0..90 {
            cam.steer(FlightControl::YawLeft);
        }
        assert!((cam.forward() - Vector3f::new(-1.0, 0.0, 0.0)).norm() < 1e-3);
    }

    #[test]
    fn test_moves_along_forward_and_right() {
        let mut cam = camera();
        cam.steer(FlightControl::Forward);
        cam.steer(FlightControl::StrafeRight);
        let expected = Vector3f::new(MOVE_STEP, 0.2, -MOVE_STEP);
        assert!((cam.position() - expected).norm() < 1e-6);

        cam.steer(FlightControl::Back);
        cam.steer(FlightControl::StrafeLeft);
        assert!((cam.position() - Vector3f::new(0.0, 0.2, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_view_looks_along_forward() {
        let mut cam = camera();
        cam.steer(FlightControl::YawRight);
        let ahead = cam.position() + cam.forward() * 2.0;
        let p = cam.view() * ahead.push(1.0);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!((p.z + 2.0).abs() < 1e-5);
    }
}
