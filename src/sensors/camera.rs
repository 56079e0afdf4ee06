// Copyright @yucwang 2026

use std::fmt::Debug;

use nalgebra::Perspective3;

use crate::math::constants::{ Float, Matrix4f, Vector3f };

pub const DEFAULT_FOV_Y: Float = 1.5;
pub const DEFAULT_NEAR_CLIP: Float = 0.1;
pub const DEFAULT_FAR_CLIP: Float = 20.0;

/// Discrete camera commands, one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightControl {
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
}

impl FlightControl {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pitch-up" => Some(FlightControl::PitchUp),
            "pitch-down" => Some(FlightControl::PitchDown),
            "yaw-left" => Some(FlightControl::YawLeft),
            "yaw-right" => Some(FlightControl::YawRight),
            "forward" => Some(FlightControl::Forward),
            "back" => Some(FlightControl::Back),
            "strafe-left" => Some(FlightControl::StrafeLeft),
            "strafe-right" => Some(FlightControl::StrafeRight),
            _ => None,
        }
    }
}

/// Perspective projection looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: Float,
    pub aspect: Float,
    pub near_clip: Float,
    pub far_clip: Float,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: DEFAULT_FOV_Y,
            aspect: 1.0,
            near_clip: DEFAULT_NEAR_CLIP,
            far_clip: DEFAULT_FAR_CLIP,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Matrix4f {
        Perspective3::new(self.aspect, self.fov_y, self.near_clip, self.far_clip).to_homogeneous()
    }
}

pub trait Camera: Debug {
    fn view(&self) -> Matrix4f;
    fn projection(&self) -> Matrix4f;
    fn eye(&self) -> Vector3f;

    /// Applies a flight command. Returns false for cameras that do not move.
    fn steer(&mut self, _control: FlightControl) -> bool {
        false
    }

    fn describe(&self) -> String {
        String::from("Camera")
    }
}
