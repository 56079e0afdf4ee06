// Copyright @yucwang 2026

use crate::math::constants::{ Float, Matrix4f, Vector3f, Vector4f };
use crate::sensors::camera::Camera;
use crate::textures::appearance::Appearance;

pub const FOG_THIN_FACTOR: Float = 0.8;
pub const FOG_THICKEN_FACTOR: Float = 1.25;

/// Directional light shared by every scene.
pub fn light_direction() -> Vector3f {
    Vector3f::new(1.0, 2.0, 1.0).normalize()
}

/// Blinn halfway vector for a viewer looking down -Z.
pub fn halfway_vector() -> Vector3f {
    (light_direction() + Vector3f::z()).normalize()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogCommand {
    Thin,
    Thicken,
    Toggle,
}

impl FogCommand {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fog-thin" => Some(FogCommand::Thin),
            "fog-thicken" => Some(FogCommand::Thicken),
            "fog-toggle" => Some(FogCommand::Toggle),
            _ => None,
        }
    }
}

/// Exponential fog. Toggling off stores the density and zeroes it; toggling
/// back on restores the stored value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogSettings {
    density: Float,
    color: Vector3f,
    enabled: bool,
    previous_density: Float,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self::new(1.0, Vector3f::new(1.0, 1.0, 1.0))
    }
}

impl FogSettings {
    pub fn new(density: Float, color: Vector3f) -> Self {
        Self { density, color, enabled: true, previous_density: density }
    }

    pub fn disabled() -> Self {
        let mut fog = Self::default();
        fog.toggle();
        fog
    }

    pub fn density(&self) -> Float {
        self.density
    }

    pub fn color(&self) -> Vector3f {
        self.color
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn thin(&mut self) {
        self.density *= FOG_THIN_FACTOR;
    }

    pub fn thicken(&mut self) {
        self.density *= FOG_THICKEN_FACTOR;
    }

    pub fn toggle(&mut self) {
        if self.enabled {
            self.previous_density = self.density;
            self.density = 0.0;
        } else {
            self.density = self.previous_density;
        }
        self.enabled = !self.enabled;
    }

    pub fn apply(&mut self, command: FogCommand) {
        match command {
            FogCommand::Thin => self.thin(),
            FogCommand::Thicken => self.thicken(),
            FogCommand::Toggle => self.toggle(),
        }
    }
}

/// Everything a draw call reads besides the geometry itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    pub model: Matrix4f,
    pub view: Matrix4f,
    pub projection: Matrix4f,
    pub model_view: Matrix4f,
    pub light_direction: Vector3f,
    pub halfway: Vector3f,
    pub color: Vector4f,
    pub alpha: Float,
    pub textured: bool,
    pub fog: FogSettings,
    /// Lowest and highest model-space y of the installed mesh.
    pub height_range: (Float, Float),
    /// Seconds since the scene started.
    pub time: Float,
}

impl FrameUniforms {
    pub fn new(model: Matrix4f, camera: &dyn Camera, appearance: &Appearance, fog: FogSettings) -> Self {
        let view = camera.view();
        Self {
            model,
            view,
            projection: camera.projection(),
            model_view: view * model,
            light_direction: light_direction(),
            halfway: halfway_vector(),
            color: appearance.base_color(),
            alpha: appearance.alpha(),
            textured: appearance.is_textured(),
            fog,
            height_range: (0.0, 0.0),
            time: 0.0,
        }
    }

    pub fn with_height_range(mut self, min_y: Float, max_y: Float) -> Self {
        self.height_range = (min_y, max_y);
        self
    }

    pub fn with_time(mut self, time: Float) -> Self {
        self.time = time;
        self
    }
}
