// Copyright @yucwang 2026

use std::path::PathBuf;

use crate::core::error::MeshError;
use crate::math::constants::{ Float, Vector4f };

pub const DEFAULT_SURFACE_COLOR: [Float; 4] = [0.8, 0.8, 0.8, 1.0];
pub const DEFAULT_SURFACE_ALPHA: Float = 0.5;

/// How the installed surface is shaded: a flat color with a separate alpha,
/// or an image texture sampled with the mesh texture coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Appearance {
    Flat { color: Vector4f, alpha: Float },
    Textured(PathBuf),
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance::Flat {
            color: Vector4f::from(DEFAULT_SURFACE_COLOR),
            alpha: DEFAULT_SURFACE_ALPHA,
        }
    }
}

fn parse_channel(hex: &str) -> Option<Float> {
    u8::from_str_radix(hex, 16).ok().map(|v| v as Float / 255.0)
}

fn parse_hex_color(input: &str) -> Option<Appearance> {
    let digits = input.strip_prefix('#')?;
    if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = parse_channel(&digits[0..2])?;
    let g = parse_channel(&digits[2..4])?;
    let b = parse_channel(&digits[4..6])?;
    let a = parse_channel(&digits[6..8])?;
    Some(Appearance::Flat { color: Vector4f::new(r, g, b, 1.0), alpha: a })
}

impl Appearance {
    pub fn parse(input: &str) -> Result<Self, MeshError> {
        if input.is_empty() {
            return Ok(Appearance::default());
        }
        if let Some(flat) = parse_hex_color(input) {
            return Ok(flat);
        }
        if input.ends_with(".jpg") || input.ends_with(".png") {
            return Ok(Appearance::Textured(PathBuf::from(input)));
        }
        Err(MeshError::invalid(format!("unrecognized appearance '{}'", input)))
    }

    pub fn is_textured(&self) -> bool {
        matches!(self, Appearance::Textured(_))
    }

    /// Flat color, or opaque white for textured surfaces.
    pub fn base_color(&self) -> Vector4f {
        match self {
            Appearance::Flat { color, .. } => *color,
            Appearance::Textured(_) => Vector4f::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    pub fn alpha(&self) -> Float {
        match self {
            Appearance::Flat { alpha, .. } => *alpha,
            Appearance::Textured(_) => 1.0,
        }
    }
}
