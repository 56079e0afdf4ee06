// Copyright @yucwang 2026

use std::path::Path;

use image::io::Reader as ImageReader;
use image::GenericImageView;

use crate::core::error::MeshError;
use crate::math::constants::{ Float, Vector2f };

/// Decoded RGBA8 image, sampled nearest-texel with clamp-to-edge wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTexture {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl ImageTexture {
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, MeshError> {
        if width == 0 || height == 0 || data.len() != width * height * 4 {
            return Err(MeshError::invalid(format!(
                "{} bytes do not form a {}x{} RGBA image",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn from_image<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let img = ImageReader::open(path)
            .map_err(|e| MeshError::resource(path, format!("failed to open image: {}", e)))?
            .decode()
            .map_err(|e| MeshError::resource(path, format!("failed to decode image: {}", e)))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        log::info!("Loaded texture {} ({}x{}).", path.display(), width, height);
        Self::from_rgba(width as usize, height as usize, rgba.into_raw())
            .map_err(|e| MeshError::resource(path, e))
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    pub fn texel(&self, x: usize, y: usize) -> [u8; 4] {
        let base = (y * self.width + x) * 4;
        [self.data[base], self.data[base + 1], self.data[base + 2], self.data[base + 3]]
    }

    fn clamp_index(value: Float, size: usize) -> usize {
        let idx = (value.clamp(0.0, 1.0) * size as Float).floor() as usize;
        idx.min(size - 1)
    }

    pub fn sample(&self, uv: Vector2f) -> [u8; 4] {
        let x = Self::clamp_index(uv.x, self.width);
        let y = Self::clamp_index(uv.y, self.height);
        self.texel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ImageTexture {
        let mut data = Vec::new();
        for y in 0..2 {
            for x in 0..2 {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        ImageTexture::from_rgba(2, 2, data).unwrap()
    }

    #[test]
    fn test_nearest_clamped_sampling() {
        let tex = checker();
        assert_eq!(tex.raw_data().len(), 16);
        assert_eq!(tex.sample(Vector2f::new(0.1, 0.1)), [255, 255, 255, 255]);
        assert_eq!(tex.sample(Vector2f::new(0.9, 0.1)), [0, 0, 0, 255]);
        assert_eq!(tex.sample(Vector2f::new(1.0, 1.0)), [255, 255, 255, 255]);
        assert_eq!(tex.sample(Vector2f::new(-3.0, 7.0)), tex.texel(0, 1));
    }

    #[test]
    fn test_rejects_bad_buffer() {
        assert!(ImageTexture::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(ImageTexture::from_rgba(0, 1, Vec::new()).is_err());
    }

    #[test]
    fn test_decodes_png() {
        let path = std::env::temp_dir().join(format!("meshwork-decode-{}.png", std::process::id()));
        let mut img = image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 255, 255]));
        img.put_pixel(2, 1, image::Rgba([9, 8, 7, 6]));
        img.save(&path).unwrap();

        let tex = ImageTexture::from_image(&path).unwrap();
        assert_eq!(tex.dimensions(), (3, 2));
        assert_eq!(tex.texel(0, 0), [0, 0, 255, 255]);
        assert_eq!(tex.sample(Vector2f::new(1.0, 1.0)), [9, 8, 7, 6]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let result = ImageTexture::from_image("does/not/exist.png");
        assert!(matches!(result, Err(MeshError::ResourceLoad { .. })));
    }
}
