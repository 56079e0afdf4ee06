// Copyright @yucwang 2021

use crate::core::error::MeshError;
use crate::core::geometry::GeometryBundle;
use crate::renderers::shader::ShaderSources;
use crate::renderers::uniforms::FrameUniforms;
use crate::textures::image::ImageTexture;

pub trait Renderer {
    /// Compiles and links the shader pair. Errors here are fatal.
    fn prepare(&mut self, shaders: &ShaderSources) -> Result<(), MeshError>;

    /// Draws the installed geometry, or only clears when there is none.
    fn draw(&mut self, uniforms: &FrameUniforms, geometry: Option<&GeometryBundle>) -> Result<(), MeshError>;

    fn bind_texture(&mut self, _texture: &ImageTexture) -> Result<(), MeshError> {
        Ok(())
    }

    fn describe(&self) -> String {
        String::from("Renderer")
    }
}
