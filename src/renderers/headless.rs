// Copyright @yucwang 2026

use crate::core::error::{ MeshError, ShaderStage };
use crate::core::geometry::GeometryBundle;
use crate::core::mesh::AttributeKind;
use crate::math::constants::{ Float, Vector2f };
use crate::renderers::renderer::Renderer;
use crate::renderers::shader::{ attribute_bindings, declarations, has_entry_point, AttributeBinding, ShaderSources };
use crate::renderers::uniforms::FrameUniforms;
use crate::textures::image::ImageTexture;

/// Interface of a successfully linked shader pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkedProgram {
    pub attributes: Vec<AttributeBinding>,
    pub varyings: Vec<String>,
    pub uniforms: Vec<String>,
}

/// What the last draw call submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub triangle_count: usize,
    pub index_count: usize,
    pub attribute_locations: Vec<u32>,
    pub fog_density: Float,
    pub textured: bool,
    /// Mean of the texels fetched at each vertex's texture coordinate.
    pub texel_mean: Option<[u8; 4]>,
}

/// Renderer without a graphics context. It validates the shader interface the
/// way a driver's compile and link steps would and records draw submissions.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    program: Option<LinkedProgram>,
    texture: Option<ImageTexture>,
    draw_count: u64,
    empty_frames: u64,
    last_draw: Option<DrawRecord>,
}

fn compile(stage: ShaderStage, source: &str) -> Result<(), MeshError> {
    if source.trim().is_empty() {
        return Err(MeshError::ShaderCompile { stage, log: String::from("empty source") });
    }
    if !has_entry_point(source) {
        return Err(MeshError::ShaderCompile { stage, log: String::from("missing entry point 'main'") });
    }
    Ok(())
}

fn link(shaders: &ShaderSources) -> Result<LinkedProgram, MeshError> {
    let outputs = declarations(&shaders.vertex, "out");
    let inputs = declarations(&shaders.fragment, "in");
    if let Some(missing) = inputs.iter().find(|name| !outputs.contains(name)) {
        return Err(MeshError::ShaderLink(format!(
            "fragment input '{}' is not written by the vertex stage",
            missing
        )));
    }

    let mut uniforms = declarations(&shaders.vertex, "uniform");
    for name in declarations(&shaders.fragment, "uniform") {
        if !uniforms.contains(&name) {
            uniforms.push(name);
        }
    }

    Ok(LinkedProgram {
        attributes: attribute_bindings(&shaders.vertex),
        varyings: inputs,
        uniforms,
    })
}

/// Components a buffer supplies at `location`. Positions always sit at 0.
fn supplied_components(bundle: &GeometryBundle, location: u32) -> Option<usize> {
    if location == 0 {
        return Some(3);
    }
    bundle.attributes.iter().find(|a| a.location == location).map(|a| a.components)
}

/// Every input with an explicit location must be fed by a buffer of the same
/// width. A three-component buffer may feed a `vec4`, whose `w` reads as 1.
fn check_layout(program: &LinkedProgram, bundle: &GeometryBundle) -> Result<(), MeshError> {
    for binding in &program.attributes {
        let location = match binding.location {
            Some(location) => location,
            None => continue,
        };
        match supplied_components(bundle, location) {
            None => {
                return Err(MeshError::invalid(format!(
                    "attribute '{}' at location {} has no buffer",
                    binding.name, location
                )))
            }
            Some(supplied) => {
                let fits = supplied == binding.components || (supplied == 3 && binding.components == 4);
                if !fits {
                    return Err(MeshError::invalid(format!(
                        "attribute '{}' at location {} expects {} components, buffer has {}",
                        binding.name, location, binding.components, supplied
                    )));
                }
            }
        }
    }
    Ok(())
}

fn texel_mean(texture: &ImageTexture, bundle: &GeometryBundle) -> Option<[u8; 4]> {
    let coords = bundle.attribute(AttributeKind::TexCoord)?;
    let mut sum = [0u64; 4];
    let mut count = 0u64;
    for uv in coords.data.chunks_exact(2) {
        let texel = texture.sample(Vector2f::new(uv[0], uv[1]));
        for (total, channel) in sum.iter_mut().zip(texel.iter()) {
            *total += *channel as u64;
        }
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let mut mean = [0u8; 4];
    for (out, total) in mean.iter_mut().zip(sum.iter()) {
        *out = (total / count) as u8;
    }
    Some(mean)
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(&self) -> Option<&LinkedProgram> {
        self.program.as_ref()
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    pub fn empty_frames(&self) -> u64 {
        self.empty_frames
    }

    pub fn last_draw(&self) -> Option<&DrawRecord> {
        self.last_draw.as_ref()
    }

    pub fn texture_size(&self) -> Option<(usize, usize)> {
        self.texture.as_ref().map(ImageTexture::dimensions)
    }
}

impl Renderer for HeadlessRenderer {
    fn prepare(&mut self, shaders: &ShaderSources) -> Result<(), MeshError> {
        compile(ShaderStage::Vertex, &shaders.vertex)?;
        compile(ShaderStage::Fragment, &shaders.fragment)?;
        let program = link(shaders)?;
        log::info!(
            "Shader program linked: {} attributes, {} varyings, {} uniforms.",
            program.attributes.len(),
            program.varyings.len(),
            program.uniforms.len()
        );
        self.program = Some(program);
        Ok(())
    }

    fn draw(&mut self, uniforms: &FrameUniforms, geometry: Option<&GeometryBundle>) -> Result<(), MeshError> {
        let program = match &self.program {
            Some(program) => program,
            None => return Err(MeshError::invalid("draw issued before the shader program was linked")),
        };

        let bundle = match geometry {
            Some(bundle) => bundle,
            None => {
                self.empty_frames += 1;
                return Ok(());
            }
        };

        let vertex_count = bundle.vertex_count();
        if bundle.indices.len() % 3 != 0 || bundle.indices.iter().any(|&i| i as usize >= vertex_count) {
            return Err(MeshError::invalid(format!(
                "index buffer of {} entries does not fit {} vertices",
                bundle.indices.len(),
                vertex_count
            )));
        }
        check_layout(program, bundle)?;
        let mean = match (&self.texture, uniforms.textured) {
            (Some(texture), true) => texel_mean(texture, bundle),
            (None, true) => {
                log::warn!("Textured draw without a bound texture.");
                None
            }
            _ => None,
        };

        self.draw_count += 1;
        self.last_draw = Some(DrawRecord {
            triangle_count: bundle.triangle_count,
            index_count: bundle.index_count(),
            attribute_locations: bundle.attributes.iter().map(|a| a.location).collect(),
            fog_density: uniforms.fog.density(),
            textured: uniforms.textured,
            texel_mean: mean,
        });
        log::trace!("Draw {}: {} triangles.", self.draw_count, bundle.triangle_count);
        Ok(())
    }

    fn bind_texture(&mut self, texture: &ImageTexture) -> Result<(), MeshError> {
        let (width, height) = texture.dimensions();
        log::debug!("Bound {}x{} texture, {} bytes.", width, height, texture.raw_data().len());
        self.texture = Some(texture.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        let texture = match self.texture_size() {
            Some((width, height)) => format!("{}x{}", width, height),
            None => String::from("none"),
        };
        format!(
            "HeadlessRenderer\n  draws: {}\n  empty frames: {}\n  texture: {}",
            self.draw_count, self.empty_frames, texture
        )
    }
}
