// Copyright @yucwang 2026

use std::fs;
use std::path::Path;

use crate::core::error::{ MeshError, ShaderStage };

pub const VERTEX_SHADER_FILE: &str = "vertshader.glsl";
pub const FRAGMENT_SHADER_FILE: &str = "fragshader.glsl";

const IGNORED_QUALIFIERS: [&str; 6] = ["lowp", "mediump", "highp", "flat", "smooth", "centroid"];

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

fn read_stage(dir: &Path, file: &str) -> Result<String, MeshError> {
    let path = dir.join(file);
    fs::read_to_string(&path).map_err(|e| MeshError::resource(&path, e))
}

impl ShaderSources {
    pub fn new<S: Into<String>>(vertex: S, fragment: S) -> Self {
        Self { vertex: vertex.into(), fragment: fragment.into() }
    }

    /// Reads both stages from `dir`. Either file missing aborts setup.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, MeshError> {
        let dir = dir.as_ref();
        log::info!("Loading shaders from: {}.", dir.display());
        let vertex = read_stage(dir, VERTEX_SHADER_FILE)?;
        let fragment = read_stage(dir, FRAGMENT_SHADER_FILE)?;
        Ok(Self { vertex, fragment })
    }

    pub fn source(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or("")
}

pub fn has_entry_point(source: &str) -> bool {
    let tokens: Vec<&str> = source
        .lines()
        .map(strip_comment)
        .flat_map(|line| line.split_whitespace())
        .collect();
    tokens
        .windows(2)
        .any(|w| w[0] == "void" && (w[1] == "main" || w[1].starts_with("main(")))
}

/// A vertex input as the program declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    pub name: String,
    pub location: Option<u32>,
    pub components: usize,
}

struct Declaration<'a> {
    location: Option<u32>,
    qualifier: &'a str,
    ty: &'a str,
    name: &'a str,
}

fn layout_location(layout: &str) -> Option<u32> {
    layout.split(',').find_map(|entry| {
        let mut kv = entry.splitn(2, '=');
        if kv.next()?.trim() != "location" {
            return None;
        }
        kv.next()?.trim().parse().ok()
    })
}

fn parse_declaration(line: &str) -> Option<Declaration<'_>> {
    let mut code = strip_comment(line).trim();
    let mut location = None;
    if code.starts_with("layout") {
        let open = code.find('(')?;
        let close = code.find(')')?;
        location = layout_location(code.get(open + 1..close)?);
        code = &code[close + 1..];
    }
    let mut tokens = code
        .split(|c: char| c.is_whitespace() || c == ';')
        .filter(|t| !t.is_empty() && !IGNORED_QUALIFIERS.contains(t));
    let qualifier = tokens.next()?;
    let ty = tokens.next()?;
    let name = tokens.next()?;
    Some(Declaration { location, qualifier, ty, name: name.split('[').next().unwrap_or(name) })
}

/// Scalar count of a GLSL type; zero for anything that is not a scalar or
/// vector.
fn type_components(ty: &str) -> usize {
    match ty {
        "float" | "int" | "uint" | "bool" => 1,
        "vec2" | "ivec2" | "uvec2" | "bvec2" => 2,
        "vec3" | "ivec3" | "uvec3" | "bvec3" => 3,
        "vec4" | "ivec4" | "uvec4" | "bvec4" => 4,
        _ => 0,
    }
}

/// Names declared at global scope with `qualifier` (`in`, `out`, `uniform`),
/// in source order.
pub fn declarations(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(parse_declaration)
        .filter(|d| d.qualifier == qualifier)
        .map(|d| d.name.to_string())
        .collect()
}

/// Vertex inputs of a vertex stage with their `layout(location = N)` slots.
pub fn attribute_bindings(source: &str) -> Vec<AttributeBinding> {
    source
        .lines()
        .filter_map(parse_declaration)
        .filter(|d| d.qualifier == "in")
        .map(|d| AttributeBinding {
            name: d.name.to_string(),
            location: d.location,
            components: type_components(d.ty),
        })
        .collect()
}
