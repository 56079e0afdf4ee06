// Copyright @yucwang 2026

use std::fmt;
use std::fs;
use std::path::Path;

use wavefront_obj::{obj, ParseError};

use crate::core::error::MeshError;
use crate::core::mesh::{ Attribute, Mesh, TriangleIndices };
use crate::math::constants::{ Float, Vector3f, Vector4f };

/// Largest vertex-to-vertex distance of an imported model after rescaling.
pub const OBJ_TARGET_SPAN: Float = 2.0;

/// Color given to models without texture coordinates.
pub const OBJ_DEFAULT_COLOR: [Float; 4] = [0.8, 0.8, 0.8, 1.0];

#[derive(Debug)]
pub enum ObjLoadError {
    Io(std::io::Error),
    Parse(ParseError),
    Syntax { line: usize, message: String },
    Empty,
    Mesh(MeshError),
}

impl From<std::io::Error> for ObjLoadError {
    fn from(err: std::io::Error) -> Self {
        ObjLoadError::Io(err)
    }
}

impl From<ParseError> for ObjLoadError {
    fn from(err: ParseError) -> Self {
        ObjLoadError::Parse(err)
    }
}

impl From<MeshError> for ObjLoadError {
    fn from(err: MeshError) -> Self {
        ObjLoadError::Mesh(err)
    }
}

impl fmt::Display for ObjLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjLoadError::Io(err) => write!(f, "io error: {}", err),
            ObjLoadError::Parse(err) => write!(f, "parse error: {}", err),
            ObjLoadError::Syntax { line, message } => write!(f, "line {}: {}", line, message),
            ObjLoadError::Empty => write!(f, "no vertices"),
            ObjLoadError::Mesh(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ObjLoadError {}

/// How faces with more than three corners are turned into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacePolicy {
    /// Keep corners 1..=3 and drop the rest, including corner 0. Lossy for
    /// every polygon; quads lose half their area.
    Truncate,
    /// Fan-triangulate around corner 0.
    Fan,
}

impl Default for FacePolicy {
    fn default() -> Self {
        FacePolicy::Truncate
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub vertices: Vec<Vector3f>,
    pub normals: Vec<Vector3f>,
    pub faces: Vec<TriangleIndices>,
    /// `vt` lines seen. Texture coordinates are not kept.
    pub tex_coord_count: usize,
}

pub fn parse_obj(input: &str, policy: FacePolicy) -> Result<ObjData, ObjLoadError> {
    let data = match policy {
        FacePolicy::Truncate => parse_obj_lines(input)?,
        FacePolicy::Fan => obj_set_to_data(parse_obj_set(input)?),
    };
    if data.vertices.is_empty() {
        return Err(ObjLoadError::Empty);
    }
    Ok(data)
}

fn parse_vec3<'a, I>(tokens: I, line: usize, what: &str) -> Result<Vector3f, ObjLoadError>
where
    I: Iterator<Item = &'a str>,
{
    let mut coords = [0.0 as Float; 3];
    let mut count = 0;
    // Components past the third (e.g. a vertex weight) are dropped.
    for token in tokens.take(3) {
        coords[count] = token.parse::<Float>().map_err(|_| ObjLoadError::Syntax {
            line,
            message: format!("invalid {} component '{}'", what, token),
        })?;
        count += 1;
    }
    if count < 3 {
        return Err(ObjLoadError::Syntax {
            line,
            message: format!("{} needs 3 components, found {}", what, count),
        });
    }
    Ok(Vector3f::new(coords[0], coords[1], coords[2]))
}

fn parse_corner(token: &str, line: usize) -> Result<u32, ObjLoadError> {
    let vertex = token.split('/').next().unwrap_or("");
    match vertex.parse::<u32>() {
        Ok(index) if index >= 1 => Ok(index - 1),
        _ => Err(ObjLoadError::Syntax {
            line,
            message: format!("invalid face corner '{}'", token),
        }),
    }
}

fn parse_obj_lines(input: &str) -> Result<ObjData, ObjLoadError> {
    let mut data = ObjData::default();
    let mut face_lines = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let mut tokens = raw.split_whitespace();
        match tokens.next() {
            Some("v") => data.vertices.push(parse_vec3(tokens, line, "vertex")?),
            Some("vn") => data.normals.push(parse_vec3(tokens, line, "normal")?),
            Some("vt") => data.tex_coord_count += 1,
            Some("f") => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() < 3 {
                    return Err(ObjLoadError::Syntax {
                        line,
                        message: format!("face needs 3 corners, found {}", corners.len()),
                    });
                }
                let kept = if corners.len() > 3 { &corners[1..4] } else { &corners[..] };
                data.faces.push([
                    parse_corner(kept[0], line)?,
                    parse_corner(kept[1], line)?,
                    parse_corner(kept[2], line)?,
                ]);
                face_lines.push(line);
            }
            _ => {}
        }
    }

    let vertex_count = data.vertices.len();
    for (face, line) in data.faces.iter().zip(face_lines) {
        if let Some(bad) = face.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(ObjLoadError::Syntax {
                line,
                message: format!("face references vertex {} of {}", bad + 1, vertex_count),
            });
        }
    }

    Ok(data)
}

pub fn parse_obj_set<S: AsRef<str>>(input: S) -> Result<obj::ObjSet, ParseError> {
    let triangulated = triangulate_faces(input.as_ref());
    obj::parse(triangulated)
}

fn obj_set_to_data(obj_set: obj::ObjSet) -> ObjData {
    let mut data = ObjData::default();
    for object in obj_set.objects {
        let base = data.vertices.len();
        for v in object.vertices {
            data.vertices.push(Vector3f::new(v.x as f32, v.y as f32, v.z as f32));
        }
        for vn in object.normals {
            data.normals.push(Vector3f::new(vn.x as f32, vn.y as f32, vn.z as f32));
        }
        data.tex_coord_count += object.tex_vertices.len();
        for geom in object.geometry {
            for shape in geom.shapes {
                if let obj::Primitive::Triangle(a, b, c) = shape.primitive {
                    data.faces.push([(base + a.0) as u32, (base + b.0) as u32, (base + c.0) as u32]);
                }
            }
        }
    }
    data
}

fn triangulate_faces(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("f ") || trimmed.starts_with("f\t") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() > 4 {
                let base = parts[1];
                for i in 2..(parts.len() - 1) {
                    out.push_str("f ");
                    out.push_str(base);
                    out.push(' ');
                    out.push_str(parts[i]);
                    out.push(' ');
                    out.push_str(parts[i + 1]);
                    out.push('\n');
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Largest distance between any two vertices. Quadratic in the vertex count.
pub fn max_separation(vertices: &[Vector3f]) -> Float {
    let mut max_sep: Float = 0.0;
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            max_sep = max_sep.max((vertices[i] - vertices[j]).norm());
        }
    }
    max_sep
}

/// Scales the vertices so their maximum separation is `target_span`, then
/// moves their centroid to the origin. Coincident vertices are only centered.
pub fn normalize_extent(vertices: &mut [Vector3f], target_span: Float) {
    if vertices.is_empty() {
        return;
    }

    let span = max_separation(vertices);
    if span > 0.0 {
        let scale = target_span / span;
        for v in vertices.iter_mut() {
            *v *= scale;
        }
    }

    let centroid = vertices.iter().fold(Vector3f::zeros(), |acc, v| acc + v) / vertices.len() as Float;
    for v in vertices.iter_mut() {
        *v -= centroid;
    }
}

fn build_mesh(data: ObjData) -> Result<Mesh, ObjLoadError> {
    let vertex_count = data.vertices.len();
    let mut mesh = Mesh::new(data.vertices, data.faces)?;
    mesh.set_attribute(Attribute::Color(vec![Vector4f::from(OBJ_DEFAULT_COLOR); vertex_count]))?;

    if data.normals.len() == vertex_count {
        mesh.set_attribute(Attribute::Normal(data.normals))?;
    } else {
        if !data.normals.is_empty() {
            log::warn!(
                "OBJ has {} normals for {} vertices, estimating normals instead.",
                data.normals.len(),
                vertex_count
            );
        }
        mesh.add_adjacency_normals()?;
    }
    Ok(mesh)
}

pub fn load_obj_from_str<S: AsRef<str>>(input: S, policy: FacePolicy) -> Result<Mesh, ObjLoadError> {
    let mut data = parse_obj(input.as_ref(), policy)?;
    if data.tex_coord_count > 0 {
        log::debug!("Ignoring {} texture coordinates.", data.tex_coord_count);
    }
    normalize_extent(&mut data.vertices, OBJ_TARGET_SPAN);
    build_mesh(data)
}

pub fn load_obj_from_file<P: AsRef<Path>>(path: P, policy: FacePolicy) -> Result<Mesh, ObjLoadError> {
    log::info!("Starting reading OBJ model from: {}.", path.as_ref().display());
    let text = fs::read_to_string(path)?;
    let mesh = load_obj_from_str(text, policy)?;
    log::info!("OBJ loaded, vertices = {}, triangles = {}.", mesh.vertex_count(), mesh.triangle_count());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::AttributeKind;

    const CUBE: &str = "\
# unit cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
vt 0 0
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";

    // Same winding, smallest index first.
    fn rotate_min_first(face: [u32; 3]) -> [u32; 3] {
        let start = (0..3).min_by_key(|&i| face[i]).unwrap();
        [face[start], face[(start + 1) % 3], face[(start + 2) % 3]]
    }

    #[test]
    fn test_parse_triangle() {
        let data = parse_obj("v 0 0 0\nv 1 0 0 1.0\nv 0 1 0\nf 1 2 3\n", FacePolicy::Truncate).unwrap();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.vertices[1], Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(data.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_truncate_drops_first_corner() {
        let data = parse_obj(CUBE, FacePolicy::Truncate).unwrap();
        assert_eq!(data.faces.len(), 6);
        assert_eq!(data.faces[0], [3, 2, 1]);
        assert_eq!(data.tex_coord_count, 1);
    }

    #[test]
    fn test_fan_keeps_whole_polygon() {
        let data = parse_obj(CUBE, FacePolicy::Fan).unwrap();
        assert_eq!(data.vertices.len(), 8);
        assert_eq!(data.faces.len(), 12);
        assert_eq!(rotate_min_first(data.faces[0]), [0, 3, 2]);
        assert_eq!(rotate_min_first(data.faces[1]), [0, 2, 1]);
    }

    #[test]
    fn test_slash_corners() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1/1/1 2/2/1 3//1\n";
        let data = parse_obj(input, FacePolicy::Truncate).unwrap();
        assert_eq!(data.faces, vec![[0, 1, 2]]);
        assert_eq!(data.normals.len(), 1);
    }

    #[test]
    fn test_cube_rescaled_to_target_span() {
        let mesh = load_obj_from_str(CUBE, FacePolicy::Truncate).unwrap();
        let span = max_separation(mesh.positions());
        assert!((span - OBJ_TARGET_SPAN).abs() < 1e-5);

        let centroid = mesh.positions().iter().fold(Vector3f::zeros(), |acc, v| acc + v) / 8.0;
        assert!(centroid.norm() < 1e-6);

        let kinds: Vec<AttributeKind> = mesh.attributes().iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec![AttributeKind::Color, AttributeKind::Normal]);
    }

    #[test]
    fn test_file_normals_used_when_complete() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nvn 1 0 0\nvn 1 0 0\nf 1 2 3\n";
        let mesh = load_obj_from_str(input, FacePolicy::Truncate).unwrap();
        assert!(mesh.normals().unwrap().iter().all(|n| *n == Vector3f::x()));

        let partial = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nf 1 2 3\n";
        let mesh = load_obj_from_str(partial, FacePolicy::Truncate).unwrap();
        assert!(mesh.normals().unwrap().iter().all(|n| (n - Vector3f::z()).norm() < 1e-6));
    }

    #[test]
    fn test_bad_input_reports_line() {
        let err = parse_obj("v 0 0 0\nv 1 0\n", FacePolicy::Truncate).unwrap_err();
        assert!(matches!(err, ObjLoadError::Syntax { line: 2, .. }));

        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n", FacePolicy::Truncate).unwrap_err();
        assert!(matches!(err, ObjLoadError::Syntax { line: 4, .. }));

        let err = parse_obj("v 0 0 0\nf 0 1 1\n", FacePolicy::Truncate).unwrap_err();
        assert!(matches!(err, ObjLoadError::Syntax { line: 2, .. }));

        assert!(matches!(parse_obj("# nothing\n", FacePolicy::Truncate), Err(ObjLoadError::Empty)));
    }

    #[test]
    fn test_normalize_coincident_vertices() {
        let mut vertices = vec![Vector3f::new(3.0, 3.0, 3.0); 4];
        normalize_extent(&mut vertices, OBJ_TARGET_SPAN);
        assert!(vertices.iter().all(|v| v.norm() < 1e-6));
    }
}
