// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{ Path, PathBuf };
use std::str::FromStr;

use quick_xml::events::{ BytesStart, Event };
use quick_xml::Reader;

use crate::core::rng::LcgRng;
use crate::core::scene::{ GeometrySource, ModelMotion, Scene, SceneRequest, SpinAxis };
use crate::io::obj_utils::FacePolicy;
use crate::math::constants::{ Float, Int, Vector3f };
use crate::renderers::frame_loop::{ ScheduledRequest, DEFAULT_TICK_RATE };
use crate::renderers::uniforms::{ FogCommand, FogSettings };
use crate::sensors::camera::{ Camera, FlightControl, Projection };
use crate::sensors::flight::FlightCamera;
use crate::sensors::perspective::PerspectiveCamera;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
    InvalidValue { field: &'static str, value: String },
}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl From<quick_xml::Error> for SceneLoadError {
    fn from(err: quick_xml::Error) -> Self {
        SceneLoadError::Parse(err.to_string())
    }
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(err) => write!(f, "io error: {}", err),
            SceneLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            SceneLoadError::MissingField(field) => write!(f, "missing field: {}", field),
            SceneLoadError::InvalidValue { field, value } => {
                write!(f, "invalid value '{}' for {}", value, field)
            }
        }
    }
}

impl std::error::Error for SceneLoadError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraDescription {
    Perspective { origin: Vector3f, target: Vector3f, up: Vector3f, projection: Projection },
    Flight { position: Vector3f, projection: Projection },
}

impl Default for CameraDescription {
    fn default() -> Self {
        CameraDescription::Perspective {
            origin: Vector3f::new(1.0, 1.1, 1.0),
            target: Vector3f::zeros(),
            up: Vector3f::y(),
            projection: Projection::default(),
        }
    }
}

impl CameraDescription {
    pub fn build(&self) -> Box<dyn Camera> {
        match self {
            CameraDescription::Perspective { origin, target, up, projection } => {
                Box::new(PerspectiveCamera::new(*origin, *target, *up, *projection))
            }
            CameraDescription::Flight { position, projection } => {
                Box::new(FlightCamera::new(*position, *projection))
            }
        }
    }
}

/// Parsed scene file. Command-line overrides edit this before the scene is
/// built.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub seed: Option<u64>,
    pub ticks: Option<u64>,
    pub tick_rate: Float,
    pub shaders_dir: PathBuf,
    pub geometry: Option<GeometrySource>,
    pub appearance: Option<String>,
    pub camera: CameraDescription,
    pub fog: Option<FogSettings>,
    pub motion: ModelMotion,
    pub schedule: Vec<ScheduledRequest>,
}

impl SceneDescription {
    /// The initial geometry and appearance are queued, so the first tick
    /// installs them and reports failures like any later request.
    pub fn build_scene(&self) -> Scene {
        let rng = match self.seed {
            Some(seed) => LcgRng::new(seed),
            None => LcgRng::from_entropy(),
        };
        let mut scene = Scene::new(self.camera.build(), rng);
        scene.set_motion(self.motion);
        if let Some(fog) = self.fog {
            scene.set_fog(fog);
        }
        if let Some(geometry) = &self.geometry {
            scene.request(SceneRequest::Regenerate(geometry.clone()));
        }
        if let Some(appearance) = &self.appearance {
            scene.request(SceneRequest::SetAppearance(appearance.clone()));
        }
        scene
    }
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneDescription, SceneLoadError> {
    let path = path.as_ref();
    log::info!("Loading scene from: {}.", path.display());
    let xml = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_scene(&xml, base_dir)
}

type Attributes = HashMap<String, String>;

struct PendingInput {
    tick: u64,
    filled: bool,
}

struct SceneParser<'a> {
    base_dir: &'a Path,
    defaults: HashMap<String, String>,
    in_scene: bool,
    seed: Option<u64>,
    ticks: Option<u64>,
    tick_rate: Float,
    shaders_dir: Option<PathBuf>,
    geometry: Option<GeometrySource>,
    appearance: Option<String>,
    camera: CameraDescription,
    fog: Option<FogSettings>,
    motion: ModelMotion,
    schedule: Vec<ScheduledRequest>,
    pending_input: Option<PendingInput>,
}

pub fn parse_scene(xml: &str, base_dir: &Path) -> Result<SceneDescription, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut parser = SceneParser::new(base_dir);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => parser.element(&e, false)?,
            Ok(Event::Empty(e)) => parser.element(&e, true)?,
            Ok(Event::End(e)) => parser.end(e.name().as_ref())?,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

impl<'a> SceneParser<'a> {
    fn new(base_dir: &'a Path) -> Self {
        Self {
            base_dir,
            defaults: HashMap::new(),
            in_scene: false,
            seed: None,
            ticks: None,
            tick_rate: DEFAULT_TICK_RATE,
            shaders_dir: None,
            geometry: None,
            appearance: None,
            camera: CameraDescription::default(),
            fog: None,
            motion: ModelMotion::Still,
            schedule: Vec::new(),
            pending_input: None,
        }
    }

    fn attributes(&self, e: &BytesStart) -> Result<Attributes, SceneLoadError> {
        let mut attrs = Attributes::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| SceneLoadError::Parse(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()?;
            attrs.insert(key, resolve_value(&value, &self.defaults));
        }
        Ok(attrs)
    }

    fn resolve_path(&self, value: &str) -> PathBuf {
        if Path::new(value).is_absolute() {
            PathBuf::from(value)
        } else {
            self.base_dir.join(value)
        }
    }

    /// Image appearances name files relative to the scene; colors pass through.
    fn resolve_appearance(&self, value: &str) -> String {
        if value.ends_with(".png") || value.ends_with(".jpg") {
            self.resolve_path(value).to_string_lossy().to_string()
        } else {
            value.to_string()
        }
    }

    fn element(&mut self, e: &BytesStart, empty: bool) -> Result<(), SceneLoadError> {
        let name = e.name();
        let name = name.as_ref();
        let attrs = self.attributes(e)?;

        if !self.in_scene {
            if name != b"scene" {
                return Err(SceneLoadError::Parse(format!(
                    "root element must be <scene>, found <{}>",
                    String::from_utf8_lossy(name)
                )));
            }
            self.in_scene = true;
            self.seed = parse_attr(&attrs, "seed", "scene.seed")?;
            self.ticks = parse_attr(&attrs, "ticks", "scene.ticks")?;
            if let Some(rate) = parse_attr::<Float>(&attrs, "rate", "scene.rate")? {
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(invalid("scene.rate", rate));
                }
                self.tick_rate = rate;
            }
            return Ok(());
        }

        if let Some(source) = self.geometry_source(name, &attrs)? {
            match self.pending_input.as_mut() {
                Some(pending) => {
                    pending.filled = true;
                    let tick = pending.tick;
                    self.schedule.push(ScheduledRequest { tick, request: SceneRequest::Regenerate(source) });
                }
                None => self.geometry = Some(source),
            }
            return Ok(());
        }

        match name {
            b"default" => {
                let key = required(&attrs, "name", "default.name")?.to_string();
                let value = required(&attrs, "value", "default.value")?.to_string();
                self.defaults.insert(key, value);
            }
            b"shaders" => {
                self.shaders_dir = Some(self.resolve_path(required(&attrs, "dir", "shaders.dir")?));
            }
            b"appearance" => {
                self.appearance = Some(self.resolve_appearance(required(&attrs, "value", "appearance.value")?));
            }
            b"camera" => self.camera = parse_camera(&attrs)?,
            b"fog" => {
                let density = parse_attr(&attrs, "density", "fog.density")?.unwrap_or(1.0);
                let color = match attrs.get("color") {
                    Some(value) => parse_vec3(value, "fog.color")?,
                    None => Vector3f::new(1.0, 1.0, 1.0),
                };
                let mut fog = FogSettings::new(density, color);
                if !parse_attr(&attrs, "enabled", "fog.enabled")?.unwrap_or(true) {
                    fog.toggle();
                }
                self.fog = Some(fog);
            }
            b"spin" => {
                let axis = match attrs.get("axis").map(String::as_str).unwrap_or("y") {
                    "y" => SpinAxis::Y,
                    "z" => SpinAxis::Z,
                    other => return Err(invalid("spin.axis", other)),
                };
                let rate = parse_attr(&attrs, "rate", "spin.rate")?.unwrap_or(1.0);
                self.motion = ModelMotion::Spin { axis, rate };
            }
            b"pulse" => {
                let rate = parse_attr(&attrs, "rate", "pulse.rate")?.unwrap_or(1.0);
                self.motion = ModelMotion::Pulse { rate };
            }
            b"script" => {}
            b"input" => self.input(&attrs, empty)?,
            other => {
                log::warn!("Ignoring unknown scene element <{}>.", String::from_utf8_lossy(other));
            }
        }
        Ok(())
    }

    fn input(&mut self, attrs: &Attributes, empty: bool) -> Result<(), SceneLoadError> {
        let tick = parse_attr(attrs, "tick", "input.tick")?.ok_or(SceneLoadError::MissingField("input.tick"))?;
        let action = required(attrs, "action", "input.action")?;

        let request = match action {
            "exit" => SceneRequest::Exit,
            "appearance" => {
                SceneRequest::SetAppearance(self.resolve_appearance(required(attrs, "value", "input.value")?))
            }
            "regenerate" => {
                if empty {
                    return Err(SceneLoadError::MissingField("input.geometry"));
                }
                self.pending_input = Some(PendingInput { tick, filled: false });
                return Ok(());
            }
            other => match (FlightControl::from_name(other), FogCommand::from_name(other)) {
                (Some(control), _) => SceneRequest::Steer(control),
                (None, Some(command)) => SceneRequest::Fog(command),
                (None, None) => return Err(invalid("input.action", other)),
            },
        };
        self.schedule.push(ScheduledRequest { tick, request });
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<(), SceneLoadError> {
        if name == b"input" {
            if let Some(pending) = self.pending_input.take() {
                if !pending.filled {
                    return Err(SceneLoadError::MissingField("input.geometry"));
                }
            }
        }
        Ok(())
    }

    fn geometry_source(&self, name: &[u8], attrs: &Attributes) -> Result<Option<GeometrySource>, SceneLoadError> {
        let source = match name {
            b"terrain" => GeometrySource::Terrain {
                resolution: parse_attr(attrs, "resolution", "terrain.resolution")?
                    .ok_or(SceneLoadError::MissingField("terrain.resolution"))?,
                faults: parse_attr::<Int>(attrs, "faults", "terrain.faults")?.unwrap_or(0),
                weathering: parse_attr::<Int>(attrs, "weathering", "terrain.weathering")?.unwrap_or(0),
                scale: parse_attr(attrs, "scale", "terrain.scale")?.unwrap_or(1.0),
                textured: parse_attr(attrs, "textured", "terrain.textured")?.unwrap_or(false),
            },
            b"sphere" => GeometrySource::Sphere {
                rings: parse_attr(attrs, "rings", "sphere.rings")?.ok_or(SceneLoadError::MissingField("sphere.rings"))?,
                slices: parse_attr(attrs, "slices", "sphere.slices")?.ok_or(SceneLoadError::MissingField("sphere.slices"))?,
            },
            b"icosphere" => GeometrySource::Icosphere {
                rounds: parse_attr(attrs, "rounds", "icosphere.rounds")?.unwrap_or(0),
            },
            b"logo" => GeometrySource::Logo {
                jitter: parse_attr(attrs, "jitter", "logo.jitter")?.unwrap_or(0.0),
            },
            b"model" => {
                let policy = match attrs.get("policy").map(String::as_str).unwrap_or("truncate") {
                    "truncate" => FacePolicy::Truncate,
                    "fan" => FacePolicy::Fan,
                    other => return Err(invalid("model.policy", other)),
                };
                GeometrySource::Model { path: self.resolve_path(required(attrs, "path", "model.path")?), policy }
            }
            _ => return Ok(None),
        };
        Ok(Some(source))
    }

    fn finish(self) -> Result<SceneDescription, SceneLoadError> {
        if !self.in_scene {
            return Err(SceneLoadError::Parse(String::from("no <scene> element")));
        }
        let shaders_dir = self.shaders_dir.ok_or(SceneLoadError::MissingField("shaders.dir"))?;
        let mut schedule = self.schedule;
        schedule.sort_by_key(|s| s.tick);

        Ok(SceneDescription {
            seed: self.seed,
            ticks: self.ticks,
            tick_rate: self.tick_rate,
            shaders_dir,
            geometry: self.geometry,
            appearance: self.appearance,
            camera: self.camera,
            fog: self.fog,
            motion: self.motion,
            schedule,
        })
    }
}

fn parse_camera(attrs: &Attributes) -> Result<CameraDescription, SceneLoadError> {
    let defaults = Projection::default();
    let projection = Projection {
        fov_y: parse_attr(attrs, "fov", "camera.fov")?.unwrap_or(defaults.fov_y),
        aspect: parse_attr(attrs, "aspect", "camera.aspect")?.unwrap_or(defaults.aspect),
        near_clip: parse_attr(attrs, "near", "camera.near")?.unwrap_or(defaults.near_clip),
        far_clip: parse_attr(attrs, "far", "camera.far")?.unwrap_or(defaults.far_clip),
    };
    let vec3_or = |key: &str, field: &'static str, fallback: Vector3f| match attrs.get(key) {
        Some(value) => parse_vec3(value, field),
        None => Ok(fallback),
    };

    match attrs.get("type").map(String::as_str).unwrap_or("perspective") {
        "perspective" => Ok(CameraDescription::Perspective {
            origin: vec3_or("origin", "camera.origin", Vector3f::new(1.0, 1.1, 1.0))?,
            target: vec3_or("target", "camera.target", Vector3f::zeros())?,
            up: vec3_or("up", "camera.up", Vector3f::y())?,
            projection,
        }),
        "flight" => Ok(CameraDescription::Flight {
            position: vec3_or("position", "camera.position", Vector3f::zeros())?,
            projection,
        }),
        other => Err(invalid("camera.type", other)),
    }
}

fn invalid<V: ToString>(field: &'static str, value: V) -> SceneLoadError {
    SceneLoadError::InvalidValue { field, value: value.to_string() }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn required<'a>(attrs: &'a Attributes, key: &str, field: &'static str) -> Result<&'a str, SceneLoadError> {
    attrs.get(key).map(String::as_str).ok_or(SceneLoadError::MissingField(field))
}

fn parse_attr<T: FromStr>(attrs: &Attributes, key: &str, field: &'static str) -> Result<Option<T>, SceneLoadError> {
    match attrs.get(key) {
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|_| invalid(field, value)),
        None => Ok(None),
    }
}

fn parse_vec3(value: &str, field: &'static str) -> Result<Vector3f, SceneLoadError> {
    let parts: Vec<&str> = value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if parts.len() != 3 {
        return Err(invalid(field, value));
    }
    let mut v = Vector3f::zeros();
    for (i, part) in parts.iter().enumerate() {
        v[i] = part.parse::<Float>().map_err(|_| invalid(field, value))?;
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r##"
<scene seed="42" ticks="240" rate="30">
    <default name="size" value="64"/>
    <shaders dir="shaders/terrain"/>
    <terrain resolution="$size" faults="80" weathering="3" scale="0.8"/>
    <appearance value="earth.png"/>
    <camera type="flight" position="0, 0.5, 1.5" far="50"/>
    <fog density="0.7" enabled="false"/>
    <spin axis="z" rate="0.25"/>
    <script>
        <input tick="20" action="fog-toggle"/>
        <input tick="10" action="forward"/>
        <input tick="30" action="regenerate">
            <sphere rings="8" slices="16"/>
        </input>
        <input tick="40" action="appearance" value="#ff000080"/>
        <input tick="90" action="exit"/>
    </script>
</scene>
"##;

    #[test]
    fn test_parse_full_scene() {
        let desc = parse_scene(SCENE, Path::new("/data/scenes")).unwrap();
        assert_eq!(desc.seed, Some(42));
        assert_eq!(desc.ticks, Some(240));
        assert_eq!(desc.tick_rate, 30.0);
        assert_eq!(desc.shaders_dir, PathBuf::from("/data/scenes/shaders/terrain"));
        assert_eq!(
            desc.geometry,
            Some(GeometrySource::Terrain { resolution: 64, faults: 80, weathering: 3, scale: 0.8, textured: false })
        );
        assert_eq!(desc.appearance.as_deref(), Some("/data/scenes/earth.png"));
        match &desc.camera {
            CameraDescription::Flight { position, projection } => {
                assert_eq!(*position, Vector3f::new(0.0, 0.5, 1.5));
                assert_eq!(projection.far_clip, 50.0);
            }
            other => panic!("unexpected camera {:?}", other),
        }
        let fog = desc.fog.unwrap();
        assert!(!fog.is_enabled());
        assert_eq!(desc.motion, ModelMotion::Spin { axis: SpinAxis::Z, rate: 0.25 });

        let ticks: Vec<u64> = desc.schedule.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![10, 20, 30, 40, 90]);
        assert_eq!(desc.schedule[0].request, SceneRequest::Steer(FlightControl::Forward));
        assert_eq!(desc.schedule[1].request, SceneRequest::Fog(FogCommand::Toggle));
        assert_eq!(
            desc.schedule[2].request,
            SceneRequest::Regenerate(GeometrySource::Sphere { rings: 8, slices: 16 })
        );
        assert_eq!(desc.schedule[3].request, SceneRequest::SetAppearance(String::from("#ff000080")));
        assert_eq!(desc.schedule[4].request, SceneRequest::Exit);
    }

    #[test]
    fn test_minimal_scene_defaults() {
        let desc = parse_scene("<scene><shaders dir='s'/></scene>", Path::new("base")).unwrap();
        assert_eq!(desc.seed, None);
        assert_eq!(desc.tick_rate, DEFAULT_TICK_RATE);
        assert_eq!(desc.camera, CameraDescription::default());
        assert!(desc.geometry.is_none());
        assert!(desc.schedule.is_empty());
        assert_eq!(desc.motion, ModelMotion::Still);

        let desc = parse_scene("<scene><shaders dir='s'/><logo/><pulse rate='2'/></scene>", Path::new("base")).unwrap();
        assert_eq!(desc.motion, ModelMotion::Pulse { rate: 2.0 });
    }

    #[test]
    fn test_build_scene_installs_on_first_requests() {
        let xml = "<scene seed='5'><shaders dir='s'/><model path='cube.obj' policy='fan'/><sphere rings='3' slices='6'/></scene>";
        let desc = parse_scene(xml, Path::new("/models")).unwrap();
        assert_eq!(desc.geometry, Some(GeometrySource::Sphere { rings: 3, slices: 6 }));

        let mut scene = desc.build_scene();
        assert!(scene.mesh().is_none());
        scene.process_requests();
        assert_eq!(scene.mesh().unwrap().triangle_count(), 2 * 3 * 6);
    }

    #[test]
    fn test_errors() {
        let missing = parse_scene("<scene/>", Path::new("."));
        assert!(matches!(missing, Err(SceneLoadError::MissingField("shaders.dir"))));

        let bad_camera = parse_scene("<scene><shaders dir='s'/><camera type='ortho'/></scene>", Path::new("."));
        assert!(matches!(bad_camera, Err(SceneLoadError::InvalidValue { field: "camera.type", .. })));

        let bad_number = parse_scene("<scene><shaders dir='s'/><sphere rings='many' slices='4'/></scene>", Path::new("."));
        assert!(matches!(bad_number, Err(SceneLoadError::InvalidValue { field: "sphere.rings", .. })));

        let bad_root = parse_scene("<world/>", Path::new("."));
        assert!(matches!(bad_root, Err(SceneLoadError::Parse(_))));

        let empty_regen = "<scene><shaders dir='s'/><input tick='1' action='regenerate'></input></scene>";
        assert!(matches!(
            parse_scene(empty_regen, Path::new(".")),
            Err(SceneLoadError::MissingField("input.geometry"))
        ));

        let bad_action = "<scene><shaders dir='s'/><input tick='1' action='jump'/></scene>";
        assert!(matches!(
            parse_scene(bad_action, Path::new(".")),
            Err(SceneLoadError::InvalidValue { field: "input.action", .. })
        ));
    }
}
