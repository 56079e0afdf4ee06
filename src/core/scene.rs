// Copyright @yucwang 2026

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::core::error::MeshError;
use crate::core::geometry::GeometryBundle;
use crate::core::mesh::Mesh;
use crate::core::rng::LcgRng;
use crate::io::obj_utils::{ load_obj_from_file, FacePolicy };
use crate::math::constants::{ Float, Int, Matrix4f, Vector3f };
use crate::math::transform::Transform;
use crate::perturb::fault::FaultFormation;
use crate::perturb::jitter::Jitter;
use crate::perturb::weathering::Weathering;
use crate::renderers::uniforms::{ FogCommand, FogSettings, FrameUniforms };
use crate::sensors::camera::{ Camera, FlightControl };
use crate::shapes::grid::{ generate_grid, generate_textured_grid };
use crate::shapes::icosahedron::{ generate_icosahedron, subdivide };
use crate::shapes::logo::generate_logo;
use crate::shapes::sphere::generate_sphere;
use crate::textures::appearance::Appearance;
use crate::textures::image::ImageTexture;

/// Recipe for the installed mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    Terrain { resolution: usize, faults: Int, weathering: Int, scale: Float, textured: bool },
    Sphere { rings: usize, slices: usize },
    Icosphere { rounds: Int },
    Logo { jitter: Float },
    Model { path: PathBuf, policy: FacePolicy },
}

impl GeometrySource {
    /// Builds the mesh for this recipe. Terrain draws its faults from `rng`.
    pub fn build(&self, rng: &mut LcgRng) -> Result<Mesh, MeshError> {
        match self {
            GeometrySource::Terrain { resolution, faults, weathering, scale, textured } => {
                let mut grid = if *textured {
                    generate_textured_grid(*resolution)?
                } else {
                    generate_grid(*resolution)?
                };
                FaultFormation::new(*faults, *scale).apply(&mut grid, rng)?;
                Weathering::new(*weathering).apply(&mut grid)?;
                grid.add_normals()?;
                Ok(grid.into_mesh())
            }
            GeometrySource::Sphere { rings, slices } => generate_sphere(*rings, *slices),
            GeometrySource::Icosphere { rounds } => {
                let mut mesh = subdivide(&generate_icosahedron()?, *rounds, true)?;
                mesh.add_adjacency_normals()?;
                Ok(mesh)
            }
            GeometrySource::Logo { .. } => generate_logo(),
            GeometrySource::Model { path, policy } => {
                load_obj_from_file(path, *policy).map_err(|e| MeshError::resource(path, e))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinAxis {
    Y,
    Z,
}

/// Model transform as a function of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelMotion {
    Still,
    Spin { axis: SpinAxis, rate: Float },
    /// Logo dance: with `t = rate * elapsed` and `k = cos(3t) / 2`, translate
    /// by `(cos(t) k, cos(2t) k, k)`, scale by `0.1 + |cos(t)| / 2` and spin
    /// about Z by `2t`.
    Pulse { rate: Float },
}

impl ModelMotion {
    pub fn matrix(&self, elapsed: Float) -> Matrix4f {
        match self {
            ModelMotion::Still => Matrix4f::identity(),
            ModelMotion::Spin { axis: SpinAxis::Y, rate } => *Transform::rotation_y(rate * elapsed).matrix(),
            ModelMotion::Spin { axis: SpinAxis::Z, rate } => *Transform::rotation_z(rate * elapsed).matrix(),
            ModelMotion::Pulse { rate } => {
                let t = rate * elapsed;
                let k = (3.0 * t).cos() / 2.0;
                let offset = Vector3f::new(t.cos() * k, (2.0 * t).cos() * k, k);
                let size = 0.1 + t.cos().abs() / 2.0;
                let transform = Transform::translation(&offset)
                    .compose(&Transform::scale(size).compose(&Transform::rotation_z(2.0 * t)));
                *transform.matrix()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneRequest {
    Regenerate(GeometrySource),
    SetAppearance(String),
    Steer(FlightControl),
    Fog(FogCommand),
    Exit,
}

/// Everything the frame loop reads and mutates between draws.
///
/// Regeneration replaces the installed mesh only on success. Requests are
/// queued and applied at the start of a tick, so a tick never draws a
/// half-built mesh.
#[derive(Debug)]
pub struct Scene {
    source: Option<GeometrySource>,
    mesh: Option<Mesh>,
    geometry: Option<GeometryBundle>,
    jitter: Option<Jitter>,
    appearance: Appearance,
    texture: Option<ImageTexture>,
    texture_changed: bool,
    camera: Box<dyn Camera>,
    motion: ModelMotion,
    fog: FogSettings,
    rng: LcgRng,
    requests: VecDeque<SceneRequest>,
    exit_requested: bool,
    elapsed: Float,
}

impl Scene {
    pub fn new(camera: Box<dyn Camera>, rng: LcgRng) -> Self {
        Self {
            source: None,
            mesh: None,
            geometry: None,
            jitter: None,
            appearance: Appearance::default(),
            texture: None,
            texture_changed: false,
            camera,
            motion: ModelMotion::Still,
            fog: FogSettings::disabled(),
            rng,
            requests: VecDeque::new(),
            exit_requested: false,
            elapsed: 0.0,
        }
    }

    pub fn set_motion(&mut self, motion: ModelMotion) {
        self.motion = motion;
    }

    pub fn set_fog(&mut self, fog: FogSettings) {
        self.fog = fog;
    }

    /// Builds and installs a new mesh. On failure the previous mesh stays.
    pub fn regenerate(&mut self, source: GeometrySource) -> Result<(), MeshError> {
        let mesh = match source.build(&mut self.rng) {
            Ok(mesh) => mesh,
            Err(err) => {
                log::error!("Regeneration failed, keeping the previous mesh: {}", err);
                return Err(err);
            }
        };

        let bounds = mesh.bounding_box();
        log::info!(
            "Installed mesh: {} vertices, {} triangles.",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        if bounds.is_valid() {
            log::debug!("Mesh bounds: center {:?}, size {:?}.", bounds.center().as_slice(), bounds.diagnal().as_slice());
        }
        self.jitter = match source {
            GeometrySource::Logo { jitter } if jitter > 0.0 => Some(Jitter::new(jitter)),
            _ => None,
        };
        self.geometry = Some(GeometryBundle::from_mesh(&mesh));
        self.mesh = Some(mesh);
        self.source = Some(source);
        Ok(())
    }

    /// Parses and installs an appearance. A texture that fails to load leaves
    /// the previous appearance in place.
    pub fn set_appearance(&mut self, input: &str) -> Result<(), MeshError> {
        let result = Appearance::parse(input).and_then(|appearance| {
            let texture = match &appearance {
                Appearance::Textured(path) => Some(ImageTexture::from_image(path)?),
                Appearance::Flat { .. } => None,
            };
            Ok((appearance, texture))
        });

        match result {
            Ok((appearance, texture)) => {
                self.texture_changed = texture.is_some();
                self.texture = texture;
                self.appearance = appearance;
                Ok(())
            }
            Err(err) => {
                log::error!("Appearance '{}' rejected: {}", input, err);
                Err(err)
            }
        }
    }

    pub fn request(&mut self, request: SceneRequest) {
        self.requests.push_back(request);
    }

    /// Applies every queued request in order. Returns how many were handled.
    pub fn process_requests(&mut self) -> usize {
        let mut handled = 0;
        while let Some(request) = self.requests.pop_front() {
            handled += 1;
            match request {
                SceneRequest::Regenerate(source) => {
                    if let Err(err) = self.regenerate(source) {
                        log::debug!("Regenerate request dropped: {}", err);
                    }
                }
                SceneRequest::SetAppearance(input) => {
                    if let Err(err) = self.set_appearance(&input) {
                        log::debug!("Appearance request dropped: {}", err);
                    }
                }
                SceneRequest::Steer(control) => {
                    if !self.camera.steer(control) {
                        log::debug!("{:?} ignored by a fixed camera.", control);
                    }
                }
                SceneRequest::Fog(command) => {
                    self.fog.apply(command);
                    log::debug!(
                        "Fog {:?}: density {}, enabled {}.",
                        command,
                        self.fog.density(),
                        self.fog.is_enabled()
                    );
                }
                SceneRequest::Exit => self.exit_requested = true,
            }
        }
        handled
    }

    /// Moves the scene forward by `dt` seconds.
    pub fn advance(&mut self, dt: Float) {
        self.elapsed += dt;
        if let (Some(jitter), Some(mesh)) = (self.jitter, self.mesh.as_mut()) {
            jitter.apply(mesh, &mut self.rng);
            self.geometry = Some(GeometryBundle::from_mesh(mesh));
        }
    }

    pub fn model_matrix(&self) -> Matrix4f {
        self.motion.matrix(self.elapsed)
    }

    pub fn uniforms(&self) -> FrameUniforms {
        let uniforms = FrameUniforms::new(self.model_matrix(), self.camera.as_ref(), &self.appearance, self.fog)
            .with_time(self.elapsed);
        match self.mesh.as_ref().map(Mesh::bounding_box) {
            Some(bounds) if bounds.is_valid() => uniforms.with_height_range(bounds.p_min.y, bounds.p_max.y),
            _ => uniforms,
        }
    }

    /// The newly loaded texture, once per load.
    pub fn take_texture_update(&mut self) -> Option<&ImageTexture> {
        if self.texture_changed {
            self.texture_changed = false;
            self.texture.as_ref()
        } else {
            None
        }
    }

    pub fn source(&self) -> Option<&GeometrySource> {
        self.source.as_ref()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn geometry(&self) -> Option<&GeometryBundle> {
        self.geometry.as_ref()
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn camera(&self) -> &dyn Camera {
        self.camera.as_ref()
    }

    pub fn camera_position(&self) -> Vector3f {
        self.camera.eye()
    }

    pub fn fog(&self) -> &FogSettings {
        &self.fog
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn elapsed(&self) -> Float {
        self.elapsed
    }
}
