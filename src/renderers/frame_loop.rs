// Copyright @yucwang 2026

use std::thread;
use std::time::{ Duration, Instant };

use indicatif::{ ProgressBar, ProgressStyle };

use crate::core::error::MeshError;
use crate::core::scene::{ Scene, SceneRequest };
use crate::math::constants::Float;
use crate::renderers::renderer::Renderer;
use crate::renderers::shader::ShaderSources;

pub const DEFAULT_TICK_RATE: Float = 60.0;

/// A request the loop injects at the start of tick `tick`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledRequest {
    pub tick: u64,
    pub request: SceneRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub draw_failures: u64,
}

/// Fixed-step render loop. Each tick applies pending requests, advances the
/// scene by one period and draws it. The loop ends after `max_ticks` or when
/// the scene asks to exit.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    tick_rate: Float,
    period: Duration,
    max_ticks: Option<u64>,
    paced: bool,
    schedule: Vec<ScheduledRequest>,
}

impl FrameLoop {
    pub fn new(tick_rate: Float) -> Result<Self, MeshError> {
        if !(tick_rate.is_finite() && tick_rate > 0.0) {
            return Err(MeshError::invalid(format!("tick rate {} must be positive", tick_rate)));
        }
        let period = Duration::try_from_secs_f32(1.0 / tick_rate)
            .map_err(|e| MeshError::invalid(format!("tick rate {} has no usable period: {}", tick_rate, e)))?;
        Ok(Self { tick_rate, period, max_ticks: None, paced: false, schedule: Vec::new() })
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Sleeps out the remainder of each tick period.
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    pub fn with_schedule(mut self, mut schedule: Vec<ScheduledRequest>) -> Self {
        schedule.sort_by_key(|s| s.tick);
        self.schedule = schedule;
        self
    }

    pub fn tick_period(&self) -> Duration {
        self.period
    }

    fn progress_bar(&self) -> ProgressBar {
        match self.max_ticks {
            Some(max) => {
                let progress = ProgressBar::new(max);
                progress.set_style(
                    ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ticks")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                progress
            }
            None => ProgressBar::hidden(),
        }
    }

    /// Links the shaders, then runs ticks until an exit condition. Shader
    /// errors are returned before the first tick; draw errors are logged and
    /// the loop keeps going.
    pub fn run<R: Renderer>(&self, scene: &mut Scene, renderer: &mut R, shaders: &ShaderSources)
        -> Result<LoopSummary, MeshError> {
        renderer.prepare(shaders)?;

        let dt = 1.0 / self.tick_rate;
        let period = self.tick_period();
        let progress = self.progress_bar();
        let mut summary = LoopSummary::default();
        let mut next_scheduled = 0;

        loop {
            if let Some(max) = self.max_ticks {
                if summary.ticks >= max {
                    break;
                }
            }
            let frame_start = Instant::now();

            while let Some(scheduled) = self.schedule.get(next_scheduled) {
                if scheduled.tick > summary.ticks {
                    break;
                }
                scene.request(scheduled.request.clone());
                next_scheduled += 1;
            }
            scene.process_requests();
            if scene.exit_requested() {
                log::info!("Exit requested at tick {}.", summary.ticks);
                break;
            }

            scene.advance(dt);
            if let Some(texture) = scene.take_texture_update() {
                if let Err(err) = renderer.bind_texture(texture) {
                    log::error!("Texture upload failed: {}", err);
                }
            }

            let uniforms = scene.uniforms();
            if let Err(err) = renderer.draw(&uniforms, scene.geometry()) {
                if err.is_fatal() {
                    progress.abandon();
                    return Err(err);
                }
                summary.draw_failures += 1;
                log::error!("Draw failed at tick {}: {}", summary.ticks, err);
            }

            summary.ticks += 1;
            progress.inc(1);

            if self.paced {
                let spent = frame_start.elapsed();
                if spent < period {
                    thread::sleep(period - spent);
                }
            }
        }

        progress.finish_and_clear();
        log::info!(
            "Frame loop finished: {} ticks, {} failed draws.",
            summary.ticks,
            summary.draw_failures
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;
    use crate::core::scene::GeometrySource;
    use crate::math::constants::Vector3f;
    use crate::renderers::headless::HeadlessRenderer;
    use crate::sensors::camera::Projection;
    use crate::sensors::perspective::PerspectiveCamera;

    const VERTEX: &str = "in vec4 position;\nout vec3 vcolor;\nvoid main() {}\n";
    const FRAGMENT: &str = "in vec3 vcolor;\nout vec4 fragColor;\nvoid main() {}\n";

    fn scene() -> Scene {
        let camera = PerspectiveCamera::new(Vector3f::new(1.0, 1.1, 1.0), Vector3f::zeros(), Vector3f::y(), Projection::default());
        Scene::new(Box::new(camera), LcgRng::new(3))
    }

    #[test]
    fn test_stops_at_max_ticks() {
        let mut scene = scene();
        scene.regenerate(GeometrySource::Sphere { rings: 3, slices: 6 }).unwrap();
        let mut renderer = HeadlessRenderer::new();
        let frame_loop = FrameLoop::new(DEFAULT_TICK_RATE).unwrap().with_max_ticks(12);
        let summary = frame_loop.run(&mut scene, &mut renderer, &ShaderSources::new(VERTEX, FRAGMENT)).unwrap();

        assert_eq!(summary.ticks, 12);
        assert_eq!(summary.draw_failures, 0);
        assert_eq!(renderer.draw_count(), 12);
        assert!((scene.elapsed() - 12.0 / DEFAULT_TICK_RATE).abs() < 1e-4);
    }

    #[test]
    fn test_scheduled_requests_and_exit() {
        let mut scene = scene();
        let schedule = vec![
            ScheduledRequest { tick: 5, request: SceneRequest::Exit },
            ScheduledRequest {
                tick: 2,
                request: SceneRequest::Regenerate(GeometrySource::Sphere { rings: 2, slices: 4 }),
            },
            ScheduledRequest {
                tick: 3,
                request: SceneRequest::Regenerate(GeometrySource::Sphere { rings: 0, slices: 4 }),
            },
        ];
        let mut renderer = HeadlessRenderer::new();
        let frame_loop = FrameLoop::new(30.0).unwrap().with_max_ticks(100).with_schedule(schedule);
        let summary = frame_loop.run(&mut scene, &mut renderer, &ShaderSources::new(VERTEX, FRAGMENT)).unwrap();

        assert_eq!(summary.ticks, 5);
        assert_eq!(renderer.empty_frames(), 2);
        assert_eq!(renderer.draw_count(), 3);
        assert_eq!(scene.source(), Some(&GeometrySource::Sphere { rings: 2, slices: 4 }));
    }

    #[test]
    fn test_shader_failure_prevents_ticks() {
        let mut scene = scene();
        let mut renderer = HeadlessRenderer::new();
        let frame_loop = FrameLoop::new(30.0).unwrap().with_max_ticks(10);
        let result = frame_loop.run(&mut scene, &mut renderer, &ShaderSources::new(VERTEX, "in vec3 other;\nvoid main() {}"));
        assert!(matches!(result, Err(MeshError::ShaderLink(_))));
        assert_eq!(renderer.empty_frames(), 0);
        assert_eq!(scene.elapsed(), 0.0);
    }

    #[test]
    fn test_demo_scenes_run() {
        let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
        for name in ["terrain.xml", "flight.xml", "logo.xml", "shapes.xml", "model.xml", "texture.xml"].iter() {
            let desc = crate::core::scene_loader::load_scene(demos.join(name)).unwrap();
            let shaders = ShaderSources::load(&desc.shaders_dir).unwrap();
            let mut scene = desc.build_scene();
            let mut renderer = HeadlessRenderer::new();
            let frame_loop = FrameLoop::new(desc.tick_rate)
                .unwrap()
                .with_max_ticks(desc.ticks.unwrap_or(60))
                .with_schedule(desc.schedule.clone());
            let summary = frame_loop.run(&mut scene, &mut renderer, &shaders).unwrap();

            assert_eq!(summary.draw_failures, 0, "{}", name);
            assert_eq!(renderer.draw_count(), summary.ticks, "{}", name);
            assert!(scene.mesh().is_some(), "{}", name);
        }
    }

    #[test]
    fn test_texture_reaches_renderer() {
        let dir = std::env::temp_dir().join(format!("meshwork-texture-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tile.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([40, 80, 120, 255])).save(&path).unwrap();

        let mut scene = scene();
        scene.request(SceneRequest::Regenerate(GeometrySource::Terrain {
            resolution: 4,
            faults: 3,
            weathering: 1,
            scale: 1.0,
            textured: true,
        }));
        scene.request(SceneRequest::SetAppearance(path.to_string_lossy().to_string()));
        let mut renderer = HeadlessRenderer::new();
        let frame_loop = FrameLoop::new(DEFAULT_TICK_RATE).unwrap().with_max_ticks(1);
        let summary = frame_loop.run(&mut scene, &mut renderer, &ShaderSources::new(VERTEX, FRAGMENT)).unwrap();

        assert_eq!(summary.draw_failures, 0);
        assert!(scene.appearance().is_textured());
        assert!(scene.uniforms().textured);
        assert_eq!(renderer.texture_size(), Some((2, 2)));
        let record = renderer.last_draw().unwrap();
        assert!(record.textured);
        assert_eq!(record.texel_mean, Some([40, 80, 120, 255]));
        assert!(scene.take_texture_update().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_bad_tick_rate() {
        assert!(FrameLoop::new(0.0).is_err());
        assert!(FrameLoop::new(Float::NAN).is_err());
        assert!(FrameLoop::new(1e-39).is_err());
        assert!(FrameLoop::new(1e-30).is_err());
        let period = FrameLoop::new(4.0).unwrap().tick_period();
        assert_eq!(period, Duration::from_millis(250));
    }

    #[test]
    fn test_tiny_scene_rate_is_rejected() {
        let desc = crate::core::scene_loader::parse_scene(
            "<scene rate='1e-39' ticks='1'><shaders dir='s'/><sphere rings='2' slices='4'/></scene>",
            std::path::Path::new("."),
        )
        .unwrap();
        assert!(matches!(FrameLoop::new(desc.tick_rate), Err(MeshError::InvalidParameter(_))));
    }
}
