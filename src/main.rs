// Copyright 2020 TwoCookingMice

use meshwork::core::scene_loader::load_scene;
use meshwork::io::obj_writer::save_obj;
use meshwork::renderers::frame_loop::FrameLoop;
use meshwork::renderers::headless::HeadlessRenderer;
use meshwork::renderers::renderer::Renderer;
use meshwork::renderers::shader::ShaderSources;

use std::env;
use std::process;

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <scene.xml> [--ticks N] [--seed N] [--export mesh.obj] [--appearance VALUE] [--paced]", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let mut ticks_override: Option<u64> = None;
    let mut seed_override: Option<u64> = None;
    let mut export_path: Option<String> = None;
    let mut appearance_override: Option<String> = None;
    let mut paced = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => {
                i += 1;
                ticks_override = args.get(i).and_then(|v| v.parse::<u64>().ok());
            }
            "--seed" => {
                i += 1;
                seed_override = args.get(i).and_then(|v| v.parse::<u64>().ok());
            }
            "--export" => {
                i += 1;
                export_path = args.get(i).cloned();
            }
            "--appearance" => {
                i += 1;
                appearance_override = args.get(i).cloned();
            }
            "--paced" => paced = true,
            other => log::warn!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut desc = match load_scene(input_path) {
        Ok(desc) => desc,
        Err(err) => {
            log::error!("Failed to load scene {}: {}", input_path, err);
            process::exit(1);
        }
    };
    if ticks_override.is_some() {
        desc.ticks = ticks_override;
    }
    if seed_override.is_some() {
        desc.seed = seed_override;
    }
    if appearance_override.is_some() {
        desc.appearance = appearance_override;
    }

    let shaders = match ShaderSources::load(&desc.shaders_dir) {
        Ok(shaders) => shaders,
        Err(err) => {
            log::error!("{}", err);
            process::exit(1);
        }
    };

    let mut frame_loop = match FrameLoop::new(desc.tick_rate) {
        Ok(frame_loop) => frame_loop.paced(paced).with_schedule(desc.schedule.clone()),
        Err(err) => {
            log::error!("{}", err);
            process::exit(1);
        }
    };
    match desc.ticks {
        Some(ticks) => frame_loop = frame_loop.with_max_ticks(ticks),
        None => log::info!("No tick limit, running until an exit request."),
    }

    let mut scene = desc.build_scene();
    let mut renderer = HeadlessRenderer::new();
    if let Err(err) = frame_loop.run(&mut scene, &mut renderer, &shaders) {
        log::error!("Setup failed: {}", err);
        process::exit(1);
    }
    log::info!("{}", renderer.describe());
    log::info!("Camera ended at {:?}.", scene.camera_position().as_slice());

    if let Some(path) = export_path {
        match scene.mesh() {
            Some(mesh) => {
                if let Err(err) = save_obj(mesh, &path) {
                    log::error!("Failed to export {}: {}", path, err);
                    process::exit(1);
                }
            }
            None => log::warn!("No mesh installed, nothing to export."),
        }
    }
}
