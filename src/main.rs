use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use softengine::prelude::*;
use softengine::window::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// Spinning-mesh viewer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Babylon JSON scene to display; the built-in cube when omitted
    scene: Option<PathBuf>,

    /// JSON file with render settings (projection, light, background, shading)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: u32,

    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: u32,
}

/// Rotation added to every mesh, on every axis, each frame.
const ROTATION_STEP: f32 = 0.01;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RenderConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => RenderConfig::default(),
    };
    let mut scene = match &args.scene {
        Some(path) => Scene::from_babylon_file(path)?,
        None => Scene::new(vec![Mesh::cube()]),
    };
    log::info!("loaded {} meshes", scene.mesh_count());

    let mut window = Window::new("SoftEngine", args.width, args.height).map_err(|e| anyhow!(e))?;
    let mut device = Device::with_config(window.width(), window.height(), config);
    let mut frame_limiter = FrameLimiter::new(&window);
    let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

    loop {
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => {
                window.resize(w, h).map_err(|e| anyhow!(e))?;
                device = Device::with_config(w, h, config);
            }
            WindowEvent::None => {}
        }

        frame_limiter.wait_and_get_delta(&window);

        for mesh in scene.meshes_mut() {
            mesh.rotation = mesh.rotation + Vec3::new(ROTATION_STEP, ROTATION_STEP, ROTATION_STEP);
        }

        device.clear();
        device.render(&camera, scene.meshes());
        device.present(&mut window).map_err(|e| anyhow!(e))?;
    }

    Ok(())
}
