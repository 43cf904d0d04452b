//! Headless renderer: draws one frame of a scene and writes it to an image file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use softengine::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about = "Render a scene to a PNG without opening a window")]
struct Args {
    /// Babylon JSON scene; the built-in cube when omitted
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Wavefront OBJ model, used instead of a JSON scene
    #[arg(long, conflicts_with = "scene")]
    obj: Option<PathBuf>,

    /// JSON file with render settings (projection, light, background, shading)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Rotation steps of 0.01 rad per axis applied before rendering
    #[arg(long, default_value_t = 0)]
    frames: u32,

    /// How long to wait for textures to decode, in milliseconds
    #[arg(long, default_value_t = 5000)]
    texture_timeout: u64,

    #[arg(short, long, default_value = "frame.png")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            RenderConfig::from_json_str(&json)?
        }
        None => RenderConfig::default(),
    };

    let mut scene = if let Some(path) = &args.scene {
        Scene::from_babylon_file(path).with_context(|| format!("loading {}", path.display()))?
    } else if let Some(path) = &args.obj {
        Scene::from_obj(path).with_context(|| format!("loading {}", path.display()))?
    } else {
        Scene::new(vec![Mesh::cube()])
    };

    // A single frame would otherwise draw still-loading textures as white.
    // Meshes share textures, so wait on each one once under a common deadline.
    let deadline = Instant::now() + Duration::from_millis(args.texture_timeout);
    let mut waited: Vec<&Texture> = Vec::new();
    for mesh in scene.meshes() {
        let Some(texture) = mesh.texture() else {
            continue;
        };
        if waited.iter().any(|seen| std::ptr::eq(*seen, texture)) {
            continue;
        }
        waited.push(texture);

        let remaining = deadline.saturating_duration_since(Instant::now());
        if !texture.wait_ready(remaining) {
            let reason = if texture.has_failed() { "failed to decode" } else { "timed out" };
            log::warn!("texture of mesh `{}` {reason}, rendering it white", mesh.name());
        }
    }

    let step = 0.01 * args.frames as f32;
    for mesh in scene.meshes_mut() {
        mesh.rotation = mesh.rotation + Vec3::new(step, step, step);
    }

    let mut device = Device::with_config(args.width, args.height, config);
    let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    device.clear();
    let stats = device.render(&camera, scene.meshes());
    log::info!(
        "rendered {} meshes: {} faces drawn, {} culled",
        stats.meshes,
        stats.faces_drawn,
        stats.faces_culled
    );

    let mut surface = ImageSurface::new();
    device.present(&mut surface)?;
    surface
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("wrote {}", args.output.display());
    Ok(())
}
