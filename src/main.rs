mod cli;
mod logger;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rand::Rng;

use prism_tracer::{
    scene_file::{self, RenderSettings, SceneFile},
    Camera, Renderer, Scene,
};

use crate::cli::Args;

pub fn render_image_name(w: u32, h: u32) -> PathBuf {
    let suf: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    PathBuf::from(format!("renders/render_{w}x{h}_{suf}.png"))
}

fn run(args: Args) -> Result<PathBuf, Box<dyn std::error::Error>> {
    // ── scene ─────────────────────────────────────────────────────────────
    let SceneFile { mut camera, mut render, scene } = match &args.scene {
        Some(path) => scene_file::load(path)?,
        None => {
            info!("no scene file given, using the demo scene");
            SceneFile { camera: Camera::demo(), render: RenderSettings::default(), scene: Scene::demo() }
        }
    };
    if let Some(w) = args.width { render.width = w; }
    if let Some(h) = args.height { render.height = h; }
    if let Some(t) = args.threads { render.threads = t; }
    let (width, height) = (render.width, render.height);
    if height > 0 {
        camera.aspect_ratio = width as f32 / height as f32;
    }

    info!("camera: position {:?} target {:?} fov {:.1}°", camera.position, camera.target, camera.fov);
    for (id, obj) in scene.iter() {
        info!(
            " {:?} {} '{}' at {:?}{}",
            id,
            obj.shape.kind(),
            obj.name,
            obj.position,
            if obj.is_light_source { " (light)" } else { "" }
        );
    }

    // ── render ────────────────────────────────────────────────────────────
    let renderer = Renderer::with_threads(render.threads)?.with_max_bounces(render.max_bounces);
    info!("rendering {width}x{height} on {} threads", renderer.threads());

    let bar = (!args.quiet).then(|| {
        let pb = ProgressBar::new(height as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} rows | {elapsed_precise} | ETA: {eta}")
        {
            pb.set_style(style);
        }
        pb
    });

    let mut img = image::RgbImage::new(width, height);
    renderer.render_with_progress(&scene, &camera, &mut img, bar.as_ref());
    if let Some(b) = bar {
        b.finish_with_message("Rendering complete");
    }

    // ── save ──────────────────────────────────────────────────────────────
    let name = args.output.clone().unwrap_or_else(|| render_image_name(width, height));
    if let Some(dir) = Path::new(&name).parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    img.save(&name)?;
    Ok(name)
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init_logger(args.debug_level.into());

    match run(args) {
        Ok(name) => {
            info!("Saved → {}", name.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
