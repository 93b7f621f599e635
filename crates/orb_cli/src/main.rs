//! `orb`: render a sphere scene to an image file.
//!
//! ```text
//! orb --scene scene.json --output frame.png --samples 64
//! orb --settings render.json            # demo scene, settings from file
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use orb_core::{demo_scene, load_scene, Scene};
use orb_renderer::{RenderSettings, Renderer};

#[derive(Debug, Parser)]
#[command(name = "orb", version, about = "Monte Carlo sphere path tracer")]
struct CommandLineArguments {
    #[arg(long, help = "Render settings JSON (defaults are used otherwise)")]
    settings: Option<PathBuf>,
    #[arg(long, help = "Scene description JSON (the demo scene otherwise)")]
    scene: Option<PathBuf>,
    #[arg(short, long, default_value = "out.ppm", help = "Output image; .ppm or any format the image crate writes")]
    output: PathBuf,

    #[arg(long, help = "Image width in pixels")]
    width: Option<u32>,
    #[arg(long, help = "Image height in pixels")]
    height: Option<u32>,
    #[arg(short, long, help = "Samples per pixel")]
    samples: Option<u32>,
    #[arg(short, long, help = "Maximum ray bounces")]
    bounces: Option<u32>,
    #[arg(long, help = "Random seed for sampling and the demo scene")]
    seed: Option<u64>,
}

impl CommandLineArguments {
    fn render_settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.settings {
            Some(path) => RenderSettings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => RenderSettings::default(),
        };

        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(bounces) = self.bounces {
            settings.max_bounces = bounces;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }

        Ok(settings)
    }

    fn scene(&self, seed: u64) -> Result<Scene> {
        match &self.scene {
            Some(path) => {
                load_scene(path).with_context(|| format!("loading scene from {}", path.display()))
            }
            None => {
                log::info!("No scene given, using the demo scene");
                demo_scene(&mut StdRng::seed_from_u64(seed)).context("building demo scene")
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = CommandLineArguments::parse();
    let settings = args.render_settings()?;
    let scene = args.scene(settings.seed)?;
    let renderer = Renderer::new(scene, settings).context("invalid render settings")?;

    let scene = renderer.scene();
    log::info!(
        "Scene: {} spheres, {} materials, {} BVH nodes",
        scene.spheres().len(),
        scene.material_count(),
        scene.nodes().len()
    );
    let settings = renderer.settings();
    let camera = renderer.camera();
    log::info!(
        "Camera at {:?}, lens radius {}, {}x{} at {} spp",
        camera.origin(),
        camera.lens_radius(),
        settings.width,
        settings.height,
        settings.samples_per_pixel
    );

    let start = Instant::now();
    let image = renderer.render();
    log::info!("Rendered in {:.2?}", start.elapsed());

    image
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    Ok(())
}
