//! Scene files and the built-in demo scene.
//!
//! A scene file is JSON:
//!
//! ```json
//! {
//!   "spheres": [
//!     { "center": [0, -1000, 0], "radius": 1000,
//!       "material": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] } },
//!     { "center": [0, 1, 0], "radius": 1,
//!       "material": { "type": "dielectric", "refractive_index": 1.5 } }
//!   ]
//! }
//! ```

use std::path::Path;

use orb_math::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SceneResult;
use crate::material::MaterialDesc;
use crate::scene::{Scene, SceneBuilder};

/// One sphere in a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialDesc,
}

/// Deserialized form of a scene file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
}

impl SceneDescription {
    /// Validate every sphere and build the scene store.
    pub fn build(&self) -> SceneResult<Scene> {
        let mut builder = SceneBuilder::new();
        for sphere in &self.spheres {
            builder.add_sphere(sphere.center, sphere.radius, sphere.material)?;
        }
        builder.build()
    }
}

/// Load a scene file from disk.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let scene = load_scene_from_str(&text)?;

    log::info!(
        "Loaded {} spheres and {} materials from {}",
        scene.spheres().len(),
        scene.material_count(),
        path.display()
    );
    Ok(scene)
}

/// Parse a scene description from a JSON string.
pub fn load_scene_from_str(json: &str) -> SceneResult<Scene> {
    let description: SceneDescription = serde_json::from_str(json)?;
    description.build()
}

const DEMO_SMALL_SPHERES: usize = 80;
const DEMO_SMALL_RADIUS: f32 = 0.2;

/// The showcase scene: a huge ground sphere, three large feature spheres
/// (glass, diffuse, metal) and a field of small spheres with materials drawn
/// from fixed-size palettes.
pub fn demo_scene<R: Rng + ?Sized>(rng: &mut R) -> SceneResult<Scene> {
    let lambertians: Vec<MaterialDesc> = (0..15)
        .map(|_| MaterialDesc::lambertian(random_color(rng)))
        .collect();
    let metallics: Vec<MaterialDesc> = (0..16)
        .map(|_| MaterialDesc::metallic(random_color(rng)))
        .collect();
    let dielectrics: Vec<MaterialDesc> = (0..16)
        .map(|_| MaterialDesc::dielectric(rng.gen_range(1.0..10.0)))
        .collect();

    let mut builder = SceneBuilder::new();
    builder.add_sphere(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        MaterialDesc::lambertian(Vec3::splat(0.3)),
    )?;
    builder.add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, pick(&dielectrics, rng))?;
    builder.add_sphere(Vec3::new(-4.0, 1.0, 0.0), 1.0, pick(&lambertians, rng))?;
    builder.add_sphere(Vec3::new(4.0, 1.0, 0.0), 1.0, pick(&metallics, rng))?;

    for _ in 0..DEMO_SMALL_SPHERES {
        let center = Vec3::new(
            rng.gen_range(-5.0..5.0),
            DEMO_SMALL_RADIUS,
            rng.gen_range(-5.0..5.0),
        );
        let palette = match rng.gen_range(0..3) {
            0 => &lambertians,
            1 => &metallics,
            _ => &dielectrics,
        };
        builder.add_sphere(center, DEMO_SMALL_RADIUS, pick(palette, rng))?;
    }

    builder.build()
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.gen(), rng.gen(), rng.gen())
}

fn pick<R: Rng + ?Sized>(palette: &[MaterialDesc], rng: &mut R) -> MaterialDesc {
    palette[rng.gen_range(0..palette.len())]
}
