//! Per-kind material parameters and the references spheres hold into them.

use orb_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Diffuse material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lambertian {
    pub albedo: Color,
}

/// Perfect mirror tinted by its albedo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metallic {
    pub albedo: Color,
}

/// Clear refractive material (glass, water, diamond).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dielectric {
    /// Index of refraction relative to the surrounding medium (1.5 = glass)
    pub refractive_index: f32,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Metallic {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Dielectric {
    pub fn new(refractive_index: f32) -> Self {
        Self { refractive_index }
    }
}

/// Reference from a sphere into one of the scene's material tables.
///
/// The variant selects the table, the payload is the slot inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRef {
    Lambertian(u32),
    Metallic(u32),
    Dielectric(u32),
}

/// A material as written in a scene description, before it is interned
/// into the per-kind tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialDesc {
    Lambertian(Lambertian),
    Metallic(Metallic),
    Dielectric(Dielectric),
}

impl MaterialDesc {
    pub fn lambertian(albedo: Color) -> Self {
        MaterialDesc::Lambertian(Lambertian::new(albedo))
    }

    pub fn metallic(albedo: Color) -> Self {
        MaterialDesc::Metallic(Metallic::new(albedo))
    }

    pub fn dielectric(refractive_index: f32) -> Self {
        MaterialDesc::Dielectric(Dielectric::new(refractive_index))
    }

    /// Reject parameters no scattering model can work with.
    pub fn validate(&self) -> SceneResult<()> {
        match *self {
            MaterialDesc::Lambertian(Lambertian { albedo })
            | MaterialDesc::Metallic(Metallic { albedo }) => {
                if !albedo.is_finite() || albedo.min_element() < 0.0 {
                    return Err(SceneError::InvalidAlbedo(albedo));
                }
            }
            MaterialDesc::Dielectric(Dielectric { refractive_index }) => {
                if !refractive_index.is_finite() || refractive_index <= 0.0 {
                    return Err(SceneError::InvalidRefractiveIndex(refractive_index));
                }
            }
        }
        Ok(())
    }
}
