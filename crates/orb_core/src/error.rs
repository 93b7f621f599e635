//! Errors raised while assembling or loading a scene.

use orb_math::Vec3;
use thiserror::Error;

/// Errors that can occur while building or loading a [`Scene`](crate::Scene).
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Sphere radius must be finite and positive, got {0}")]
    InvalidRadius(f32),

    #[error("Sphere center must be finite, got {0}")]
    InvalidCenter(Vec3),

    #[error("Refractive index must be finite and positive, got {0}")]
    InvalidRefractiveIndex(f32),

    #[error("Albedo components must be finite and non-negative, got {0}")]
    InvalidAlbedo(Vec3),

    #[error("Malformed scene store: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
