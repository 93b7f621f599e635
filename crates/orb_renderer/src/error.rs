//! Errors surfaced by rendering and image output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
