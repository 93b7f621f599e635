//! Render settings, loadable from JSON.

use std::path::Path;

use orb_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};

/// Thin-lens camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub aperture: f32,
    pub focus_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Vec3::new(13.0, 2.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            vfov: 20.0,
            aperture: 0.1,
            focus_distance: 10.0,
        }
    }
}

/// Frame size, sampling and camera. Missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_bounces: u32,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
    pub camera: CameraSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            samples_per_pixel: 8,
            max_bounces: 4,
            seed: 0,
            camera: CameraSettings::default(),
        }
    }
}

impl RenderSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(RenderError::InvalidSettings(format!(
                "image size {}x{} has too many pixels",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }

        let camera = &self.camera;
        if camera.eye == camera.target {
            return Err(RenderError::InvalidSettings("camera eye and target coincide".to_string()));
        }
        if camera.up.cross(camera.eye - camera.target).length_squared() == 0.0 {
            return Err(RenderError::InvalidSettings(
                "camera up vector is parallel to the view direction".to_string(),
            ));
        }
        if !(camera.vfov > 0.0 && camera.vfov < 180.0) {
            return Err(RenderError::InvalidSettings(format!(
                "vfov must be in (0, 180) degrees, got {}",
                camera.vfov
            )));
        }
        if !(camera.aperture >= 0.0 && camera.focus_distance > 0.0) {
            return Err(RenderError::InvalidSettings(format!(
                "invalid lens: aperture {}, focus distance {}",
                camera.aperture, camera.focus_distance
            )));
        }

        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn camera(&self) -> Camera {
        let c = &self.camera;
        Camera::look_at(c.eye, c.target, c.up, c.vfov, self.aspect(), c.aperture, c.focus_distance)
    }
}
