//! Orb Renderer - CPU path tracing over a sphere scene store.
//!
//! A single-threaded Monte Carlo path tracer:
//! - explicit-stack BVH traversal over the flat node arena
//! - closed-form ray/sphere intersection
//! - Lambertian, metallic and dielectric scattering
//! - thin-lens camera, sky-gradient background, square-root gamma
//!
//! Randomness is always passed in explicitly; nothing here touches a
//! process-wide generator.

mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod renderer;
mod sampling;
mod settings;
mod traversal;

pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{hit_sphere, HitRecord};
pub use material::{reflect, refract, scatter, schlick, Scatter, ScatterResult};
pub use output::ImageBuffer;
pub use renderer::{
    background, color_to_rgb, linear_to_gamma, render_pixel, Renderer, Tracer, BOUNCE_EPSILON,
};
pub use sampling::{gen_f32, random_in_unit_disk, random_in_unit_sphere};
pub use settings::{CameraSettings, RenderSettings};
pub use traversal::{find_closest_hit, find_closest_hit_linear, TraversalStack};

/// Re-export common types from the core and math crates
pub use orb_core::{Color, Scene};
pub use orb_math::{Ray, Vec3};
