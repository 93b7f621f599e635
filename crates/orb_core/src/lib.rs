//! Orb Core - immutable scene store for the sphere path tracer.
//!
//! This crate provides:
//!
//! - **Scene store**: flat arrays of spheres, per-kind material tables and
//!   BVH nodes addressed by index (`Scene`)
//! - **Construction**: `SceneBuilder` with material deduplication and a
//!   median-split BVH builder
//! - **Scene files**: JSON scene descriptions and the built-in demo scene
//!
//! # Example
//!
//! ```ignore
//! use orb_core::load_scene;
//!
//! let scene = load_scene("spheres.json")?;
//! println!("Loaded {} spheres, {} BVH nodes",
//!     scene.spheres().len(),
//!     scene.nodes().len());
//! ```

pub mod bvh;
pub mod description;
pub mod error;
pub mod material;
pub mod scene;
pub mod sphere;

// Re-export commonly used types
pub use bvh::{BvhChild, BvhNode, PrimitiveRef};
pub use description::{demo_scene, load_scene, load_scene_from_str, SceneDescription, SphereDescription};
pub use error::{SceneError, SceneResult};
pub use material::{Color, Dielectric, Lambertian, MaterialDesc, MaterialRef, Metallic};
pub use scene::{Scene, SceneBuilder};
pub use sphere::Sphere;
