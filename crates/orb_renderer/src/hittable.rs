//! Ray/sphere intersection and the record it produces.

use orb_core::{MaterialRef, Sphere};
use orb_math::{Interval, Ray, Vec3};

/// Record of a ray-sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Outward unit normal. Not flipped towards the ray: callers that care
    /// about sidedness compare it against the ray direction themselves.
    pub normal: Vec3,
    /// Material of the surface that was hit
    pub material: MaterialRef,
}

/// Intersect `ray` with `sphere`, accepting roots strictly inside
/// `(t_min, t_max)`.
///
/// Solves `a*t^2 + b*t + c = 0` and returns the smaller qualifying root. A
/// non-positive discriminant (miss or tangent graze) is no hit.
pub fn hit_sphere(ray: &Ray, t_min: f32, t_max: f32, sphere: &Sphere) -> Option<HitRecord> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let window = Interval::new(t_min, t_max);
    [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)]
        .into_iter()
        .find(|&t| window.surrounds(t))
        .map(|t| {
            let point = ray.at(t);
            HitRecord {
                t,
                point,
                normal: (point - sphere.center) / sphere.radius,
                material: sphere.material,
            }
        })
}
