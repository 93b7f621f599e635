//! Thin-lens camera for primary ray generation.

use orb_math::{Ray, Vec3};
use rand::RngCore;

use crate::sampling::random_in_unit_disk;

/// Camera with a precomputed image plane placed at the focus distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Camera at `eye` looking at `target`.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect`: image width over height
    /// - `aperture`: lens diameter, 0 for a pinhole
    /// - `focus_distance`: distance to the plane of perfect focus
    pub fn look_at(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        vfov: f32,
        aspect: f32,
        aperture: f32,
        focus_distance: f32,
    ) -> Self {
        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = aspect * half_height;

        // Camera basis: w points backwards, u right, v up
        let w = (eye - target).normalize();
        let u = up.cross(w).normalize();
        let v = w.cross(u);

        let lower_left = eye
            - u * (half_width * focus_distance)
            - v * (half_height * focus_distance)
            - w * focus_distance;

        Self {
            origin: eye,
            lower_left,
            horizontal: u * (2.0 * half_width * focus_distance),
            vertical: v * (2.0 * half_height * focus_distance),
            u,
            v,
            lens_radius: aperture / 2.0,
        }
    }

    /// Ray through image-plane coordinates `(s, t)` in `[0, 1]^2`, measured
    /// from the lower-left corner. Direction is unit length.
    ///
    /// With a non-zero aperture the origin is jittered over the lens disk,
    /// which blurs everything off the focus plane.
    pub fn generate_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let target = self.lower_left + s * self.horizontal + t * self.vertical;

        let offset = if self.lens_radius > 0.0 {
            let rd = random_in_unit_disk(rng) * self.lens_radius;
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let origin = self.origin + offset;
        Ray::new(origin, (target - origin).normalize())
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
