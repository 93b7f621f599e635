//! Scattering models for the three material kinds.

use orb_core::{Color, Dielectric, Lambertian, MaterialRef, Metallic, Scene};
use orb_math::{Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere};

/// Outcome of a ray scattering off a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel fraction of light that survives the bounce
    pub attenuation: Color,
    /// Continuation ray, starting at the hit point
    pub scattered: Ray,
}

/// How a material turns an incoming ray into an outgoing one.
pub trait Scatter {
    /// Returns `None` when the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;
}

impl Scatter for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if direction.length_squared() < 1e-8 {
            direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.point, direction),
        })
    }
}

impl Scatter for Metallic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction, rec.normal);

        // Reflections pointing into the surface are absorbed
        if reflected.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.point, reflected),
            })
        } else {
            None
        }
    }
}

impl Scatter for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let ri = self.refractive_index;
        let rdotn = ray_in.direction.dot(rec.normal);
        let dir_len = ray_in.direction.length();

        // Stored normals point outward; a positive dot means the ray is leaving
        let (outward_normal, ni_over_nt, cosine) = if rdotn > 0.0 {
            (-rec.normal, ri, ri * rdotn / dir_len)
        } else {
            (rec.normal, 1.0 / ri, -rdotn / dir_len)
        };

        let refracted = refract(ray_in.direction, outward_normal, ni_over_nt);
        let reflect_probability = match refracted {
            Some(_) => schlick(cosine, ri),
            None => 1.0,
        };

        let direction = match refracted {
            Some(refracted) if gen_f32(rng) >= reflect_probability => refracted,
            _ => reflect(ray_in.direction, rec.normal),
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.point, direction),
        })
    }
}

/// Scatter `ray_in` off the material recorded in `rec`.
///
/// Panics if the material reference does not resolve in `scene`; a
/// validated scene never produces such a record.
pub fn scatter(
    scene: &Scene,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    match rec.material {
        MaterialRef::Lambertian(i) => scene.lambertian(i).scatter(ray_in, rec, rng),
        MaterialRef::Metallic(i) => scene.metallic(i).scatter(ray_in, rec, rng),
        MaterialRef::Dielectric(i) => scene.dielectric(i).scatter(ray_in, rec, rng),
    }
}

/// Mirror `v` about the plane with normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of `incident` through a surface with unit normal
/// `normal` facing the incoming side.
///
/// Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let unit = incident.normalize();
    let dt = unit.dot(normal);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (unit - normal * dt) - normal * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation of Fresnel reflectance.
pub fn schlick(cosine: f32, refractive_index: f32) -> f32 {
    let r0 = ((1.0 - refractive_index) / (1.0 + refractive_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
