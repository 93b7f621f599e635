//! Sphere primitive as stored in the scene.

use orb_math::{Aabb, Vec3};

use crate::material::MaterialRef;

/// A sphere and the material it is made of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialRef,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: MaterialRef) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_math::Interval;

    #[test]
    fn test_bounding_box() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialRef::Lambertian(0));
        let bbox = sphere.bounding_box();

        assert_eq!(bbox.x, Interval::new(-0.5, 0.5));
        assert_eq!(bbox.y, Interval::new(-0.5, 0.5));
        assert_eq!(bbox.z, Interval::new(-1.5, -0.5));
    }
}
