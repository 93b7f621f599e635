use crate::{component, Interval, Ray, Vec3};

/// Axis-aligned bounding box, one [`Interval`] per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Box spanning the two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        let mut aabb = Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box enclosing both inputs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&a.x, &b.x),
            y: Interval::surrounding(&a.y, &b.y),
            z: Interval::surrounding(&a.z, &b.z),
        }
    }

    /// Interval along axis `n` (0=X, 1=Y, 2=Z). Panics for any other axis.
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("bounding box axis {n} out of range"),
        }
    }

    /// Slab test: does `ray` pass through the box somewhere inside `ray_t`?
    ///
    /// Each axis clips the parameter window; the ray misses as soon as the
    /// window collapses.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / component(ray.direction, axis);
            let origin = component(ray.origin, axis);

            let mut t0 = (slab.min - origin) * inv_d;
            let mut t1 = (slab.max - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// True when `other` lies entirely inside this box.
    pub fn encloses(&self, other: &Aabb) -> bool {
        self.x.encloses(&other.x) && self.y.encloses(&other.y) && self.z.encloses(&other.z)
    }

    /// Index (0=X, 1=Y, 2=Z) of the widest axis.
    pub fn longest_axis(&self) -> usize {
        let (x, y, z) = (self.x.size(), self.y.size(), self.z.size());
        if x > y && x > z {
            0
        } else if y > z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    // Flat boxes break the slab test for rays travelling inside the plane.
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
