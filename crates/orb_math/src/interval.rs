/// A closed range of ray parameters `[min, max]`.
///
/// Used both for the `(t_min, t_max)` search window of intersection queries
/// and for the per-axis extent of an [`Aabb`](crate::Aabb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the interval. Negative for [`Interval::EMPTY`].
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Inclusive membership test.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Exclusive membership test, used to accept intersection roots.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// True when `other` lies entirely inside this interval.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Grow by `delta / 2` on both ends.
    pub fn expand(&self, delta: f32) -> Interval {
        let half = delta * 0.5;
        Interval::new(self.min - half, self.max + half)
    }

    /// Smallest interval covering both inputs.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}
