// Re-export glam for convenience
pub use glam::*;

// Orb math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Component `n` of a vector (0=X, 1=Y, 2=Z).
///
/// Panics on any other index: an out-of-range component is a programming
/// defect, never a recoverable condition.
#[inline]
pub fn component(v: Vec3, n: usize) -> f32 {
    match n {
        0 => v.x,
        1 => v.y,
        2 => v.z,
        _ => panic!("vector component index {n} out of range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(component(v, 0), 1.0);
        assert_eq!(component(v, 1), 2.0);
        assert_eq!(component(v, 2), 3.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_component_out_of_range() {
        component(Vec3::ONE, 3);
    }
}
