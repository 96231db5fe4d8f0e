//! Geometric value types shared by every lumen crate.
//!
//! `Vec3` is glam's, re-exported; it doubles as point, direction and
//! linear RGB color.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Threshold below which lengths, cosines and denominators are treated as zero.
pub const EPSILON: f32 = 1e-6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }
}
