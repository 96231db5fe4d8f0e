//! Axis-aligned box made of six rectangles.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::instance::FlipFace;
use crate::rect::{AxisRect, RectPlane};
use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A closed box between two opposite corners.
///
/// The three sides facing the negative axes are wrapped in [`FlipFace`] so
/// that `front_face` is true for rays arriving from outside on every side.
pub struct Cuboid {
    sides: HittableList,
    bbox: Aabb,
}

impl Cuboid {
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        let (min, max) = (a.min(b), a.max(b));
        let mut sides = HittableList::new();

        let xs = (min.x, max.x);
        let ys = (min.y, max.y);
        let zs = (min.z, max.z);

        let near_far = [
            (RectPlane::XY, xs, ys, min.z, max.z),
            (RectPlane::XZ, xs, zs, min.y, max.y),
            (RectPlane::YZ, ys, zs, min.x, max.x),
        ];
        for (plane, ra, rb, k_min, k_max) in near_far {
            sides.add(Arc::new(AxisRect::new(plane, ra, rb, k_max, material.clone())));
            sides.add(Arc::new(FlipFace::new(Arc::new(AxisRect::new(
                plane,
                ra,
                rb,
                k_min,
                material.clone(),
            )))));
        }

        Self {
            sides,
            bbox: Aabb::from_points(min, max),
        }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }
        self.sides.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }

    /// Samples a uniformly chosen side, so the density is the sides' average.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.sides.pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.sides.random(origin, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn unit_box() -> Cuboid {
        Cuboid::new(
            Vec3::ZERO,
            Vec3::ONE,
            Arc::new(Lambertian::new(Vec3::splat(0.5))),
        )
    }

    #[test]
    fn test_cuboid_front_face_from_every_side() {
        let b = unit_box();
        let center = Vec3::splat(0.5);
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            for sign in [1.0, -1.0] {
                let origin = center + sign * 3.0 * axis;
                let ray = Ray::new(origin, -sign * axis, 0.0);
                let rec = b.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

                assert!((rec.t - 2.5).abs() < 1e-4);
                assert!(rec.front_face, "axis {axis:?} sign {sign}");
                assert!((rec.normal - sign * axis).length() < 1e-5);
            }
        }
    }

    #[test]
    fn test_cuboid_hit_from_inside_is_back_face() {
        let b = unit_box();
        let ray = Ray::new(Vec3::splat(0.5), Vec3::X, 0.0);
        let rec = b.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-4);
        assert!(!rec.front_face);
    }

    #[test]
    fn test_cuboid_miss() {
        let b = unit_box();
        let ray = Ray::new(Vec3::new(3.0, 3.0, 3.0), Vec3::X, 0.0);
        assert!(b.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }
}
