//! Wrappers that re-orient or move another hittable without copying it.
//!
//! Each wrapper maps incoming rays into the wrapped object's frame and maps
//! the resulting hit back out. Light sampling goes through the same mapping,
//! so a wrapped light can still be importance-sampled.

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Mat4, Mat4Ext, Quat, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Reports the opposite `front_face` of the wrapped object.
///
/// Geometry and normals are untouched; this only decides which side of a
/// one-sided emitter counts as the front.
pub struct FlipFace {
    object: Arc<dyn Hittable>,
}

impl FlipFace {
    pub fn new(object: Arc<dyn Hittable>) -> Self {
        Self { object }
    }
}

impl Hittable for FlipFace {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut rec = self.object.hit(ray, ray_t)?;
        rec.front_face = !rec.front_face;
        Some(rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.object.bounding_box()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin, rng)
    }
}

/// Moves the wrapped object by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Option<Aabb>,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().map(|b| b.translate(offset));
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        let mut rec = self.object.hit(&moved, ray_t)?;
        // Directions are unchanged by a translation, so normal and front_face stand.
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin - self.offset, rng)
    }
}

/// Rotates the wrapped object about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    rotation: Quat,
    bbox: Option<Aabb>,
}

impl RotateY {
    /// Positive angles turn +X toward -Z (right-handed about +Y).
    pub fn new(object: Arc<dyn Hittable>, angle_degrees: f32) -> Self {
        let rotation = Quat::from_rotation_y(angle_degrees.to_radians());
        let bbox = object
            .bounding_box()
            .map(|b| Mat4::from_quat(rotation).transform_aabb(&b));
        Self {
            object,
            rotation,
            bbox,
        }
    }

    #[inline]
    fn to_local(&self, v: Vec3) -> Vec3 {
        self.rotation.inverse() * v
    }

    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        self.rotation * v
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let local = Ray::new(
            self.to_local(ray.origin()),
            self.to_local(ray.direction()),
            ray.time(),
        );
        let mut rec = self.object.hit(&local, ray_t)?;
        // Rotations preserve dot products, so front_face carries over.
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object
            .pdf_value(self.to_local(origin), self.to_local(direction))
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world(self.object.random(self.to_local(origin), rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::{AxisRect, Cuboid, Material, RectPlane, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)))
    }

    fn interval() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_flip_face_inverts_only_front_face() {
        let rect: Arc<dyn Hittable> =
            Arc::new(AxisRect::new(RectPlane::XZ, (-1.0, 1.0), (-1.0, 1.0), 2.0, gray()));
        let flipped = FlipFace::new(rect.clone());
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);

        let plain = rect.hit(&ray, interval()).unwrap();
        let rec = flipped.hit(&ray, interval()).unwrap();
        assert_eq!(rec.front_face, !plain.front_face);
        assert_eq!(rec.normal, plain.normal);
        assert_eq!(rec.t, plain.t);
        assert_eq!(flipped.pdf_value(Vec3::ZERO, Vec3::Y), rect.pdf_value(Vec3::ZERO, Vec3::Y));
    }

    #[test]
    fn test_translate_moves_hit_point() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, gray()));
        let moved = Translate::new(sphere, Vec3::new(10.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(10.0, 0.0, 5.0), -Vec3::Z, 0.0);

        let rec = moved.hit(&ray, interval()).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!((rec.p - Vec3::new(10.0, 0.0, 1.0)).length() < 1e-4);
        assert!(rec.front_face);

        let bbox = moved.bounding_box().unwrap();
        assert_eq!(bbox.x, Interval::new(9.0, 11.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // A thin slab along +X becomes a slab along -Z after 90 degrees.
        let slab: Arc<dyn Hittable> =
            Arc::new(Cuboid::new(Vec3::new(0.0, -0.1, -0.1), Vec3::new(4.0, 0.1, 0.1), gray()));
        let rotated = RotateY::new(slab, 90.0);

        let down_x = Ray::new(Vec3::new(3.0, 0.0, 5.0), -Vec3::Z, 0.0);
        assert!(rotated.hit(&down_x, interval()).is_none());

        let down_z = Ray::new(Vec3::new(5.0, 0.0, -3.0), -Vec3::X, 0.0);
        let rec = rotated.hit(&down_z, interval()).unwrap();
        assert!((rec.p - Vec3::new(0.1, 0.0, -3.0)).length() < 1e-3);
        assert!((rec.normal - Vec3::X).length() < 1e-4);
        assert!(rec.front_face);
    }

    #[test]
    fn test_translate_rotate_round_trip_preserves_t() {
        let cuboid: Arc<dyn Hittable> =
            Arc::new(Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), gray()));
        let angle = 15.0f32;
        let offset = Vec3::new(265.0, 0.0, 295.0);
        let composite = Translate::new(Arc::new(RotateY::new(cuboid.clone(), angle)), offset);
        let rotation = Quat::from_rotation_y(angle.to_radians());

        let local_rays = [
            Ray::new(Vec3::new(80.0, 100.0, -500.0), Vec3::Z, 0.0),
            Ray::new(Vec3::new(-200.0, 150.0, 80.0), Vec3::new(1.0, 0.05, 0.02), 0.0),
            Ray::new(Vec3::new(82.0, 600.0, 83.0), Vec3::new(0.01, -1.0, 0.0), 0.0),
        ];
        for local in local_rays {
            let world = Ray::new(
                rotation * local.origin() + offset,
                rotation * local.direction(),
                local.time(),
            );
            let expected = cuboid.hit(&local, interval()).unwrap();
            let actual = composite.hit(&world, interval()).unwrap();

            assert!((actual.t - expected.t).abs() < 1e-2, "{} vs {}", actual.t, expected.t);
            assert_eq!(actual.front_face, expected.front_face);
            let expected_p = rotation * expected.p + offset;
            assert!((actual.p - expected_p).length() < 1e-2);
        }
    }

    #[test]
    fn test_wrapped_light_sampling_is_consistent() {
        let rect: Arc<dyn Hittable> =
            Arc::new(AxisRect::new(RectPlane::XZ, (-1.0, 1.0), (-1.0, 1.0), 0.0, gray()));
        let light = Translate::new(Arc::new(RotateY::new(rect, 30.0)), Vec3::new(0.0, 3.0, 0.0));
        let mut rng = StdRng::seed_from_u64(17);
        let origin = Vec3::new(0.2, 0.0, -0.1);

        for _ in 0..200 {
            let d = light.random(origin, &mut rng);
            let target = origin + d;
            assert!((target.y - 3.0).abs() < 1e-3);
            assert!(light.pdf_value(origin, d) > 0.0);
        }
    }
}
