//! Sphere primitive, usable as a light-sampling target.

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::{random_to_sphere, random_unit_vector};
use crate::Material;
use lumen_math::{Aabb, Interval, Onb, Ray, Vec3, EPSILON};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// UV coordinates for a point `p` on the unit sphere centered at the origin.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y, phi: angle around Y from -X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    /// True when `origin` lies inside (or on) the sphere.
    fn encloses(&self, origin: Vec3) -> bool {
        (self.center - origin).length_squared() <= self.radius * self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a < EPSILON * EPSILON {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::get_sphere_uv(outward_normal),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        Some(Aabb::from_points(self.center - rvec, self.center + rvec))
    }

    /// Uniform density over the cone of directions that see the sphere.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.encloses(origin) {
            // Every direction from inside reaches the surface.
            return 1.0 / (4.0 * PI);
        }
        let ray = Ray::new(origin, direction, 0.0);
        if self.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none() {
            return 0.0;
        }

        let distance_squared = (self.center - origin).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared).max(0.0).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        if solid_angle < EPSILON {
            return 0.0;
        }
        1.0 / solid_angle
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.encloses(origin) {
            return random_unit_vector(rng);
        }
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(rng, self.radius, distance_squared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, Arc::new(Lambertian::new(Vec3::splat(0.5))))
    }

    #[test]
    fn test_sphere_hit() {
        let s = sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        let rec = s.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 0.001);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let s = sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(s.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let s = sphere(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        let rec = s.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_zero_direction_misses() {
        let s = sphere(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 0.0);
        assert!(s.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_pdf_value_matches_cone() {
        let s = sphere(Vec3::new(0.0, 0.0, -3.0), 1.0);
        let expected = 1.0 / (2.0 * PI * (1.0 - (8.0f32 / 9.0).sqrt()));

        assert!((s.pdf_value(Vec3::ZERO, -Vec3::Z) - expected).abs() < 1e-3);
        assert_eq!(s.pdf_value(Vec3::ZERO, Vec3::Z), 0.0);
    }

    #[test]
    fn test_sphere_random_directions_hit_sphere() {
        let s = sphere(Vec3::new(2.0, 1.0, -3.0), 1.0);
        let mut rng = StdRng::seed_from_u64(9);
        let hits = (0..500)
            .filter(|_| {
                let d = s.random(Vec3::ZERO, &mut rng);
                s.pdf_value(Vec3::ZERO, d) > 0.0
            })
            .count();
        // Directions on the cone's rim may graze past in f32.
        assert!(hits >= 495, "only {hits} of 500 sampled directions hit");
    }

    #[test]
    fn test_sphere_density_from_inside_is_uniform() {
        let s = sphere(Vec3::ZERO, 2.0);
        let mut rng = StdRng::seed_from_u64(2);
        let d = s.random(Vec3::new(0.5, 0.0, 0.0), &mut rng);
        assert!((d.length() - 1.0).abs() < 1e-4);
        assert!((s.pdf_value(Vec3::new(0.5, 0.0, 0.0), d) - 1.0 / (4.0 * PI)).abs() < 1e-6);
    }
}
