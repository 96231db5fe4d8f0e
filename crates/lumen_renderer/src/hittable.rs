//! Hittable trait, HitRecord, and the HittableList composite.

use crate::sampling::gen_index;
use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Material of the surface that was hit, owned by the scene
    pub material: &'a dyn Material,
    /// Surface coordinates
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the ray hit the front (outward-facing) side
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record at parameter `t`, orienting the normal against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// `outward_normal` is assumed to be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can hit.
///
/// The light-sampling pair `pdf_value` / `random` is only meaningful for
/// objects that can be importance-sampled as lights. Implement both or
/// neither: the defaults describe an object that is never sampled, with a
/// density of zero everywhere and a zero-length sampled direction, which the
/// estimator discards.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with a ray parameter strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Bounding volume, if the object is bounded.
    fn bounding_box(&self) -> Option<Aabb> {
        None
    }

    /// Solid-angle density of reaching this object from `origin` along `direction`.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// Direction from `origin` toward a sampled point on this object.
    ///
    /// Returns `Vec3::ZERO` when the object cannot be sampled.
    fn random(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::ZERO
    }
}

/// An ordered list of shared hittable objects.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Option<Aabb>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = match (self.bbox, object.bounding_box()) {
            (Some(a), Some(b)) => Some(Aabb::surrounding(&a, &b)),
            (None, b) if self.objects.is_empty() => b,
            // One unbounded child makes the whole list unbounded.
            _ => None,
        };
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromIterator<Arc<dyn Hittable>> for HittableList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Hittable>>>(iter: I) -> Self {
        let mut list = HittableList::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(max)) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    /// Unweighted average of the children's densities.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }
        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    /// Samples toward one uniformly chosen child.
    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::ZERO;
        }
        let index = gen_index(rng, self.objects.len());
        self.objects[index].random(origin, rng)
    }
}
