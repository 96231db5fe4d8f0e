//! Axis-aligned rectangles, the building block for rooms, boxes and area lights.

use crate::hittable::{HitRecord, Hittable};
use crate::sampling::gen_range;
use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3, EPSILON};
use rand::RngCore;
use std::sync::Arc;

/// Which coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectPlane {
    /// Spans x and y at constant z, outward normal +Z.
    XY,
    /// Spans x and z at constant y, outward normal +Y.
    XZ,
    /// Spans y and z at constant x, outward normal +X.
    YZ,
}

impl RectPlane {
    /// Indices of the two in-plane axes and the fixed axis.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            RectPlane::XY => (0, 1, 2),
            RectPlane::XZ => (0, 2, 1),
            RectPlane::YZ => (1, 2, 0),
        }
    }

    fn outward_normal(self) -> Vec3 {
        match self {
            RectPlane::XY => Vec3::Z,
            RectPlane::XZ => Vec3::Y,
            RectPlane::YZ => Vec3::X,
        }
    }
}

/// A rectangle `a0..a1 x b0..b1` lying on the plane `fixed axis = k`.
pub struct AxisRect {
    plane: RectPlane,
    a: Interval,
    b: Interval,
    k: f32,
    material: Arc<dyn Material>,
}

impl AxisRect {
    /// `a` and `b` are the extents along the plane's first and second axis
    /// (x/y for `XY`, x/z for `XZ`, y/z for `YZ`), in either order.
    pub fn new(
        plane: RectPlane,
        a: (f32, f32),
        b: (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            plane,
            a: Interval::new(a.0.min(a.1), a.0.max(a.1)),
            b: Interval::new(b.0.min(b.1), b.0.max(b.1)),
            k,
            material,
        }
    }

    pub fn area(&self) -> f32 {
        self.a.size() * self.b.size()
    }

    fn point(&self, a: f32, b: f32) -> Vec3 {
        let (ia, ib, ik) = self.plane.axes();
        let mut p = Vec3::ZERO;
        p[ia] = a;
        p[ib] = b;
        p[ik] = self.k;
        p
    }
}

/// Position of `x` within `range` mapped to `[0, 1]`.
#[inline]
fn unit_coordinate(x: f32, range: Interval) -> f32 {
    let size = range.size();
    if size > 0.0 {
        (x - range.min) / size
    } else {
        0.0
    }
}

impl Hittable for AxisRect {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (ia, ib, ik) = self.plane.axes();

        // Rays parallel to the plane never cross it.
        let dk = ray.direction()[ik];
        if dk.abs() < EPSILON {
            return None;
        }

        let t = (self.k - ray.origin()[ik]) / dk;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let (a, b) = (p[ia], p[ib]);
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let uv = (unit_coordinate(a, self.a), unit_coordinate(b, self.b));
        Some(HitRecord::new(
            ray,
            t,
            self.plane.outward_normal(),
            uv,
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(Aabb::from_points(
            self.point(self.a.min, self.b.min),
            self.point(self.a.max, self.b.max),
        ))
    }

    /// Uniform-area density converted to solid angle: `d² / (|cos θ| · A)`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let area = self.area();
        if area < EPSILON {
            return 0.0;
        }
        let ray = Ray::new(origin, direction, 0.0);
        let Some(rec) = self.hit(&ray, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let length_squared = direction.length_squared();
        let distance_squared = rec.t * rec.t * length_squared;
        let cosine = direction.dot(rec.normal).abs() / length_squared.sqrt();
        if cosine < EPSILON {
            return 0.0;
        }

        distance_squared / (cosine * area)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let a = gen_range(rng, self.a.min, self.a.max);
        let b = gen_range(rng, self.b.min, self.b.max);
        self.point(a, b) - origin
    }
}
