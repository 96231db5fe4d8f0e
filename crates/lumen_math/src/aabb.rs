use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box, one interval per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two opposite corners, in any order.
    ///
    /// Flat boxes (an axis-aligned rectangle) are padded so every axis has
    /// a non-zero extent.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Slab test against `ray` restricted to `ray_t`.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for (axis, slab) in [self.x, self.y, self.z].iter().enumerate() {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (slab.min - ray.origin[axis]) * inv_d;
            let mut t1 = (slab.max - ray.origin[axis]) * inv_d;
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

    /// Move the box by `offset`.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            x: self.x.offset(offset.x),
            y: self.y.offset(offset.y),
            z: self.z.offset(offset.z),
        }
    }

    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        for slab in [&mut self.x, &mut self.y, &mut self.z] {
            if slab.size() < delta {
                *slab = slab.expand(delta);
            }
        }
    }
}
