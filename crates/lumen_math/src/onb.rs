use crate::Vec3;

/// Orthonormal basis built around a single direction `w`.
///
/// Used to take directions sampled in a canonical z-up frame (cosine
/// hemisphere, cone toward a sphere) into world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Build a basis whose `w` axis points along `n` (need not be normalized).
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        // Any axis not parallel to w works as a helper.
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    /// Express local coordinates `(a.x, a.y, a.z)` in world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }

    /// Project a world-space vector onto the basis.
    #[inline]
    pub fn to_local(&self, a: Vec3) -> Vec3 {
        Vec3::new(a.dot(self.u), a.dot(self.v), a.dot(self.w))
    }
}
