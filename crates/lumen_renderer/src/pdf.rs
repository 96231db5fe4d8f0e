//! Direction-sampling densities and their equal-weight mixture.

use crate::sampling::{gen_f32, random_cosine_direction};
use crate::Hittable;
use lumen_math::{Onb, Vec3, EPSILON};
use rand::RngCore;
use std::f32::consts::PI;

/// A probability density over directions, with a matching sampler.
///
/// `value` is a solid-angle density and `generate` must draw directions
/// distributed according to it.
pub trait Pdf {
    /// Density of `direction` (need not be normalized). Never negative.
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction from this density.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted hemisphere around a surface normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(normal),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let length = direction.length();
        if length < EPSILON {
            return 0.0;
        }
        let cosine = direction.dot(self.uvw.w) / length;
        if cosine <= 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

/// Aims at a hittable (usually the lights) from a fixed origin.
pub struct HittablePdf<'a> {
    origin: Vec3,
    target: &'a dyn Hittable,
}

impl<'a> HittablePdf<'a> {
    pub fn new(target: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { origin, target }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.target.pdf_value(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.target.random(self.origin, rng)
    }
}

/// Equal-weight mixture of two densities.
///
/// Sampling flips a fair coin to pick the child; the density is the mean of
/// both children, which is what makes the one-sample estimate unbiased.
pub struct MixturePdf<'a> {
    p: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p: [p0, p1] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.p[0].value(direction) + 0.5 * self.p[1].value(direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.p[0].generate(rng)
        } else {
            self.p[1].generate(rng)
        }
    }
}
