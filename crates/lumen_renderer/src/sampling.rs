//! Random sampling helpers.
//!
//! Every function draws from a caller-supplied generator so that each
//! render worker can own an independent stream.

use lumen_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform `f32` in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform `f32` in `[min, max)`. Returns `min` when the range is empty.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + (max - min) * gen_f32(rng)
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub fn gen_index(rng: &mut dyn RngCore, len: usize) -> usize {
    rng.gen_range(0..len)
}

/// Rejection-sampled point inside the unit disk in the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Rejection-sampled point inside the unit ball.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        // Tiny vectors lose precision when normalized.
        if len_sq > 1e-6 {
            return p / len_sq.sqrt();
        }
    }
}

/// Cosine-weighted direction on the +Z hemisphere; `z >= 0` always.
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let phi = 2.0 * PI * r1;
    let r = r2.sqrt();

    Vec3::new(phi.cos() * r, phi.sin() * r, (1.0 - r2).max(0.0).sqrt())
}

/// Uniform direction inside the cone (around +Z) subtended by a sphere of
/// `radius` seen from squared distance `distance_squared`.
pub fn random_to_sphere(rng: &mut dyn RngCore, radius: f32, distance_squared: f32) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);

    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}
