//! Camera for ray generation.

use crate::error::CameraError;
use crate::sampling::{gen_range, random_in_unit_disk};
use lumen_math::{Ray, Vec3, EPSILON};
use rand::RngCore;

/// Camera configuration, consumed once by [`CameraSettings::build`].
#[derive(Debug, Clone)]
pub struct CameraSettings {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Viewport width / height
    aperture: f32,     // Lens diameter, 0 = pinhole
    focus_dist: f32,   // Distance from camera to plane of perfect focus

    // Shutter interval
    time0: f32,
    time1: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 1.0,
        }
    }
}

impl CameraSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture.max(0.0);
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the interval ray times are drawn from.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Derive the viewport and lens basis.
    pub fn build(&self) -> Result<Camera, CameraError> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(CameraError::InvalidFov(self.vfov));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(CameraError::InvalidAspectRatio(self.aspect_ratio));
        }
        let view = self.look_from - self.look_at;
        if view.length_squared() < EPSILON * EPSILON {
            return Err(CameraError::ZeroViewDirection);
        }
        let side = self.vup.cross(view);
        if side.length_squared() < EPSILON * EPSILON {
            return Err(CameraError::UpParallelToView);
        }

        // Calculate viewport dimensions
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = view.normalize();
        let u = side.normalize();
        let v = w.cross(u);

        // The image plane sits at the focus distance
        let focus_dist = self.focus_dist.max(EPSILON);
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner =
            self.look_from - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        Ok(Camera {
            origin: self.look_from,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: self.aperture / 2.0,
            time0: self.time0,
            time1: self.time1,
            aspect_ratio: self.aspect_ratio,
        })
    }
}

/// Immutable camera. Safe to share across render workers.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
    time0: f32,
    time1: f32,
    aspect_ratio: f32,
}

impl Camera {
    /// Ray through normalized image coordinates `s` (left to right) and
    /// `t` (bottom to top), both in `[0, 1]`.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        let time = gen_range(rng, self.time0, self.time1);

        Ray::new(origin, target - origin, time)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}
