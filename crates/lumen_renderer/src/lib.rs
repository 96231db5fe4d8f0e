//! Lumen - CPU path tracer
//!
//! A Monte Carlo path tracer that importance-samples each diffuse bounce
//! from a 50/50 mixture of "toward the lights" and the surface's own
//! scattering density.
//!
//! Scenes are built from spheres, axis-aligned rectangles and boxes, with
//! flip/translate/rotate wrappers, and rendered in parallel with one
//! deterministic random stream per pixel.

mod camera;
mod cuboid;
mod error;
mod film;
mod hittable;
mod instance;
mod material;
mod partition;
mod pdf;
mod rect;
mod renderer;
mod sampling;
mod scene;
mod sphere;

pub use camera::{Camera, CameraSettings};
pub use cuboid::Cuboid;
pub use error::{CameraError, RenderError, RenderResult, SceneError};
pub use film::{color_to_rgb, linear_to_gamma, ImageBuffer, PixelAccumulator};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{FlipFace, RotateY, Translate};
pub use material::{Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterRecord};
pub use partition::{
    generate_work_units, render_unit, Partition, UnitResult, WorkUnit, DEFAULT_TILE_SIZE,
};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf};
pub use rect::{AxisRect, RectPlane};
pub use renderer::{pixel_rng, ray_color, render, render_pixel, RenderConfig};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
