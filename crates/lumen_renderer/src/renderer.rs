//! Path-tracing estimator and the parallel render driver.
//!
//! The estimator is recursive with a hard bounce limit: once `depth`
//! reaches zero the path returns black. That truncation is a known bias
//! (no Russian roulette) and is kept deliberately.

use crate::error::{RenderError, RenderResult};
use crate::film::{ImageBuffer, PixelAccumulator};
use crate::material::ScatterRecord;
use crate::partition::{generate_work_units, render_unit, Partition, UnitResult};
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::sampling::gen_f32;
use crate::{Camera, Color, Hittable, Scene};
use lumen_math::{Interval, Ray, EPSILON};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Minimum ray parameter accepted for secondary hits (avoids self-intersection).
const T_MIN: f32 = 0.001;

/// Mixture densities at or below this are treated as impossible directions.
const MIN_PDF: f32 = 1e-6;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed; every pixel derives its own stream from it
    pub seed: u64,
    /// Worker threads, 0 = one per core
    pub threads: usize,
    pub partition: Partition,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 600,
            image_height: 600,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            threads: 0,
            partition: Partition::Rows,
        }
    }
}

impl RenderConfig {
    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidResolution {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::ZeroSamples);
        }
        if let Partition::Tiles { size: 0 } = self.partition {
            return Err(RenderError::ZeroTileSize);
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height as f32
    }
}

/// Independent generator for pixel (x, y): same seed, one stream per pixel.
pub fn pixel_rng(seed: u64, x: u32, y: u32, image_width: u32) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(y as u64 * image_width as u64 + x as u64);
    rng
}

/// Estimate the radiance arriving along `ray`.
///
/// Diffuse bounces sample a 50/50 mixture of "toward the lights" and the
/// material's own density, weighting by `scattering_pdf / mixture_pdf`.
/// Specular bounces follow their single ray.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.world().hit(ray, Interval::new(T_MIN, f32::INFINITY)) else {
        return scene.background();
    };

    let emitted = rec.material.emitted(ray, &rec);
    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    match srec {
        ScatterRecord::Specular {
            attenuation,
            ray: specular,
        } => attenuation * ray_color(&specular, scene, depth - 1, rng),
        ScatterRecord::Diffuse { attenuation, pdf } => {
            let light_pdf = HittablePdf::new(scene.lights(), rec.p);
            let mixture = MixturePdf::new(&light_pdf, pdf.as_ref());

            let direction = mixture.generate(rng);
            // Lights without a sampler hand back a zero direction.
            if direction.length_squared() < EPSILON * EPSILON {
                return emitted;
            }

            let scattered = Ray::new(rec.p, direction, ray.time());
            let pdf_val = mixture.value(scattered.direction());
            let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);

            if !is_usable_pdf(pdf_val) || scattering_pdf <= 0.0 {
                return emitted;
            }

            let incoming = ray_color(&scattered, scene, depth - 1, rng);
            emitted + weighted_contribution(attenuation, scattering_pdf, incoming, pdf_val)
        }
    }
}

#[inline]
fn is_usable_pdf(pdf_val: f32) -> bool {
    pdf_val.is_finite() && pdf_val > MIN_PDF
}

/// `attenuation * scattering_pdf * incoming / pdf_val`, or black when the
/// density is zero, tiny, or not finite.
fn weighted_contribution(
    attenuation: Color,
    scattering_pdf: f32,
    incoming: Color,
    pdf_val: f32,
) -> Color {
    if !is_usable_pdf(pdf_val) {
        return Color::ZERO;
    }
    attenuation * scattering_pdf * incoming / pdf_val
}

/// Take `samples_per_pixel` jittered samples through pixel (x, y).
///
/// Row 0 is the top of the image; the camera's `t` runs bottom to top.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> PixelAccumulator {
    let s_span = config.image_width.saturating_sub(1).max(1) as f32;
    let t_span = config.image_height.saturating_sub(1).max(1) as f32;
    let j = config.image_height - 1 - y;

    let mut pixel = PixelAccumulator::new();
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / s_span;
        let t = (j as f32 + gen_f32(rng)) / t_span;
        let ray = camera.get_ray(s, t, rng);
        pixel.add(ray_color(&ray, scene, config.max_depth, rng));
    }
    pixel
}

/// Render the whole image on a dedicated worker pool.
///
/// Units are rendered in any order; their accumulators are placed by
/// coordinates afterwards, so the image is identical for every worker
/// count and partition strategy.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    config.validate()?;

    if (camera.aspect_ratio() - config.aspect_ratio()).abs() > 1e-3 {
        log::warn!(
            "Camera aspect {:.3} differs from image aspect {:.3}; output will be stretched",
            camera.aspect_ratio(),
            config.aspect_ratio()
        );
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if config.threads > 0 {
        builder = builder.num_threads(config.threads);
    }
    let pool = builder.build()?;

    let units = generate_work_units(config.image_width, config.image_height, config.partition);
    log::info!(
        "Rendering {}x{} @ {} spp, depth {}",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth
    );
    log::debug!(
        "{} work units ({:?}) on {} threads",
        units.len(),
        config.partition,
        pool.current_num_threads()
    );

    let start = Instant::now();
    let done = AtomicUsize::new(0);
    let step = (units.len() / 10).max(1);

    let results: Vec<UnitResult> = pool.install(|| {
        units
            .par_iter()
            .map(|unit| {
                let result = render_unit(unit, scene, camera, config);
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if finished % step == 0 {
                    log::debug!("{}/{} units done", finished, units.len());
                }
                result
            })
            .collect()
    });

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    for result in &results {
        for ((x, y), pixel) in result.unit.pixels().zip(&result.pixels) {
            image.accumulate(x, y, pixel);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
