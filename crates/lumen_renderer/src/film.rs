//! Per-pixel sample accumulation and image output.

use crate::error::RenderResult;
use crate::Color;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-correct, clamp to `[0, 1]`, and quantize a linear color to 8 bits.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Running sum of radiance samples for one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelAccumulator {
    sum: Color,
    samples: u32,
}

impl PixelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample. Non-finite samples count as black.
    pub fn add(&mut self, sample: Color) {
        if sample.is_finite() {
            self.sum += sample;
        } else {
            log::trace!("discarding non-finite radiance sample {sample:?}");
        }
        self.samples += 1;
    }

    /// Fold another accumulator for the same pixel into this one.
    pub fn merge(&mut self, other: &PixelAccumulator) {
        self.sum += other.sum;
        self.samples += other.samples;
    }

    pub fn sum(&self) -> Color {
        self.sum
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Mean linear color; black when no samples were taken.
    pub fn average(&self) -> Color {
        if self.samples == 0 {
            Color::ZERO
        } else {
            self.sum / self.samples as f32
        }
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        color_to_rgb(self.average())
    }
}

/// Finished render: one accumulator per pixel, row-major, row 0 at the top.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<PixelAccumulator>,
}

impl ImageBuffer {
    /// Create an image with no samples in any pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PixelAccumulator::new(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Merge samples into the pixel at (x, y).
    pub fn accumulate(&mut self, x: u32, y: u32, samples: &PixelAccumulator) {
        let index = self.index(x, y);
        self.pixels[index].merge(samples);
    }

    pub fn pixels(&self) -> &[PixelAccumulator] {
        &self.pixels
    }

    /// Quantized RGB bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgb()).collect()
    }

    /// Write the plain-text PPM (P3) form: header, then one triplet per line.
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> RenderResult<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for pixel in &self.pixels {
            let [r, g, b] = pixel.to_rgb();
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
        Ok(())
    }

    /// Save to `path`: `.ppm` as text PPM, anything else through the `image` crate.
    pub fn save(&self, path: &Path) -> RenderResult<()> {
        let is_ppm = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let mut writer = BufWriter::new(File::create(path)?);
            self.write_ppm(&mut writer)?;
            writer.flush()?;
        } else {
            image::save_buffer(
                path,
                &self.to_rgb8(),
                self.width,
                self.height,
                image::ColorType::Rgb8,
            )?;
        }

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
