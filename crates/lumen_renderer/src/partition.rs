//! Splitting the image into independent work units.
//!
//! A unit is a rectangle of pixels. Rows, square tiles and single pixels
//! are all expressed as units, so the driver has one code path for each
//! partition strategy.

use crate::film::PixelAccumulator;
use crate::renderer::{pixel_rng, render_pixel, RenderConfig};
use crate::{Camera, Scene};

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// How the image is cut into parallel work items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Partition {
    /// One unit per scanline.
    #[default]
    Rows,
    /// Square tiles of `size` pixels (edge tiles may be smaller).
    Tiles { size: u32 },
    /// One unit per pixel.
    Pixels,
}

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit {
    /// X coordinate of the unit's top-left corner
    pub x: u32,
    /// Y coordinate of the unit's top-left corner (row 0 is the top)
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl WorkUnit {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Global pixel coordinates covered by this unit, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}

/// Cut a `width` x `height` image into units, ordered top-to-bottom then
/// left-to-right. Together the units cover every pixel exactly once.
pub fn generate_work_units(width: u32, height: u32, partition: Partition) -> Vec<WorkUnit> {
    let (unit_w, unit_h) = match partition {
        Partition::Rows => (width.max(1), 1),
        Partition::Tiles { size } => (size.max(1), size.max(1)),
        Partition::Pixels => (1, 1),
    };

    let mut units = Vec::new();
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let w = unit_w.min(width - x);
            let h = unit_h.min(height - y);
            units.push(WorkUnit::new(x, y, w, h));
            x += unit_w;
        }
        y += unit_h;
    }

    units
}

/// Result of rendering one unit.
#[derive(Debug, Clone)]
pub struct UnitResult {
    /// The unit that was rendered
    pub unit: WorkUnit,
    /// Accumulators in the unit's row-major order
    pub pixels: Vec<PixelAccumulator>,
}

/// Render every pixel of a unit.
///
/// Each pixel draws from its own generator, so the result does not depend
/// on which worker runs the unit or when.
pub fn render_unit(
    unit: &WorkUnit,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> UnitResult {
    let pixels = unit
        .pixels()
        .map(|(x, y)| {
            let mut rng = pixel_rng(config.seed, x, y, config.image_width);
            render_pixel(camera, scene, x, y, config, &mut rng)
        })
        .collect();

    UnitResult {
        unit: *unit,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(width: u32, height: u32, partition: Partition) -> Vec<u32> {
        let mut hits = vec![0u32; (width * height) as usize];
        for unit in generate_work_units(width, height, partition) {
            assert_eq!(unit.pixels().count() as u32, unit.pixel_count());
            for (x, y) in unit.pixels() {
                hits[(y * width + x) as usize] += 1;
            }
        }
        hits
    }

    #[test]
    fn test_every_partition_covers_each_pixel_once() {
        for partition in [
            Partition::Rows,
            Partition::Tiles { size: 4 },
            Partition::Tiles { size: 64 },
            Partition::Pixels,
        ] {
            let hits = coverage(13, 7, partition);
            assert!(hits.iter().all(|&h| h == 1), "{partition:?}");
        }
    }

    #[test]
    fn test_rows_are_scanlines_top_to_bottom() {
        let units = generate_work_units(10, 3, Partition::Rows);
        assert_eq!(units.len(), 3);
        for (i, unit) in units.iter().enumerate() {
            assert_eq!(*unit, WorkUnit::new(0, i as u32, 10, 1));
        }
    }

    #[test]
    fn test_tiles_partial_fit() {
        let units = generate_work_units(100, 100, Partition::Tiles { size: 64 });
        assert_eq!(units.len(), 4);
        assert_eq!(units[1], WorkUnit::new(64, 0, 36, 64));
        assert_eq!(units[3], WorkUnit::new(64, 64, 36, 36));

        let total: u32 = units.iter().map(|u| u.pixel_count()).sum();
        assert_eq!(total, 100 * 100);
    }

    #[test]
    fn test_zero_tile_size_degrades_to_pixels() {
        let units = generate_work_units(3, 2, Partition::Tiles { size: 0 });
        assert_eq!(units.len(), 6);
    }

    #[test]
    fn test_pixels_unit_order() {
        let units = generate_work_units(2, 2, Partition::Pixels);
        let origins: Vec<(u32, u32)> = units.iter().map(|u| (u.x, u.y)).collect();
        assert_eq!(origins, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
