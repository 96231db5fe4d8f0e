//! `lumen` - render a built-in scene to PPM or PNG.

mod scenes;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lumen_renderer::{render, Partition, RenderConfig, DEFAULT_TILE_SIZE};
use scenes::SceneKind;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PartitionKind {
    Rows,
    Tiles,
    Pixels,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(next_line_help = true)]
struct Args {
    /// Scene to render.
    #[arg(long, value_enum, default_value_t = SceneKind::Cornell)]
    scene: SceneKind,
    /// Image width in pixels.
    #[arg(long, default_value_t = 600)]
    width: u32,
    /// Image height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Samples per pixel.
    #[arg(long, default_value_t = 100)]
    spp: u32,
    /// Maximum bounce depth.
    #[arg(long, default_value_t = 50)]
    depth: u32,
    /// Base random seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Worker threads (0 = all cores).
    #[arg(long, default_value_t = 0)]
    threads: usize,
    /// How the image is split across workers.
    #[arg(long, value_enum, default_value_t = PartitionKind::Rows)]
    partition: PartitionKind,
    /// Tile edge in pixels for `--partition tiles`.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
    tile_size: u32,
    /// Output file; `.ppm` is written as text, other extensions via the image encoder.
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,
    /// Write PPM to standard output instead of a file.
    #[arg(long)]
    stdout: bool,
}

impl Args {
    fn render_config(&self) -> RenderConfig {
        let partition = match self.partition {
            PartitionKind::Rows => Partition::Rows,
            PartitionKind::Tiles => Partition::Tiles {
                size: self.tile_size,
            },
            PartitionKind::Pixels => Partition::Pixels,
        };
        RenderConfig {
            image_width: self.width,
            image_height: self.height,
            samples_per_pixel: self.spp,
            max_depth: self.depth,
            seed: self.seed,
            threads: self.threads,
            partition,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = args.render_config();
    config.validate()?;

    let (scene, camera) = scenes::build(args.scene, config.aspect_ratio())
        .with_context(|| format!("Failed to build scene {:?}", args.scene))?;
    log::info!("Scene {:?} ready", args.scene);

    let image = render(&scene, &camera, &config)?;

    if args.stdout {
        let mut out = io::BufWriter::new(io::stdout().lock());
        image
            .write_ppm(&mut out)
            .context("Failed to write PPM to stdout")?;
        out.flush().context("Failed to flush stdout")?;
    } else {
        image
            .save(&args.output)
            .with_context(|| format!("Failed to save {}", args.output.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["lumen"]);
        assert_eq!(args.scene, SceneKind::Cornell);
        let config = args.render_config();
        assert_eq!((config.image_width, config.image_height), (600, 600));
        assert_eq!(config.samples_per_pixel, 100);
        assert_eq!(config.partition, Partition::Rows);
        assert!(!args.stdout);
    }

    #[test]
    fn test_tiles_flags() {
        let args = Args::parse_from([
            "lumen",
            "--scene",
            "cornell-glass",
            "--partition",
            "tiles",
            "--tile-size",
            "16",
            "--threads",
            "3",
            "-o",
            "box.png",
        ]);
        assert_eq!(args.scene, SceneKind::CornellGlass);
        let config = args.render_config();
        assert_eq!(config.partition, Partition::Tiles { size: 16 });
        assert_eq!(config.threads, 3);
        assert_eq!(args.output, PathBuf::from("box.png"));
    }

    #[test]
    fn test_zero_spp_rejected() {
        let args = Args::parse_from(["lumen", "--spp", "0"]);
        assert!(args.render_config().validate().is_err());
    }
}
