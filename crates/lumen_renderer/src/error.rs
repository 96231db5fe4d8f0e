//! Error types for scene assembly, camera setup, and rendering.

use thiserror::Error;

/// Errors raised while assembling a [`Scene`](crate::Scene).
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("lights collection is empty; at least one importance-sampling target is required")]
    NoLights,
}

/// Errors raised by [`CameraSettings::build`](crate::CameraSettings::build).
#[derive(Error, Debug, PartialEq)]
pub enum CameraError {
    #[error("look-from and look-at coincide")]
    ZeroViewDirection,

    #[error("up vector is parallel to the view direction")]
    UpParallelToView,

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),
}

/// Errors raised by the render driver and image output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid image resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("tile size must be at least 1")]
    ZeroTileSize,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
