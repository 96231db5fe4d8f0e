//! Read-only scene: renderable objects, importance-sampling targets, background.

use crate::error::SceneError;
use crate::{Color, HittableList};

/// Everything the estimator reads during a render.
///
/// Built once and never mutated afterwards; workers share it by reference.
#[derive(Clone)]
pub struct Scene {
    world: HittableList,
    lights: HittableList,
    background: Color,
}

impl Scene {
    /// Assemble a scene.
    ///
    /// `lights` holds the objects scattered rays are aimed at; they usually
    /// also appear in `world` through shared handles. An empty `lights` is
    /// rejected since light sampling would then silently contribute nothing.
    pub fn new(
        world: HittableList,
        lights: HittableList,
        background: Color,
    ) -> Result<Self, SceneError> {
        if lights.is_empty() {
            return Err(SceneError::NoLights);
        }
        log::debug!(
            "Scene: {} objects, {} light-sampling targets",
            world.len(),
            lights.len()
        );
        Ok(Self {
            world,
            lights,
            background,
        })
    }

    pub fn world(&self) -> &HittableList {
        &self.world
    }

    pub fn lights(&self) -> &HittableList {
        &self.lights
    }

    /// Radiance returned by rays that escape all geometry.
    pub fn background(&self) -> Color {
        self.background
    }
}
