//! Jobs - one queued draw of one drawable step
//!
//! A job is a plain value: a drawable key plus technique and step
//! indices. It carries no references, so queues survive scene mutation
//! between submit and execute; a job whose drawable was removed fails
//! resolution instead of dangling.

use glam::Mat4;

use crate::bindable::DrawContext;
use crate::engine_bail;
use crate::error::Result;
use crate::gfx::GraphicsDevice;
use crate::scene::{DrawableKey, Scene};

/// One queued draw: a drawable step bound to a pass this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    key: DrawableKey,
    technique: usize,
    step: usize,
}

impl Job {
    pub(crate) fn new(key: DrawableKey, technique: usize, step: usize) -> Self {
        Self {
            key,
            technique,
            step,
        }
    }

    /// Key of the drawable this job draws
    pub fn drawable(&self) -> DrawableKey {
        self.key
    }

    /// Resolve against the scene, bind drawable then step, and draw
    pub(crate) fn execute(
        &self,
        scene: &Scene,
        device: &mut dyn GraphicsDevice,
        view: Mat4,
        projection: Mat4,
    ) -> Result<()> {
        let Some(drawable) = scene.drawable(self.key) else {
            engine_bail!(
                InvalidDrawable,
                "wind3d::Job",
                "job references a drawable no longer in the scene"
            );
        };
        let Some(step) = drawable.step(self.technique, self.step) else {
            engine_bail!(
                InvalidDrawable,
                "wind3d::Job",
                "job references missing step {}.{} of a drawable",
                self.technique,
                self.step
            );
        };
        let mut ctx = DrawContext {
            device,
            world: drawable.transform(),
            view,
            projection,
        };
        drawable.bind(&mut ctx)?;
        step.bind(&mut ctx)?;
        ctx.device.draw_indexed(drawable.index_count())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
