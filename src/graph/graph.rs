//! Render graph - named passes executed in declaration order
//!
//! The graph owns its passes and a name-to-index lookup. Drawables
//! submit jobs by pass name; execution walks the declared order, which
//! is the sole ordering contract between passes.

use std::cell::Cell;

use glam::Mat4;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine_bail;
use crate::engine_warn;
use crate::error::Result;
use crate::gfx::{GraphicsDevice, TargetId, TargetUsage};
use crate::scene::Scene;

use super::job::Job;
use super::pass::Pass;

/// Ordered collection of named passes
pub struct RenderGraph {
    passes: Vec<Pass>,
    lookup: FxHashMap<String, usize>,
    view: Mat4,
    projection: Mat4,
    executed: Cell<bool>,
}

impl RenderGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            lookup: FxHashMap::default(),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            executed: Cell::new(false),
        }
    }

    /// Append a pass; declaration order is execution order
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::GraphValidation`] if a pass with the same
    /// name already exists.
    pub fn add_pass(&mut self, pass: Pass) -> Result<()> {
        if self.lookup.contains_key(pass.name()) {
            engine_bail!(
                GraphValidation,
                "wind3d::RenderGraph",
                "a pass named '{}' already exists",
                pass.name()
            );
        }
        self.lookup.insert(pass.name().to_string(), self.passes.len());
        self.passes.push(pass);
        Ok(())
    }

    /// Get a pass by name
    pub fn pass(&self, name: &str) -> Option<&Pass> {
        self.lookup.get(name).map(|&i| &self.passes[i])
    }

    /// Get a pass by name for mutation (attaching bindables)
    pub fn pass_mut(&mut self, name: &str) -> Option<&mut Pass> {
        let index = *self.lookup.get(name)?;
        self.passes.get_mut(index)
    }

    /// All passes, in execution order
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Queue a job into the named pass
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownPass`] if no pass has that name,
    /// or [`crate::Error::GraphValidation`] if the pass is fullscreen.
    pub fn accept(&mut self, pass_name: &str, job: Job) -> Result<()> {
        let Some(&index) = self.lookup.get(pass_name) else {
            engine_bail!(
                UnknownPass,
                "wind3d::RenderGraph",
                "no pass named '{}' in the graph",
                pass_name
            );
        };
        self.passes[index].accept(job)
    }

    /// Camera matrices applied to every draw this frame
    pub fn set_camera(&mut self, view: Mat4, projection: Mat4) {
        self.view = view;
        self.projection = projection;
    }

    /// Check wiring against the device's target descriptors
    ///
    /// Every fullscreen input must be written by an earlier pass, carry
    /// `SHADER_RESOURCE` usage, and differ from the pass's own color
    /// attachment.
    pub fn validate(&self, device: &dyn GraphicsDevice) -> Result<()> {
        let mut written: FxHashSet<TargetId> = FxHashSet::default();
        for pass in &self.passes {
            if let Some(input) = pass.input() {
                if !written.contains(&input) {
                    engine_bail!(
                        GraphValidation,
                        "wind3d::RenderGraph",
                        "pass '{}' samples a target no earlier pass writes",
                        pass.name()
                    );
                }
                let Some(desc) = device.target_desc(input) else {
                    engine_bail!(
                        GraphValidation,
                        "wind3d::RenderGraph",
                        "pass '{}' samples an unknown target",
                        pass.name()
                    );
                };
                if !desc.usage.contains(TargetUsage::SHADER_RESOURCE) {
                    engine_bail!(
                        GraphValidation,
                        "wind3d::RenderGraph",
                        "pass '{}' samples a target created without SHADER_RESOURCE usage",
                        pass.name()
                    );
                }
                let (color, _) = pass.outputs();
                if color == Some(input) {
                    engine_bail!(
                        GraphValidation,
                        "wind3d::RenderGraph",
                        "pass '{}' samples its own color attachment",
                        pass.name()
                    );
                }
            }
            let (color, depth) = pass.outputs();
            written.extend(color);
            written.extend(depth);
        }
        Ok(())
    }

    /// Execute every pass in declaration order
    ///
    /// Queues are left intact; call [`RenderGraph::reset`] (or use
    /// [`RenderGraph::render_frame`]) before the next frame's submits.
    pub fn execute(&self, scene: &Scene, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.executed.replace(true) {
            engine_warn!(
                "wind3d::RenderGraph",
                "graph executed twice without reset; queued jobs draw again"
            );
        }
        for pass in &self.passes {
            pass.execute(scene, device, self.view, self.projection)?;
        }
        Ok(())
    }

    /// Drain every pass's job queue for the next frame
    pub fn reset(&mut self) {
        for pass in &mut self.passes {
            pass.reset();
        }
        self.executed.set(false);
    }

    /// Execute then reset, even when execution fails
    pub fn render_frame(&mut self, scene: &Scene, device: &mut dyn GraphicsDevice) -> Result<()> {
        let result = self.execute(scene, device);
        self.reset();
        result
    }
}

impl Default for RenderGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
