//! Render passes
//!
//! Two pass kinds cover the whole graph: a queue pass drains FIFO job
//! queues over scene geometry, a fullscreen pass reads one target and
//! covers the screen with a single three-vertex draw. Both bind their
//! pass-scoped bindables before drawing.

use std::sync::Arc;

use glam::Mat4;

use crate::bindable::{Bindable, DrawContext};
use crate::engine_bail;
use crate::error::Result;
use crate::gfx::{GraphicsDevice, TargetId};
use crate::scene::Scene;

use super::job::Job;

/// Pass that drains a FIFO queue of jobs over scene geometry
pub struct RenderQueuePass {
    name: String,
    bindables: Vec<Arc<Bindable>>,
    color: Option<TargetId>,
    depth: Option<TargetId>,
    clear_color: Option<[f32; 4]>,
    clear_depth: Option<f32>,
    jobs: Vec<Job>,
}

impl RenderQueuePass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindables: Vec::new(),
            color: None,
            depth: None,
            clear_color: None,
            clear_depth: None,
            jobs: Vec::new(),
        }
    }

    /// Append a pass-scoped bindable; chainable
    pub fn with_bindable(mut self, bindable: Arc<Bindable>) -> Self {
        self.bindables.push(bindable);
        self
    }

    /// Color attachment jobs render into
    pub fn with_color_target(mut self, target: TargetId) -> Self {
        self.color = Some(target);
        self
    }

    /// Depth/stencil attachment
    pub fn with_depth_target(mut self, target: TargetId) -> Self {
        self.depth = Some(target);
        self
    }

    /// Clear the color attachment to this value before drawing
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = Some(color);
        self
    }

    /// Clear the depth attachment to this value before drawing
    pub fn with_clear_depth(mut self, depth: f32) -> Self {
        self.clear_depth = Some(depth);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a job; order of arrival is order of execution
    pub fn accept(&mut self, job: Job) {
        self.jobs.push(job);
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    fn execute(
        &self,
        scene: &Scene,
        device: &mut dyn GraphicsDevice,
        view: Mat4,
        projection: Mat4,
    ) -> Result<()> {
        device.set_render_target(self.color, self.depth)?;
        if let (Some(target), Some(color)) = (self.color, self.clear_color) {
            device.clear_target(target, color)?;
        }
        if let (Some(target), Some(depth)) = (self.depth, self.clear_depth) {
            device.clear_depth(target, depth)?;
        }
        {
            let mut ctx = DrawContext::pass_scope(device, view, projection);
            for bindable in &self.bindables {
                bindable.bind(&mut ctx)?;
            }
        }
        for job in &self.jobs {
            job.execute(scene, device, view, projection)?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.jobs.clear();
    }
}

/// Pass that reads one target and draws a single fullscreen triangle
pub struct FullscreenPass {
    name: String,
    bindables: Vec<Arc<Bindable>>,
    input: TargetId,
    input_slot: u32,
    color: Option<TargetId>,
    depth: Option<TargetId>,
    clear_color: Option<[f32; 4]>,
}

impl FullscreenPass {
    pub fn new(name: impl Into<String>, input: TargetId, input_slot: u32) -> Self {
        Self {
            name: name.into(),
            bindables: Vec::new(),
            input,
            input_slot,
            color: None,
            depth: None,
            clear_color: None,
        }
    }

    /// Append a pass-scoped bindable; chainable
    pub fn with_bindable(mut self, bindable: Arc<Bindable>) -> Self {
        self.bindables.push(bindable);
        self
    }

    pub fn with_color_target(mut self, target: TargetId) -> Self {
        self.color = Some(target);
        self
    }

    pub fn with_depth_target(mut self, target: TargetId) -> Self {
        self.depth = Some(target);
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = Some(color);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The target this pass samples from
    pub fn input(&self) -> TargetId {
        self.input
    }

    fn execute(
        &self,
        device: &mut dyn GraphicsDevice,
        view: Mat4,
        projection: Mat4,
    ) -> Result<()> {
        device.set_render_target(self.color, self.depth)?;
        if let (Some(target), Some(color)) = (self.color, self.clear_color) {
            device.clear_target(target, color)?;
        }
        device.bind_target_as_texture(self.input_slot, self.input)?;
        {
            let mut ctx = DrawContext::pass_scope(device, view, projection);
            for bindable in &self.bindables {
                bindable.bind(&mut ctx)?;
            }
        }
        // One triangle covering the whole viewport; no vertex buffer needed
        device.draw(3)
    }
}

/// A pass in the render graph
pub enum Pass {
    Queue(RenderQueuePass),
    Fullscreen(FullscreenPass),
}

impl Pass {
    pub fn name(&self) -> &str {
        match self {
            Pass::Queue(p) => p.name(),
            Pass::Fullscreen(p) => p.name(),
        }
    }

    /// Queue a job into this pass
    ///
    /// Fullscreen passes draw no scene geometry and reject jobs.
    pub(crate) fn accept(&mut self, job: Job) -> Result<()> {
        match self {
            Pass::Queue(p) => {
                p.accept(job);
                Ok(())
            }
            Pass::Fullscreen(p) => {
                engine_bail!(
                    GraphValidation,
                    "wind3d::Pass",
                    "pass '{}' is fullscreen and accepts no jobs",
                    p.name
                );
            }
        }
    }

    /// Number of jobs queued (always 0 for fullscreen passes)
    pub fn job_count(&self) -> usize {
        match self {
            Pass::Queue(p) => p.job_count(),
            Pass::Fullscreen(_) => 0,
        }
    }

    /// Attach a pass-scoped bindable after construction
    pub fn add_bindable(&mut self, bindable: Arc<Bindable>) {
        match self {
            Pass::Queue(p) => p.bindables.push(bindable),
            Pass::Fullscreen(p) => p.bindables.push(bindable),
        }
    }

    /// Target this pass samples, if it is a fullscreen pass
    pub(crate) fn input(&self) -> Option<TargetId> {
        match self {
            Pass::Queue(_) => None,
            Pass::Fullscreen(p) => Some(p.input),
        }
    }

    /// Attachments this pass writes: (color, depth)
    pub(crate) fn outputs(&self) -> (Option<TargetId>, Option<TargetId>) {
        match self {
            Pass::Queue(p) => (p.color, p.depth),
            Pass::Fullscreen(p) => (p.color, p.depth),
        }
    }

    pub(crate) fn execute(
        &self,
        scene: &Scene,
        device: &mut dyn GraphicsDevice,
        view: Mat4,
        projection: Mat4,
    ) -> Result<()> {
        match self {
            Pass::Queue(p) => p.execute(scene, device, view, projection),
            Pass::Fullscreen(p) => p.execute(device, view, projection),
        }
    }

    pub(crate) fn reset(&mut self) {
        if let Pass::Queue(p) = self {
            p.reset();
        }
    }
}

#[cfg(test)]
#[path = "pass_tests.rs"]
mod tests;
