//! Techniques and steps
//!
//! A technique is a named, toggleable group of render-state bindables.
//! Each step targets one render-graph pass, so a single drawable can
//! contribute to several passes (geometry plus outline mask) without
//! duplicating its geometry bindables.

use std::sync::Arc;

use crate::bindable::{Bindable, DrawContext};
use crate::error::Result;

/// One step of a technique, targeting a single pass
pub struct Step {
    pass_name: String,
    bindables: Vec<Arc<Bindable>>,
    enabled: bool,
}

impl Step {
    pub fn new(pass_name: impl Into<String>) -> Self {
        Self {
            pass_name: pass_name.into(),
            bindables: Vec::new(),
            enabled: true,
        }
    }

    /// Append a bindable; chainable
    pub fn with_bindable(mut self, bindable: Arc<Bindable>) -> Self {
        self.bindables.push(bindable);
        self
    }

    pub fn add_bindable(&mut self, bindable: Arc<Bindable>) {
        self.bindables.push(bindable);
    }

    /// Name of the pass this step submits to
    pub fn pass_name(&self) -> &str {
        &self.pass_name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn bindables(&self) -> &[Arc<Bindable>] {
        &self.bindables
    }

    /// Bind this step's state, in order, after the drawable's own binds
    pub(crate) fn bind(&self, ctx: &mut DrawContext) -> Result<()> {
        for bindable in &self.bindables {
            bindable.bind(ctx)?;
        }
        Ok(())
    }
}

/// Named, toggleable sequence of steps
pub struct Technique {
    name: String,
    active: bool,
    steps: Vec<Step>,
}

impl Technique {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            steps: Vec::new(),
        }
    }

    /// Append a step; chainable
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// An inactive technique submits no jobs
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step_mut(&mut self, index: usize) -> Option<&mut Step> {
        self.steps.get_mut(index)
    }
}

#[cfg(test)]
#[path = "technique_tests.rs"]
mod tests;
