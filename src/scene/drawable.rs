//! Drawables
//!
//! A drawable owns its geometry bindables, its techniques and a
//! model-to-world transform. The builder validates the geometry
//! invariants up front: exactly one index buffer (its count becomes the
//! draw count) and exactly one topology. A drawable that builds can
//! always draw.

use std::sync::Arc;

use glam::Mat4;

use crate::bindable::{Bindable, DrawContext};
use crate::engine_bail;
use crate::error::Result;
use crate::graph::{Job, RenderGraph};
use crate::scene::technique::{Step, Technique};

use super::scene::DrawableKey;

/// Builder validating drawable construction invariants
pub struct DrawableBuilder {
    bindables: Vec<Arc<Bindable>>,
    techniques: Vec<Technique>,
    transform: Mat4,
}

impl DrawableBuilder {
    pub fn new() -> Self {
        Self {
            bindables: Vec::new(),
            techniques: Vec::new(),
            transform: Mat4::IDENTITY,
        }
    }

    /// Append a geometry bindable; chainable
    pub fn with_bindable(mut self, bindable: Arc<Bindable>) -> Self {
        self.bindables.push(bindable);
        self
    }

    /// Append a technique; chainable
    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.techniques.push(technique);
        self
    }

    /// Initial model-to-world transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Validate and build the drawable
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDrawable`] unless the geometry
    /// bindables contain exactly one index buffer and exactly one
    /// topology.
    pub fn build(self) -> Result<Drawable> {
        let index_counts: Vec<u32> = self
            .bindables
            .iter()
            .filter_map(|b| b.as_index_buffer())
            .map(|ib| ib.count())
            .collect();
        if index_counts.len() != 1 {
            engine_bail!(
                InvalidDrawable,
                "wind3d::Drawable",
                "drawable must own exactly one index buffer, found {}",
                index_counts.len()
            );
        }
        let topology_count = self.bindables.iter().filter(|b| b.is_topology()).count();
        if topology_count != 1 {
            engine_bail!(
                InvalidDrawable,
                "wind3d::Drawable",
                "drawable must own exactly one topology, found {}",
                topology_count
            );
        }
        Ok(Drawable {
            bindables: self.bindables,
            techniques: self.techniques,
            index_count: index_counts[0],
            transform: self.transform,
        })
    }
}

impl Default for DrawableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An entity that issues itself as one indexed draw call
pub struct Drawable {
    bindables: Vec<Arc<Bindable>>,
    techniques: Vec<Technique>,
    index_count: u32,
    transform: Mat4,
}

impl Drawable {
    /// Start building a drawable
    pub fn builder() -> DrawableBuilder {
        DrawableBuilder::new()
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Per-frame transform mutation; the only state that changes after
    /// construction
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    /// Look up a technique by name (for toggling at runtime)
    pub fn technique_mut(&mut self, name: &str) -> Option<&mut Technique> {
        self.techniques.iter_mut().find(|t| t.name() == name)
    }

    pub(crate) fn step(&self, technique: usize, step: usize) -> Option<&Step> {
        self.techniques.get(technique)?.step(step)
    }

    /// Bind every geometry bindable, in insertion order
    pub(crate) fn bind(&self, ctx: &mut DrawContext) -> Result<()> {
        for bindable in &self.bindables {
            bindable.bind(ctx)?;
        }
        Ok(())
    }

    /// Queue one job per enabled step of every active technique
    pub(crate) fn submit(&self, key: DrawableKey, graph: &mut RenderGraph) -> Result<()> {
        for (ti, technique) in self.techniques.iter().enumerate() {
            if !technique.active() {
                continue;
            }
            for (si, step) in technique.steps().iter().enumerate() {
                if !step.enabled() {
                    continue;
                }
                graph.accept(step.pass_name(), Job::new(key, ti, si))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "drawable_tests.rs"]
mod tests;
