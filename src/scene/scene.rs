//! Scene - the drawable store
//!
//! Drawables live in a slotmap and are addressed by [`DrawableKey`].
//! Jobs queued into the render graph carry keys, not references, so a
//! drawable removed between submit and execute simply fails job
//! resolution instead of dangling.

use slotmap::SlotMap;

use crate::error::Result;
use crate::graph::RenderGraph;

use super::drawable::Drawable;

slotmap::new_key_type! {
    /// Stable handle to a drawable in a [`Scene`]
    pub struct DrawableKey;
}

/// Store of drawables, keyed by stable handles
pub struct Scene {
    drawables: SlotMap<DrawableKey, Drawable>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self {
            drawables: SlotMap::with_key(),
        }
    }

    /// Add a drawable and return its key
    pub fn add_drawable(&mut self, drawable: Drawable) -> DrawableKey {
        self.drawables.insert(drawable)
    }

    /// Remove a drawable, returning it if the key was live
    pub fn remove_drawable(&mut self, key: DrawableKey) -> Option<Drawable> {
        self.drawables.remove(key)
    }

    pub fn drawable(&self, key: DrawableKey) -> Option<&Drawable> {
        self.drawables.get(key)
    }

    pub fn drawable_mut(&mut self, key: DrawableKey) -> Option<&mut Drawable> {
        self.drawables.get_mut(key)
    }

    /// Number of drawables in the scene
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Keys of all drawables, in storage order
    pub fn keys(&self) -> impl Iterator<Item = DrawableKey> + '_ {
        self.drawables.keys()
    }

    /// Submit every drawable's enabled steps as jobs into the graph
    pub fn submit(&self, graph: &mut RenderGraph) -> Result<()> {
        for (key, drawable) in &self.drawables {
            drawable.submit(key, graph)?;
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
