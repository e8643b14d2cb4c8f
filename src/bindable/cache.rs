//! Bindable cache - shares GPU objects across drawables
//!
//! Identical bindables (the same shader, layout, or state block) are
//! created once and shared by `Arc`. Entries are keyed by their
//! construction parameters; the convention is "kind.param.param", e.g.
//! "vs.phong" or "blend.alpha".

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::Result;

use super::Bindable;

/// Cache of shared bindables keyed by construction parameters
pub struct BindableCache {
    entries: FxHashMap<String, Arc<Bindable>>,
}

impl BindableCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Get the bindable for `key`, building it on first use
    ///
    /// The factory runs only on a cache miss. A failing factory inserts
    /// nothing: no partially constructed entry is ever shared.
    pub fn resolve<F>(&mut self, key: &str, build: F) -> Result<Arc<Bindable>>
    where
        F: FnOnce() -> Result<Bindable>,
    {
        if let Some(existing) = self.entries.get(key) {
            return Ok(existing.clone());
        }
        let bindable = Arc::new(build()?);
        self.entries.insert(key.to_string(), bindable.clone());
        Ok(bindable)
    }

    /// Whether a bindable is cached under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached bindables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all cached entries (shared bindables stay alive with their
    /// remaining holders)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for BindableCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
