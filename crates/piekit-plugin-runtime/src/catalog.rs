//! Entry-name lookup of plugin `main` functions.

use piekit_core::{PieError, PieResult};
use piekit_plugin_api::PluginEntry;
use std::collections::HashMap;
use std::fmt;

/// Maps the `entry` named in a plugin module to its `main` function.
#[derive(Clone, Default)]
pub struct PluginCatalog {
    entries: HashMap<String, PluginEntry>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, entry: PluginEntry) {
        self.entries.insert(name.into(), entry);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, entry: PluginEntry) -> Self {
        self.register(name, entry);
        self
    }

    /// Adds every entry of `other`, replacing same-named ones.
    pub fn extend(&mut self, other: PluginCatalog) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, name: &str) -> PieResult<PluginEntry> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| PieError::plugin_loading(format!("Unknown plugin entry `{}`", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("PluginCatalog").field("entries", &names).finish()
    }
}
