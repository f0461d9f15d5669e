//! Process-wide settings fed by plugin packages.

use piekit_core::{PieError, PieResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Key/value store filled from `globals.toml` files.
///
/// Later loads override earlier keys.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    values: BTreeMap<String, toml::Value>,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges every top-level key of a TOML file into the store.
    ///
    /// Returns the number of keys read.
    pub fn load_by_path(&mut self, path: &Path) -> PieResult<usize> {
        let text = std::fs::read_to_string(path)?;
        let table: toml::Table = text.parse().map_err(|e: toml::de::Error| {
            PieError::plugin_loading(format!("Invalid globals file {}: {}", path.display(), e))
        })?;

        let count = table.len();
        self.values.extend(table);
        debug!(path = %path.display(), keys = count, "Globals loaded");
        Ok(count)
    }

    /// Moves every key of `other` into the store, overriding existing keys.
    pub fn merge(&mut self, other: Globals) {
        self.values.extend(other.values);
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.values.get(key)
    }

    /// Gets a value converted to `T`, or `None` if absent or mistyped.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values.get(key).cloned().and_then(|v| v.try_into().ok())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
