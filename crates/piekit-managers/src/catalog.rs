//! Import-path lookup of manager constructors.

use crate::Manager;
use piekit_core::{PieError, PieResult};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

type ManagerFactory = Box<dyn Fn() -> Box<dyn Manager>>;

struct CatalogEntry {
    name: String,
    factory: ManagerFactory,
}

/// Maps dotted import paths (`piekit.managers.configs`) to manager constructors.
#[derive(Default)]
pub struct ManagerCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl ManagerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for the manager named `name`.
    ///
    /// A later registration for the same import path replaces the earlier one.
    pub fn register<F>(&mut self, import_string: impl Into<String>, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Manager> + 'static,
    {
        let import_string = import_string.into();
        let name = name.into();
        debug!(import_string = %import_string, manager = %name, "Manager registered in catalog");
        self.entries.insert(
            import_string,
            CatalogEntry {
                name,
                factory: Box::new(factory),
            },
        );
    }

    /// Builder-style `register`.
    #[must_use]
    pub fn with<F>(mut self, import_string: impl Into<String>, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Manager> + 'static,
    {
        self.register(import_string, name, factory);
        self
    }

    /// Constructs a fresh manager.
    pub fn create(&self, import_string: &str) -> PieResult<Box<dyn Manager>> {
        self.entries
            .get(import_string)
            .map(|entry| (entry.factory)())
            .ok_or_else(|| PieError::ManagerNotFound(import_string.to_string()))
    }

    /// Manager name registered for an import path.
    pub fn name_of(&self, import_string: &str) -> Option<&str> {
        self.entries.get(import_string).map(|entry| entry.name.as_str())
    }

    pub fn contains(&self, import_string: &str) -> bool {
        self.entries.contains_key(import_string)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ManagerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("ManagerCatalog").field("entries", &keys).finish()
    }
}
