//! # PieKit Plugin API
//!
//! Plugin API for PieKit.
//! Defines the contract between the plugin manager and plugins, and the host
//! surface plugins talk to.

pub mod extensions;
mod router;
mod signal;

pub use extensions::{MainWindow, PluginApi};
pub use router::EventRouter;
pub use signal::*;

use piekit_core::PieResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::rc::Rc;

/// Versions a plugin package declares.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageVersions {
    /// Package version.
    pub version: String,
    /// Application version the package was built against.
    pub application_version: String,
    /// Framework version the package was built against.
    pub framework_version: String,
}

/// Plugin descriptor containing static metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Unique plugin name.
    pub name: String,
    /// Plugins that must be ready before this one is useful.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Plugins this one can use when present.
    #[serde(default)]
    pub optional: Vec<String>,
    /// Versions of the package the plugin came from.
    #[serde(default)]
    pub versions: PackageVersions,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            optional: Vec::new(),
            versions: PackageVersions::default(),
        }
    }

    #[must_use]
    pub fn requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn versions(mut self, versions: PackageVersions) -> Self {
        self.versions = versions;
        self
    }

    /// Returns true if `name` appears among the required or optional plugins.
    pub fn depends_on(&self, name: &str) -> bool {
        self.requires.iter().chain(&self.optional).any(|n| n == name)
    }
}

/// A plugin package found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPackage {
    /// Package directory name.
    pub name: String,
    /// Package directory.
    pub path: PathBuf,
    /// Checked package versions.
    pub versions: PackageVersions,
}

/// Plugin trait that all plugins must implement.
///
/// Instances are shared through `Rc`, so every hook takes `&self`; plugins keep
/// mutable state behind `Cell`/`RefCell`.
pub trait Plugin {
    /// Returns the plugin descriptor.
    fn descriptor(&self) -> &PluginDescriptor;

    /// Returns the unique plugin name.
    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Custom signals this plugin may emit besides `Ready`.
    fn signals(&self) -> Vec<PluginSignal> {
        Vec::new()
    }

    /// Hands the plugin the emitter it uses to fire its signals.
    fn bind(&self, emitter: SignalEmitter);

    /// Called when a related plugin becomes ready (`event` is `None`), fires a
    /// custom signal, or shuts down.
    fn on_plugin_event(&self, _source: &str, _event: Option<&str>) -> PieResult<()> {
        Ok(())
    }

    /// Optional capability exposing `prepare`/`shutdown` to the manager.
    fn api(&self) -> Option<Rc<dyn PluginApi>> {
        None
    }

    /// Called once after the plugin is registered and wired.
    fn prepare(&self) -> PieResult<()> {
        Ok(())
    }
}

/// Entry point of a plugin package.
///
/// Returning `Ok(None)` means the package declined to load.
pub type PluginEntry = fn(Rc<dyn MainWindow>, &PluginPackage) -> PieResult<Option<Rc<dyn Plugin>>>;
