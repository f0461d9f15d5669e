//! # PieApp Plugins
//!
//! Plugins shipped with PieApp. Each module exposes a `main` entry point the
//! plugin manager resolves through [`builtin_catalog`].

pub mod converter;
pub mod menubar;
pub mod metadata_editor;
pub mod statusbar;

use piekit_core::{PieError, PieResult};
use piekit_plugin_api::{PluginSignal, SignalEmitter};
use piekit_plugin_runtime::PluginCatalog;
use std::cell::RefCell;

/// Catalog with the entry point of every built-in package.
pub fn builtin_catalog() -> PluginCatalog {
    PluginCatalog::new()
        .with(statusbar::ENTRY, statusbar::main)
        .with(menubar::ENTRY, menubar::main)
        .with(converter::ENTRY, converter::main)
        .with(metadata_editor::ENTRY, metadata_editor::main)
}

/// Emitter slot filled by `Plugin::bind`.
#[derive(Debug, Default)]
pub(crate) struct EmitterSlot {
    emitter: RefCell<Option<SignalEmitter>>,
}

impl EmitterSlot {
    pub(crate) fn bind(&self, emitter: SignalEmitter) {
        *self.emitter.borrow_mut() = Some(emitter);
    }

    pub(crate) fn emit(&self, plugin: &str, signal: &PluginSignal) -> PieResult<()> {
        let emitter = self
            .emitter
            .borrow()
            .clone()
            .ok_or_else(|| PieError::plugin(plugin, "plugin is not bound to a manager"))?;
        emitter.emit(signal)
    }

    pub(crate) fn ready(&self, plugin: &str) -> PieResult<()> {
        self.emit(plugin, &PluginSignal::Ready)
    }
}
