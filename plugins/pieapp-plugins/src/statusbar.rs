//! Status bar plugin.

use crate::EmitterSlot;
use piekit_core::PieResult;
use piekit_plugin_api::{MainWindow, Plugin, PluginDescriptor, PluginPackage, SignalEmitter};
use std::rc::Rc;
use tracing::debug;

pub const NAME: &str = "statusbar";
pub const ENTRY: &str = "statusbar";

pub const READY_MESSAGE: &str = "Plugins are ready";

/// Shows short messages in the main window's status area.
pub struct StatusBar {
    descriptor: PluginDescriptor,
    window: Rc<dyn MainWindow>,
    slot: EmitterSlot,
}

impl StatusBar {
    pub fn new(window: Rc<dyn MainWindow>, package: &PluginPackage) -> Self {
        Self {
            descriptor: PluginDescriptor::new(NAME).versions(package.versions.clone()),
            window,
            slot: EmitterSlot::default(),
        }
    }

    pub fn show_message(&self, message: &str) {
        debug!(plugin = NAME, message, "Status message");
        self.window.show_status_message(message);
    }
}

impl Plugin for StatusBar {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn bind(&self, emitter: SignalEmitter) {
        self.slot.bind(emitter);
    }

    fn prepare(&self) -> PieResult<()> {
        self.slot.ready(NAME)?;
        self.show_message(READY_MESSAGE);
        Ok(())
    }
}

/// Package entry point.
pub fn main(
    window: Rc<dyn MainWindow>,
    package: &PluginPackage,
) -> PieResult<Option<Rc<dyn Plugin>>> {
    let plugin: Rc<dyn Plugin> = Rc::new(StatusBar::new(window, package));
    Ok(Some(plugin))
}
