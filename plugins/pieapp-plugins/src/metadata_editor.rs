//! Metadata editor plugin. Needs the converter's file table.

use crate::{converter, EmitterSlot};
use piekit_core::PieResult;
use piekit_plugin_api::{
    EventRouter, MainWindow, Plugin, PluginDescriptor, PluginPackage, PluginSignal,
    SignalEmitter, PLUGIN_SHUTDOWN_EVENT,
};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

pub const NAME: &str = "metadata-editor";
pub const ENTRY: &str = "metadata-editor";

pub const EDIT_MENU: (&str, &str) = ("edit", "Edit");

pub struct MetadataEditor {
    descriptor: PluginDescriptor,
    router: EventRouter,
    editing: Rc<Cell<bool>>,
    slot: EmitterSlot,
}

impl MetadataEditor {
    pub fn new(window: Rc<dyn MainWindow>, package: &PluginPackage) -> Self {
        let editing = Rc::new(Cell::new(false));
        let table_event = PluginSignal::custom(converter::TABLE_READY)
            .event_name()
            .to_string();

        let mut router = EventRouter::new();
        {
            let window = Rc::clone(&window);
            let editing = Rc::clone(&editing);
            router.on_event(converter::NAME, table_event, move || {
                // The edit menu is added once per converter session.
                if !editing.replace(true) {
                    window.add_menu(EDIT_MENU.0, EDIT_MENU.1);
                }
                Ok(())
            });
        }
        {
            let editing = Rc::clone(&editing);
            router.on_event(converter::NAME, PLUGIN_SHUTDOWN_EVENT, move || {
                debug!(plugin = NAME, "Converter went away");
                editing.set(false);
                Ok(())
            });
        }

        Self {
            descriptor: PluginDescriptor::new(NAME)
                .requires([converter::NAME])
                .versions(package.versions.clone()),
            router,
            editing,
            slot: EmitterSlot::default(),
        }
    }

    /// True once the converter has a table to edit.
    pub fn is_editing(&self) -> bool {
        self.editing.get()
    }
}

impl Plugin for MetadataEditor {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn bind(&self, emitter: SignalEmitter) {
        self.slot.bind(emitter);
    }

    fn on_plugin_event(&self, source: &str, event: Option<&str>) -> PieResult<()> {
        self.router.route(source, event).map(|_| ())
    }

    fn prepare(&self) -> PieResult<()> {
        self.slot.ready(NAME)
    }
}

pub fn main(
    window: Rc<dyn MainWindow>,
    package: &PluginPackage,
) -> PieResult<Option<Rc<dyn Plugin>>> {
    let plugin: Rc<dyn Plugin> = Rc::new(MetadataEditor::new(window, package));
    Ok(Some(plugin))
}
