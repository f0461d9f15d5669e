//! Main menu bar plugin.

use crate::{statusbar, EmitterSlot};
use piekit_core::PieResult;
use piekit_plugin_api::{
    EventRouter, MainWindow, Plugin, PluginDescriptor, PluginPackage, SignalEmitter,
};
use std::rc::Rc;

pub const NAME: &str = "menubar";
pub const ENTRY: &str = "menubar";

/// Top-level menus as `(name, text)`.
pub const MENUS: [(&str, &str); 2] = [("file", "File"), ("help", "Help")];

/// Adds the application's top-level menus.
///
/// Uses the status bar, when present, to announce itself.
pub struct MenuBar {
    descriptor: PluginDescriptor,
    window: Rc<dyn MainWindow>,
    router: EventRouter,
    slot: EmitterSlot,
}

impl MenuBar {
    pub fn new(window: Rc<dyn MainWindow>, package: &PluginPackage) -> Self {
        let mut router = EventRouter::new();
        let status = Rc::clone(&window);
        router.on_ready(statusbar::NAME, move || {
            status.show_status_message("Menu bar is ready");
            Ok(())
        });

        Self {
            descriptor: PluginDescriptor::new(NAME)
                .optional([statusbar::NAME])
                .versions(package.versions.clone()),
            window,
            router,
            slot: EmitterSlot::default(),
        }
    }
}

impl Plugin for MenuBar {
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
        for (name, text) in MENUS {
            self.window.add_menu(name, text);
        }
        self.slot.ready(NAME)
    }
}

pub fn main(
    window: Rc<dyn MainWindow>,
    package: &PluginPackage,
) -> PieResult<Option<Rc<dyn Plugin>>> {
    let plugin: Rc<dyn Plugin> = Rc::new(MenuBar::new(window, package));
    Ok(Some(plugin))
}
