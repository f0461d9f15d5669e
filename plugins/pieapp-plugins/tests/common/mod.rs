//! Common test infrastructure for the built-in plugins.

#![allow(dead_code)]

use piekit_config::{AppConfig, Globals};
use piekit_plugin_api::{MainWindow, PackageVersions, PluginPackage};
use piekit_plugin_runtime::PluginManager;
use pieapp_plugins::builtin_catalog;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Window recording what plugins did to it.
#[derive(Default)]
pub struct RecordingWindow {
    pub messages: RefCell<Vec<String>>,
    pub menus: RefCell<Vec<String>>,
}

impl MainWindow for RecordingWindow {
    fn title(&self) -> String {
        "PieApp".to_string()
    }

    fn show_status_message(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn add_menu(&self, name: &str, _text: &str) {
        self.menus.borrow_mut().push(name.to_string());
    }

    fn menus(&self) -> Vec<String> {
        self.menus.borrow().clone()
    }
}

pub fn package(name: &str) -> PluginPackage {
    PluginPackage {
        name: name.to_string(),
        path: PathBuf::from(name),
        versions: PackageVersions {
            version: "1.0.0".to_string(),
            application_version: "1.0.0".to_string(),
            framework_version: "1.0.0".to_string(),
        },
    }
}

/// Plugin manager over the built-in catalog with a recording window.
pub fn manager(config: &AppConfig) -> (PluginManager, Rc<RecordingWindow>) {
    let manager = PluginManager::new(
        config,
        builtin_catalog(),
        Rc::new(RefCell::new(Globals::new())),
    );
    let window = Rc::new(RecordingWindow::default());
    manager.set_main_window(window.clone());
    (manager, window)
}
