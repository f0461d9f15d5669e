//! Console-backed main window.

use piekit_plugin_api::MainWindow;
use std::cell::RefCell;
use tracing::{debug, info};

/// Main window that renders through the log.
#[derive(Debug, Default)]
pub struct ConsoleWindow {
    title: String,
    menus: RefCell<Vec<(String, String)>>,
    status: RefCell<Option<String>>,
}

impl ConsoleWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Last status message shown.
    pub fn status(&self) -> Option<String> {
        self.status.borrow().clone()
    }

    /// Display text of the menu called `name`.
    pub fn menu_text(&self, name: &str) -> Option<String> {
        self.menus
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.clone())
    }
}

impl MainWindow for ConsoleWindow {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn show_status_message(&self, message: &str) {
        info!(window = %self.title, "{}", message);
        *self.status.borrow_mut() = Some(message.to_string());
    }

    fn add_menu(&self, name: &str, text: &str) {
        let mut menus = self.menus.borrow_mut();
        if let Some(entry) = menus.iter_mut().find(|(n, _)| n == name) {
            debug!(menu = name, "Menu already exists, renaming");
            entry.1 = text.to_string();
        } else {
            debug!(menu = name, text, "Menu added");
            menus.push((name.to_string(), text.to_string()));
        }
    }

    fn menus(&self) -> Vec<String> {
        self.menus.borrow().iter().map(|(n, _)| n.clone()).collect()
    }
}
