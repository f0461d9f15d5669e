//! Host and capability extension points.

use piekit_core::PieResult;

/// Lifecycle capability a plugin may expose through `Plugin::api`.
pub trait PluginApi {
    /// Called right after the owning plugin is wired, before `Plugin::prepare`.
    fn prepare(&self) -> PieResult<()>;

    /// Called once when the owning plugin shuts down.
    fn shutdown(&self);
}

/// The main window plugins attach to.
pub trait MainWindow {
    /// Window title.
    fn title(&self) -> String;

    /// Shows a transient message in the status area.
    fn show_status_message(&self, message: &str);

    /// Adds a top-level menu.
    fn add_menu(&self, name: &str, text: &str);

    /// Names of the menus added so far.
    fn menus(&self) -> Vec<String> {
        Vec::new()
    }
}
