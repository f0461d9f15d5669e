//! # PieApp
//!
//! Desktop host for PieKit: builds the main window, the manager registry and
//! the plugin manager, and drives them through startup and shutdown.

pub mod app;
pub mod startup;
pub mod window;

pub use app::{PieApp, CONFIGS_MANAGER, PLUGINS_MANAGER};
pub use window::ConsoleWindow;
