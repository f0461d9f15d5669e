//! Application assembly.

use crate::ConsoleWindow;
use chrono::{DateTime, Local};
use piekit_config::{check_user_root, restore_user_root, AppConfig, Globals};
use piekit_core::PieResult;
use piekit_managers::{ConfigManager, ManagerCatalog, ManagersRegistry};
use piekit_plugin_runtime::{PluginCatalog, PluginManager};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

/// Import path of the configuration manager.
pub const CONFIGS_MANAGER: &str = "piekit.managers.configs";

/// Import path of the plugin manager.
pub const PLUGINS_MANAGER: &str = "piekit.managers.plugins";

/// The running application: main window, managers and plugins.
pub struct PieApp {
    config: AppConfig,
    window: Rc<ConsoleWindow>,
    plugins: PluginManager,
    registry: ManagersRegistry,
    started_at: DateTime<Local>,
}

impl PieApp {
    /// Builds the application with the built-in plugins.
    pub fn new(config: AppConfig) -> Self {
        Self::with_catalog(config, pieapp_plugins::builtin_catalog())
    }

    /// Builds the application with a custom plugin catalog.
    pub fn with_catalog(config: AppConfig, catalog: PluginCatalog) -> Self {
        let window = Rc::new(ConsoleWindow::new(format!(
            "{} {}",
            config.app.name, config.app.version
        )));
        let globals = Rc::new(RefCell::new(Globals::new()));

        let plugins = PluginManager::new(&config, catalog, globals);
        plugins.set_main_window(window.clone());

        let handle = plugins.clone();
        let managers = ManagerCatalog::new()
            .with(CONFIGS_MANAGER, ConfigManager::NAME, || {
                Box::new(ConfigManager::new())
            })
            .with(PLUGINS_MANAGER, PluginManager::NAME, move || {
                Box::new(handle.clone())
            });
        let registry = ManagersRegistry::new(managers).with_declared(&config.managers);

        Self {
            config,
            window,
            plugins,
            registry,
            started_at: Local::now(),
        }
    }

    /// Creates the user root on first run.
    ///
    /// Returns the directories that were created.
    pub fn bootstrap(&self) -> PieResult<Vec<PathBuf>> {
        if check_user_root(&self.config.paths) {
            return Ok(Vec::new());
        }
        info!(path = %self.config.paths.user_root.display(), "User root is incomplete, restoring");
        restore_user_root(&self.config.paths)
    }

    /// Bootstraps the user root and mounts the configured managers.
    pub fn start(&mut self) -> PieResult<()> {
        self.bootstrap()?;
        self.registry.mount_all(&self.config.resolved_managers())?;
        info!(
            managers = self.registry.names().count(),
            plugins = self.plugins.plugin_names().len(),
            "Application started"
        );
        Ok(())
    }

    /// Unmounts every manager, last mounted first.
    pub fn stop(&mut self) -> PieResult<()> {
        let mut names = self.manager_names();
        names.reverse();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        if !names.is_empty() {
            self.registry.unmount(&names, false)?;
        }
        info!("Application stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn window(&self) -> &Rc<ConsoleWindow> {
        &self.window
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn registry(&self) -> &ManagersRegistry {
        &self.registry
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Mounted manager names in mount order.
    pub fn manager_names(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }
}
