//! Common test infrastructure for registry tests.

use piekit_config::PathConfig;
use piekit_core::{PieError, PieResult};
use piekit_managers::{ConfigManager, Manager, ManagerCatalog};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared log of hook calls, as `"<manager>:<hook>"`.
pub type HookLog = Rc<RefCell<Vec<String>>>;

/// Manager that records its hooks and can declare dependencies.
pub struct RecordingManager {
    name: String,
    dependencies: Vec<String>,
    log: HookLog,
    pub mounted_with: Vec<PathConfig>,
    fail_mount: bool,
}

impl RecordingManager {
    pub fn new(name: &str, dependencies: &[&str], log: &HookLog) -> Self {
        Self {
            name: name.to_string(),
            dependencies: dependencies.iter().map(|d| (*d).to_string()).collect(),
            log: Rc::clone(log),
            mounted_with: Vec::new(),
            fail_mount: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_mount = true;
        self
    }
}

impl Manager for RecordingManager {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn mount(&mut self, args: &[PathConfig]) -> PieResult<()> {
        self.log.borrow_mut().push(format!("{}:mount", self.name));
        if self.fail_mount {
            return Err(PieError::internal(format!("{} refused to mount", self.name)));
        }
        self.mounted_with = args.to_vec();
        Ok(())
    }

    fn unmount(&mut self) -> PieResult<()> {
        self.log.borrow_mut().push(format!("{}:unmount", self.name));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Catalog with `configs`, `locales` (depends on configs) and `assets`.
pub fn test_catalog(log: &HookLog) -> ManagerCatalog {
    let locales_log = Rc::clone(log);
    let assets_log = Rc::clone(log);
    ManagerCatalog::new()
        .with("piekit.managers.configs", ConfigManager::NAME, || {
            Box::new(ConfigManager::new())
        })
        .with("piekit.managers.locales", "locales", move || {
            Box::new(RecordingManager::new("locales", &["configs"], &locales_log))
        })
        .with("piekit.managers.assets", "assets", move || {
            Box::new(RecordingManager::new("assets", &[], &assets_log))
        })
}

pub fn new_log() -> HookLog {
    Rc::new(RefCell::new(Vec::new()))
}
