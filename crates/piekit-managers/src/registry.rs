//! Registry of mounted managers.

use crate::{Manager, ManagerCatalog};
use piekit_config::{ManagerConfig, PathConfig};
use piekit_core::{PieError, PieResult};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// What to mount.
pub enum ManagerRef {
    /// Import path resolved through the catalog; mounted with no arguments.
    Path(String),
    /// A ready-made instance; mounted with no arguments.
    Instance(Box<dyn Manager>),
    /// A configured manager; its mount hook runs only when `mount` is set.
    Config(ManagerConfig),
}

impl From<ManagerConfig> for ManagerRef {
    fn from(config: ManagerConfig) -> Self {
        Self::Config(config)
    }
}

impl From<Box<dyn Manager>> for ManagerRef {
    fn from(manager: Box<dyn Manager>) -> Self {
        Self::Instance(manager)
    }
}

struct MountedManager {
    instance: Box<dyn Manager>,
    args: Vec<PathConfig>,
}

/// Name to manager mapping, in mount order.
///
/// Dependencies are checked against the managers declared in the
/// configuration: a dependency that is neither declared nor mounted is
/// `DependencyNotFound`; one that is declared but not yet mounted is
/// `ObjectNotMounted`. Managers are never reordered.
pub struct ManagersRegistry {
    catalog: ManagerCatalog,
    declared: Vec<String>,
    order: Vec<String>,
    managers: HashMap<String, MountedManager>,
}

impl ManagersRegistry {
    /// Creates an empty registry.
    pub fn new(catalog: ManagerCatalog) -> Self {
        Self {
            catalog,
            declared: Vec::new(),
            order: Vec::new(),
            managers: HashMap::new(),
        }
    }

    /// Declares the configured managers used by dependency checks.
    #[must_use]
    pub fn with_declared(mut self, configs: &[ManagerConfig]) -> Self {
        self.declared = configs
            .iter()
            .map(|config| self.declared_name(&config.import_string))
            .collect();
        self
    }

    fn declared_name(&self, import_string: &str) -> String {
        self.catalog.name_of(import_string).map_or_else(
            || {
                import_string
                    .rsplit('.')
                    .next()
                    .unwrap_or(import_string)
                    .to_string()
            },
            str::to_string,
        )
    }

    /// Mounts one manager and registers it under its name.
    ///
    /// Fails before any hook runs if a dependency is missing. A failing
    /// mount hook leaves the manager unregistered.
    pub fn mount(&mut self, manager: impl Into<ManagerRef>) -> PieResult<()> {
        let (mut instance, args, run_hook) = match manager.into() {
            ManagerRef::Path(import_string) => (self.catalog.create(&import_string)?, Vec::new(), true),
            ManagerRef::Instance(instance) => (instance, Vec::new(), true),
            ManagerRef::Config(config) => {
                let instance = self.catalog.create(&config.import_string)?;
                (instance, config.args, config.mount)
            }
        };

        let name = instance.name().to_string();
        self.check_dependencies(instance.as_ref())?;

        info!(manager = %name, "Mounting manager");
        if run_hook {
            instance.mount(&args)?;
        } else {
            debug!(manager = %name, "Mount hook skipped by configuration");
        }

        if self.managers.contains_key(&name) {
            warn!(manager = %name, "Manager mounted twice, replacing the previous instance");
            self.order.retain(|n| n != &name);
        }
        self.order.push(name.clone());
        self.managers.insert(name, MountedManager { instance, args });
        Ok(())
    }

    /// Mounts configured managers in order.
    pub fn mount_all(&mut self, configs: &[ManagerConfig]) -> PieResult<()> {
        for config in configs {
            self.mount(ManagerRef::Config(config.clone()))?;
        }
        Ok(())
    }

    /// Runs unmount hooks and removes the managers.
    ///
    /// With `full_house` or an empty `names`, every manager is unmounted in
    /// mount order.
    pub fn unmount(&mut self, names: &[&str], full_house: bool) -> PieResult<()> {
        info!("Preparing to unmount managers");
        for name in self.select(names, full_house) {
            let mut mounted = self
                .managers
                .remove(&name)
                .ok_or_else(|| PieError::ObjectNotMounted(name.clone()))?;
            self.order.retain(|n| n != &name);

            info!(manager = %name, "Unmounting manager");
            mounted.instance.unmount()?;
        }
        Ok(())
    }

    /// Unmounts and re-mounts managers with the arguments they were first mounted with.
    pub fn reload(&mut self, names: &[&str], full_house: bool) -> PieResult<()> {
        for name in self.select(names, full_house) {
            let mounted = self
                .managers
                .get_mut(&name)
                .ok_or_else(|| PieError::ObjectNotMounted(name.clone()))?;

            info!(manager = %name, "Reloading manager");
            mounted.instance.unmount()?;
            mounted.instance.mount(&mounted.args)?;
        }
        Ok(())
    }

    /// Drops managers without running their hooks.
    pub fn destroy(&mut self, names: &[&str], full_house: bool) -> PieResult<()> {
        let selected = if full_house {
            self.order.clone()
        } else {
            names.iter().map(|n| (*n).to_string()).collect()
        };

        for name in selected {
            info!(manager = %name, "Destroying manager");
            if self.managers.remove(&name).is_none() {
                return Err(PieError::ObjectNotMounted(name));
            }
            self.order.retain(|n| n != &name);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> PieResult<&dyn Manager> {
        self.managers
            .get(name)
            .map(|m| m.instance.as_ref())
            .ok_or_else(|| PieError::ObjectNotMounted(name.to_string()))
    }

    /// Typed lookup.
    pub fn get_as<T: Manager>(&self, name: &str) -> PieResult<&T> {
        self.get(name)?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| PieError::internal(format!("Manager {} has an unexpected type", name)))
    }

    /// Typed mutable lookup.
    pub fn get_mut_as<T: Manager>(&mut self, name: &str) -> PieResult<&mut T> {
        self.managers
            .get_mut(name)
            .ok_or_else(|| PieError::ObjectNotMounted(name.to_string()))?
            .instance
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| PieError::internal(format!("Manager {} has an unexpected type", name)))
    }

    pub fn is_mounted(&self, name: &str) -> bool {
        self.managers.contains_key(name)
    }

    /// Mounted manager names in mount order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn catalog(&self) -> &ManagerCatalog {
        &self.catalog
    }

    fn select(&self, names: &[&str], full_house: bool) -> Vec<String> {
        if full_house || names.is_empty() {
            self.order.clone()
        } else {
            names.iter().map(|n| (*n).to_string()).collect()
        }
    }

    fn check_dependencies(&self, manager: &dyn Manager) -> PieResult<()> {
        for dependency in manager.dependencies() {
            debug!(manager = %manager.name(), dependency = %dependency, "Checking manager dependency");
            let declared = self.declared.iter().any(|n| n == &dependency);

            if !declared && !self.is_mounted(&dependency) {
                return Err(PieError::DependencyNotFound(dependency));
            }
            if declared && !self.is_mounted(&dependency) {
                return Err(PieError::ObjectNotMounted(dependency));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ManagersRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagersRegistry")
            .field("declared", &self.declared)
            .field("mounted", &self.order)
            .finish()
    }
}
