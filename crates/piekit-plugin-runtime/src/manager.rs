//! Plugin manager: discovery, registration and dependency notifications.

use crate::package::{self, HostVersions, ResolvedPackage};
use crate::{AvailabilityTable, DependencyGraph, Edges, PluginCatalog};
use piekit_config::{AppConfig, Globals, PathConfig, PathsConfig, PluginsConfig};
use piekit_core::{PieError, PieResult};
use piekit_managers::Manager;
use piekit_plugin_api::{
    MainWindow, Plugin, PluginSignal, SignalEmitter, SignalSink, PLUGIN_SHUTDOWN_EVENT,
};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Plugin manager.
///
/// A cheap handle over single-threaded shared state. Notifications run
/// synchronously and never hold a borrow of the state while a plugin
/// callback runs, so callbacks may emit further signals.
#[derive(Clone)]
pub struct PluginManager {
    inner: Rc<PluginManagerInner>,
}

struct PluginManagerInner {
    paths: PathsConfig,
    layout: PluginsConfig,
    host: HostVersions,
    catalog: PluginCatalog,
    globals: Rc<RefCell<Globals>>,
    window: RefCell<Option<Rc<dyn MainWindow>>>,
    state: RefCell<RuntimeState>,
}

#[derive(Default)]
struct RuntimeState {
    graph: DependencyGraph,
    order: Vec<String>,
    registry: HashMap<String, Rc<dyn Plugin>>,
    availability: AvailabilityTable,
    signals: HashMap<String, Vec<PluginSignal>>,
}

impl PluginManager {
    pub const NAME: &'static str = "plugins";

    /// Creates a plugin manager for the configured roots and host versions.
    pub fn new(config: &AppConfig, catalog: PluginCatalog, globals: Rc<RefCell<Globals>>) -> Self {
        Self {
            inner: Rc::new(PluginManagerInner {
                paths: config.paths.clone(),
                layout: config.plugins.clone(),
                host: HostVersions::new(&config.app.version, &config.framework.version),
                catalog,
                globals,
                window: RefCell::new(None),
                state: RefCell::new(RuntimeState::default()),
            }),
        }
    }

    /// Sets the main window handed to plugin entry points.
    pub fn set_main_window(&self, window: Rc<dyn MainWindow>) {
        *self.inner.window.borrow_mut() = Some(window);
    }

    /// Loads built-in plugins, then user plugins.
    pub fn init(&self) -> PieResult<()> {
        let window = self
            .inner
            .window
            .borrow()
            .clone()
            .ok_or(PieError::MissingHost)?;

        self.initialize_from_packages(&self.inner.paths.builtin_plugins_root(), &window)?;
        self.initialize_from_packages(&self.inner.paths.user_plugins_root(), &window)?;

        info!(plugins = self.inner.state.borrow().order.len(), "Plugin manager initialized");
        Ok(())
    }

    /// Discovers and instantiates every package under `root`.
    ///
    /// All packages are loaded and checked before any is instantiated, so a
    /// bad package leaves nothing from this root registered.
    fn initialize_from_packages(&self, root: &Path, window: &Rc<dyn MainWindow>) -> PieResult<()> {
        if !root.is_dir() {
            warn!(path = %root.display(), "Plugins folder doesn't exist");
            return Ok(());
        }

        // Globals are staged so an aborted root leaves the shared store untouched.
        let mut staged = Globals::new();
        let resolved: Vec<ResolvedPackage> = package::package_dirs(root, &self.inner.layout)?
            .iter()
            .map(|dir| {
                package::load_package(
                    dir,
                    &self.inner.layout,
                    &self.inner.host,
                    &self.inner.catalog,
                    &mut staged,
                )
            })
            .collect::<PieResult<_>>()?;
        self.inner.globals.borrow_mut().merge(staged);

        for ResolvedPackage { package, entry } in resolved {
            match entry(Rc::clone(window), &package)? {
                Some(plugin) => self.initialize_plugin(plugin)?,
                None => info!(package = %package.name, "Package declined to load"),
            }
        }
        Ok(())
    }

    /// Registers a plugin, wires its signals and prepares it.
    pub fn initialize_plugin(&self, plugin: Rc<dyn Plugin>) -> PieResult<()> {
        let name = plugin.name().to_string();
        info!(plugin = %name, "Preparing plugin");

        {
            let descriptor = plugin.descriptor();
            let mut state = self.inner.state.borrow_mut();
            state
                .graph
                .register(&name, &descriptor.requires, &descriptor.optional);

            if state.registry.insert(name.clone(), Rc::clone(&plugin)).is_none() {
                state.order.push(name.clone());
            }

            let custom: Vec<PluginSignal> = plugin
                .signals()
                .into_iter()
                .filter(|signal| matches!(signal, PluginSignal::Custom(_)))
                .collect();
            state.signals.insert(name.clone(), custom);
        }

        let sink = Rc::downgrade(&self.inner);
        plugin.bind(SignalEmitter::new(name, sink));

        if let Some(api) = plugin.api() {
            api.prepare()?;
        }
        plugin.prepare()
    }

    /// Shuts down the named plugins, or all registered ones with `full_house`.
    ///
    /// Instances stay registered.
    pub fn shutdown(&self, names: &[&str], full_house: bool) -> PieResult<()> {
        for name in self.select(names, full_house) {
            info!(plugin = %name, "Shutting down plugin");
            if self.get(&name).is_some() {
                self.shutdown_plugin(&name)?;
            } else {
                debug!(plugin = %name, "Plugin is not registered, nothing to shut down");
            }
        }
        Ok(())
    }

    /// Shuts plugins down, then re-initializes every registered plugin.
    pub fn reload(&self, names: &[&str], full_house: bool) -> PieResult<()> {
        self.shutdown(names, full_house)?;

        let registered: Vec<Rc<dyn Plugin>> = {
            let state = self.inner.state.borrow();
            state
                .order
                .iter()
                .filter_map(|name| state.registry.get(name).cloned())
                .collect()
        };
        for plugin in registered {
            self.initialize_plugin(plugin)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Plugin>> {
        self.inner.state.borrow().registry.get(name).cloned()
    }

    pub fn is_plugin_available(&self, name: &str) -> bool {
        self.inner.state.borrow().availability.is_available(name)
    }

    /// Registered plugin names in registration order.
    pub fn plugin_names(&self) -> Vec<String> {
        self.inner.state.borrow().order.clone()
    }

    pub fn dependents_of(&self, name: &str) -> Edges {
        self.inner.state.borrow().graph.dependents_of(name)
    }

    pub fn dependencies_of(&self, name: &str) -> Edges {
        self.inner.state.borrow().graph.dependencies_of(name)
    }

    /// Store fed by package globals files.
    pub fn globals(&self) -> Rc<RefCell<Globals>> {
        Rc::clone(&self.inner.globals)
    }

    fn select(&self, names: &[&str], full_house: bool) -> Vec<String> {
        if full_house {
            self.plugin_names()
        } else {
            names.iter().map(|n| (*n).to_string()).collect()
        }
    }

    fn shutdown_plugin(&self, name: &str) -> PieResult<()> {
        self.inner.notify_shutting_down(name)?;

        let Some(plugin) = self.get(name) else {
            return Ok(());
        };
        if let Some(api) = plugin.api() {
            api.shutdown();
        }

        for dependency in self.dependencies_of(name).iter() {
            if self.inner.is_live(dependency) {
                info!(plugin = %name, dependency = %dependency, "Shutting down plugin from dependency");
                plugin.on_plugin_event(dependency, Some(PLUGIN_SHUTDOWN_EVENT))?;
            }
        }

        self.inner.state.borrow_mut().availability.mark_unavailable(name);
        Ok(())
    }
}

impl PluginManagerInner {
    fn registered(&self, name: &str) -> Option<Rc<dyn Plugin>> {
        self.state.borrow().registry.get(name).cloned()
    }

    /// Registered and available.
    fn is_live(&self, name: &str) -> bool {
        let state = self.state.borrow();
        state.registry.contains_key(name) && state.availability.is_available(name)
    }

    fn dependents(&self, name: &str) -> Edges {
        self.state.borrow().graph.dependents_of(name)
    }

    /// Tells `name` about each of its dependencies that is already available.
    fn notify_dependencies(&self, name: &str) -> PieResult<()> {
        let plugin = self
            .registered(name)
            .ok_or_else(|| PieError::PluginNotFound(name.to_string()))?;
        let dependencies = self.state.borrow().graph.dependencies_of(name);

        for dependency in dependencies.iter() {
            if self.is_live(dependency) {
                debug!(plugin = %name, dependency = %dependency, "Dependency has already loaded");
                plugin.on_plugin_event(dependency, None)?;
            }
        }
        Ok(())
    }

    /// Marks `name` available and tells its registered dependents.
    fn notify_availability(&self, name: &str) -> PieResult<()> {
        self.state.borrow_mut().availability.mark_available(name);
        info!(plugin = %name, "Plugin is available");

        for dependent in self.dependents(name).iter() {
            if let Some(plugin) = self.registered(dependent) {
                plugin.on_plugin_event(name, None)?;
            }
        }
        Ok(())
    }

    /// Delivers every declared event name of `name` to its registered dependents.
    fn notify_event(&self, name: &str, events: &[String]) -> PieResult<()> {
        for dependent in self.dependents(name).iter() {
            if let Some(plugin) = self.registered(dependent) {
                for event in events {
                    plugin.on_plugin_event(name, Some(event))?;
                }
            }
        }
        Ok(())
    }

    /// Tells available dependents that `name` is going away.
    fn notify_shutting_down(&self, name: &str) -> PieResult<()> {
        for dependent in self.dependents(name).iter() {
            if !self.is_live(dependent) {
                continue;
            }
            if let Some(plugin) = self.registered(dependent) {
                debug!(plugin = %dependent, source = %name, "Notifying dependent of shutdown");
                plugin.on_plugin_event(name, Some(PLUGIN_SHUTDOWN_EVENT))?;
            }
        }
        Ok(())
    }
}

impl SignalSink for PluginManagerInner {
    fn dispatch(&self, source: &str, signal: &PluginSignal) -> PieResult<()> {
        debug!(plugin = %source, signal = %signal, "Signal fired");
        match signal {
            PluginSignal::Ready => {
                self.notify_dependencies(source)?;
                self.notify_availability(source)
            }
            PluginSignal::Custom(_) => {
                let events: Vec<String> = {
                    let state = self.state.borrow();
                    let declared = state
                        .signals
                        .get(source)
                        .ok_or_else(|| PieError::PluginNotFound(source.to_string()))?;
                    if !declared.contains(signal) {
                        return Err(PieError::plugin(
                            source,
                            format!("signal `{}` was not declared", signal),
                        ));
                    }

                    let mut events: Vec<String> = Vec::new();
                    for declared_signal in declared {
                        let event = declared_signal.event_name();
                        if !events.iter().any(|e| e == event) {
                            events.push(event.to_string());
                        }
                    }
                    events
                };
                self.notify_event(source, &events)
            }
        }
    }
}

impl Manager for PluginManager {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn mount(&mut self, _args: &[PathConfig]) -> PieResult<()> {
        self.init()
    }

    fn unmount(&mut self) -> PieResult<()> {
        self.shutdown(&[], true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("PluginManager")
            .field("plugins", &state.order)
            .field("available", &state.availability.available().count())
            .field("catalog", &self.inner.catalog)
            .finish_non_exhaustive()
    }
}
