//! Common test infrastructure for plugin lifecycle tests.
//!
//! Entry points are plain `fn`s, so test plugins read their shape from a
//! `test.toml` in the package directory and record into a thread-local log.

#![allow(dead_code)]

use piekit_config::{AppConfig, Globals};
use piekit_core::{PieError, PieResult};
use piekit_plugin_api::{
    MainWindow, Plugin, PluginApi, PluginDescriptor, PluginPackage, PluginSignal, SignalEmitter,
};
use piekit_plugin_runtime::{PluginCatalog, PluginManager};
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static PLUGINS: RefCell<HashMap<String, Rc<TestPlugin>>> = RefCell::new(HashMap::new());
}

pub fn record(entry: String) {
    EVENTS.with(|events| events.borrow_mut().push(entry));
}

/// Recorded events, in order.
pub fn events() -> Vec<String> {
    EVENTS.with(|events| events.borrow().clone())
}

pub fn clear_events() {
    EVENTS.with(|events| events.borrow_mut().clear());
}

/// Plugin instantiated by `test_entry` under `name`.
pub fn spawned(name: &str) -> Rc<TestPlugin> {
    PLUGINS.with(|plugins| {
        plugins
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("plugin {} was not spawned", name))
    })
}

/// Shape of a test plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TestSpec {
    pub name: String,
    pub requires: Vec<String>,
    pub optional: Vec<String>,
    pub signals: Vec<String>,
    /// Emit `Ready` from `prepare`.
    pub ready_on_prepare: bool,
    /// Emit `Ready` once this plugin hears that `ready_after` is ready.
    pub ready_after: Option<String>,
    pub with_api: bool,
    /// Entry returns `Ok(None)`.
    pub decline: bool,
}

impl Default for TestSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            requires: Vec::new(),
            optional: Vec::new(),
            signals: Vec::new(),
            ready_on_prepare: true,
            ready_after: None,
            with_api: false,
            decline: false,
        }
    }
}

impl TestSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn requires(mut self, names: &[&str]) -> Self {
        self.requires = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    pub fn optional(mut self, names: &[&str]) -> Self {
        self.optional = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    pub fn signals(mut self, names: &[&str]) -> Self {
        self.signals = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    pub fn manual_ready(mut self) -> Self {
        self.ready_on_prepare = false;
        self
    }

    pub fn ready_after(mut self, name: &str) -> Self {
        self.ready_on_prepare = false;
        self.ready_after = Some(name.to_string());
        self
    }

    pub fn with_api(mut self) -> Self {
        self.with_api = true;
        self
    }

    pub fn build(self) -> Rc<TestPlugin> {
        TestPlugin::new(self)
    }

    fn to_toml(&self) -> String {
        let list = |items: &[String]| {
            items
                .iter()
                .map(|i| format!("\"{}\"", i))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut text = format!(
            "name = \"{}\"\nrequires = [{}]\noptional = [{}]\nsignals = [{}]\nready_on_prepare = {}\nwith_api = {}\ndecline = {}\n",
            self.name,
            list(&self.requires),
            list(&self.optional),
            list(&self.signals),
            self.ready_on_prepare,
            self.with_api,
            self.decline,
        );
        if let Some(after) = &self.ready_after {
            text.push_str(&format!("ready_after = \"{}\"\n", after));
        }
        text
    }
}

pub struct TestApi {
    name: String,
}

impl PluginApi for TestApi {
    fn prepare(&self) -> PieResult<()> {
        record(format!("{}:api_prepare", self.name));
        Ok(())
    }

    fn shutdown(&self) {
        record(format!("{}:api_shutdown", self.name));
    }
}

pub struct TestPlugin {
    descriptor: PluginDescriptor,
    spec: TestSpec,
    emitter: RefCell<Option<SignalEmitter>>,
    api: Option<Rc<dyn PluginApi>>,
    fired: Cell<bool>,
    observer: RefCell<Option<PluginManager>>,
}

impl TestPlugin {
    pub fn new(spec: TestSpec) -> Rc<Self> {
        let descriptor = PluginDescriptor::new(spec.name.clone())
            .requires(spec.requires.clone())
            .optional(spec.optional.clone());
        let api: Option<Rc<dyn PluginApi>> = if spec.with_api {
            Some(Rc::new(TestApi {
                name: spec.name.clone(),
            }))
        } else {
            None
        };
        Rc::new(Self {
            descriptor,
            spec,
            emitter: RefCell::new(None),
            api,
            fired: Cell::new(false),
            observer: RefCell::new(None),
        })
    }

    fn emitter(&self) -> SignalEmitter {
        self.emitter
            .borrow()
            .clone()
            .expect("plugin was not bound")
    }

    pub fn ready(&self) -> PieResult<()> {
        self.emitter().ready()
    }

    /// Records the source's availability on every readiness notification.
    pub fn observe(&self, manager: &PluginManager) {
        *self.observer.borrow_mut() = Some(manager.clone());
    }

    pub fn emit(&self, signal: &str) -> PieResult<()> {
        self.emitter().emit(&PluginSignal::custom(signal))
    }
}

impl Plugin for TestPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn signals(&self) -> Vec<PluginSignal> {
        self.spec.signals.iter().map(PluginSignal::custom).collect()
    }

    fn bind(&self, emitter: SignalEmitter) {
        *self.emitter.borrow_mut() = Some(emitter);
    }

    fn on_plugin_event(&self, source: &str, event: Option<&str>) -> PieResult<()> {
        record(format!(
            "{}<-{}:{}",
            self.descriptor.name,
            source,
            event.unwrap_or("ready")
        ));
        if let (None, Some(manager)) = (event, self.observer.borrow().as_ref()) {
            record(format!(
                "{}<-{}:available={}",
                self.descriptor.name,
                source,
                manager.is_plugin_available(source)
            ));
        }
        if event.is_none() && self.spec.ready_after.as_deref() == Some(source) && !self.fired.replace(true) {
            self.ready()?;
        }
        Ok(())
    }

    fn api(&self) -> Option<Rc<dyn PluginApi>> {
        self.api.clone()
    }

    fn prepare(&self) -> PieResult<()> {
        record(format!("{}:prepare", self.descriptor.name));
        if self.spec.ready_on_prepare {
            self.ready()?;
        }
        Ok(())
    }
}

/// Entry point building a `TestPlugin` from the package's `test.toml`.
pub fn test_entry(
    window: Rc<dyn MainWindow>,
    package: &PluginPackage,
) -> PieResult<Option<Rc<dyn Plugin>>> {
    let text = fs::read_to_string(package.path.join("test.toml"))?;
    let spec: TestSpec =
        toml::from_str(&text).map_err(|e| PieError::internal(e.to_string()))?;
    if spec.decline {
        return Ok(None);
    }

    window.show_status_message(&format!("loaded {}", spec.name));
    let plugin = TestPlugin::new(spec);
    PLUGINS.with(|plugins| {
        plugins
            .borrow_mut()
            .insert(plugin.descriptor.name.clone(), Rc::clone(&plugin))
    });
    let plugin: Rc<dyn Plugin> = plugin;
    Ok(Some(plugin))
}

/// Entry point that always fails.
pub fn failing_entry(
    _window: Rc<dyn MainWindow>,
    package: &PluginPackage,
) -> PieResult<Option<Rc<dyn Plugin>>> {
    Err(PieError::plugin(&package.name, "main() failed"))
}

pub fn test_catalog() -> PluginCatalog {
    PluginCatalog::new()
        .with("test", test_entry)
        .with("failing", failing_entry)
}

#[derive(Default)]
pub struct TestWindow {
    pub messages: RefCell<Vec<String>>,
}

impl MainWindow for TestWindow {
    fn title(&self) -> String {
        "Test".to_string()
    }

    fn show_status_message(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn add_menu(&self, _name: &str, _text: &str) {}
}

/// Temporary app and user roots with a host at application 2.3.1,
/// framework 1.0.0.
pub struct TestRoots {
    dir: TempDir,
}

impl TestRoots {
    pub fn new() -> Self {
        clear_events();
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn app_plugins(&self) -> PathBuf {
        self.dir.path().join("app").join("plugins")
    }

    pub fn user_plugins(&self) -> PathBuf {
        self.dir.path().join("user").join("plugins")
    }

    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.app.version = "2.3.1".to_string();
        config.framework.version = "1.0.0".to_string();
        config.paths.app_root = self.dir.path().join("app");
        config.paths.user_root = self.dir.path().join("user");
        config
    }

    /// Plugin manager with a `TestWindow` attached.
    pub fn manager(&self) -> (PluginManager, Rc<TestWindow>) {
        let manager = PluginManager::new(
            &self.config(),
            test_catalog(),
            Rc::new(RefCell::new(Globals::new())),
        );
        let window = Rc::new(TestWindow::default());
        manager.set_main_window(window.clone());
        (manager, window)
    }
}

/// Builder for one package directory.
pub struct PackageWriter {
    dir: PathBuf,
}

impl PackageWriter {
    /// Creates `<root>/<name>` with a compatible manifest and a `test` entry.
    pub fn new(root: &Path, name: &str, spec: &TestSpec) -> Self {
        let dir = root.join(name);
        fs::create_dir_all(&dir).expect("Failed to create package dir");
        let writer = Self { dir };
        writer
            .manifest("0.1.0", "2.0.0", "1.0.0")
            .plugin_module("test")
            .file("test.toml", &spec.to_toml())
    }

    pub fn manifest(self, version: &str, application: &str, framework: &str) -> Self {
        self.file(
            "package.toml",
            &format!(
                "version = \"{}\"\npieapp_application_version = \"{}\"\nframework_version = \"{}\"\n",
                version, application, framework
            ),
        )
    }

    pub fn plugin_module(self, entry: &str) -> Self {
        self.file("plugin.toml", &format!("entry = \"{}\"\n", entry))
    }

    pub fn without_plugin_module(self) -> Self {
        fs::remove_file(self.dir.join("plugin.toml")).expect("Failed to remove plugin module");
        self
    }

    pub fn file(self, name: &str, contents: &str) -> Self {
        fs::write(self.dir.join(name), contents).expect("Failed to write package file");
        self
    }
}
