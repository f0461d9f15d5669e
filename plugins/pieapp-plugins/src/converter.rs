//! Converter plugin: owns the table of files queued for conversion.

use crate::EmitterSlot;
use piekit_core::PieResult;
use piekit_plugin_api::{
    MainWindow, Plugin, PluginApi, PluginDescriptor, PluginPackage, PluginSignal, SignalEmitter,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

pub const NAME: &str = "converter";
pub const ENTRY: &str = "converter";

/// Fired every time the file table changes.
pub const TABLE_READY: &str = "sig_table_ready";

/// File table shared between the plugin and its lifecycle capability.
type Table = Rc<RefCell<Vec<String>>>;

struct ConverterApi {
    table: Table,
}

impl PluginApi for ConverterApi {
    fn prepare(&self) -> PieResult<()> {
        info!(plugin = NAME, "Converter table prepared");
        Ok(())
    }

    fn shutdown(&self) {
        self.table.borrow_mut().clear();
    }
}

pub struct Converter {
    descriptor: PluginDescriptor,
    window: Rc<dyn MainWindow>,
    table: Table,
    api: Rc<ConverterApi>,
    slot: EmitterSlot,
}

impl Converter {
    pub fn new(window: Rc<dyn MainWindow>, package: &PluginPackage) -> Self {
        let table: Table = Rc::default();
        Self {
            descriptor: PluginDescriptor::new(NAME).versions(package.versions.clone()),
            window,
            api: Rc::new(ConverterApi {
                table: Rc::clone(&table),
            }),
            table,
            slot: EmitterSlot::default(),
        }
    }

    /// Queues files and tells dependents the table changed.
    pub fn add_files<I, S>(&self, files: I) -> PieResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let count = {
            let mut table = self.table.borrow_mut();
            table.extend(files.into_iter().map(Into::into));
            table.len()
        };
        self.window
            .show_status_message(&format!("{} file(s) queued", count));
        self.slot.emit(NAME, &PluginSignal::custom(TABLE_READY))
    }

    pub fn files(&self) -> Vec<String> {
        self.table.borrow().clone()
    }
}

impl Plugin for Converter {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn signals(&self) -> Vec<PluginSignal> {
        vec![PluginSignal::custom(TABLE_READY)]
    }

    fn bind(&self, emitter: SignalEmitter) {
        self.slot.bind(emitter);
    }

    fn api(&self) -> Option<Rc<dyn PluginApi>> {
        let api: Rc<dyn PluginApi> = self.api.clone();
        Some(api)
    }

    fn prepare(&self) -> PieResult<()> {
        self.slot.ready(NAME)
    }
}

/// Package entry point.
pub fn main(
    window: Rc<dyn MainWindow>,
    package: &PluginPackage,
) -> PieResult<Option<Rc<dyn Plugin>>> {
    let plugin: Rc<dyn Plugin> = Rc::new(Converter::new(window, package));
    Ok(Some(plugin))
}
