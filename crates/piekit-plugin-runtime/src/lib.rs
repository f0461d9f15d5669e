//! # PieKit Plugin Runtime
//!
//! Discovers plugin packages on disk, checks their versions, records their
//! dependency declarations and drives the readiness and shutdown
//! notifications between plugins.

mod availability;
mod catalog;
mod graph;
mod manager;
pub mod package;

pub use availability::AvailabilityTable;
pub use catalog::PluginCatalog;
pub use graph::{DependencyGraph, DependencyKind, Edges};
pub use manager::PluginManager;
pub use package::HostVersions;
