//! # PieKit Managers
//!
//! Named application services ("managers") and the registry that mounts them
//! in configuration order after checking their dependencies.

mod catalog;
mod configs;
mod manager;
mod registry;

pub use catalog::*;
pub use configs::*;
pub use manager::*;
pub use registry::*;
