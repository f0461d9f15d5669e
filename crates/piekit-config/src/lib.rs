//! # PieKit Config
//!
//! Configuration management for PieKit.
//! Supports layered configuration from files and environment variables,
//! the shared `Globals` store fed by plugin packages, and first-run creation
//! of the user root.

mod app_config;
mod globals;
mod loader;
mod paths;
pub mod validation;

pub use app_config::*;
pub use globals::*;
pub use loader::*;
pub use paths::*;
