//! # PieKit Core
//!
//! Core error definitions and telemetry bootstrap for PieKit.
//! Every other crate in the workspace reports failures through [`PieError`]
//! and logs through `tracing`.

pub mod error;
pub mod result;
pub mod telemetry;

pub use error::*;
pub use result::*;
pub use telemetry::{init_telemetry, LogFormat, TelemetryConfig};
