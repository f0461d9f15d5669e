//! Startup and shutdown output.

use crate::PieApp;
use piekit_core::{ErrorReport, PieError};
use std::backtrace::Backtrace;
use tracing::{error, info};

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____  _      ___
   / __ \(_)__  /   |  ____  ____
  / /_/ / / _ \/ /| | / __ \/ __ \
 / ____/ /  __/ ___ |/ /_/ / /_/ /
/_/   /_/\___/_/  |_/ .___/ .___/
                   /_/   /_/
    "#);
}

/// Prints what was loaded.
pub fn print_startup_info(app: &PieApp) {
    let config = app.config();
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Application: {} {}", config.app.name, config.app.version);
    info!("Framework:   {}", config.framework.version);
    info!("Environment: {}", config.app.environment);
    info!("Started at:  {}", app.started_at().format("%Y-%m-%d %H:%M:%S"));
    info!("Plugins:     {}", config.paths.builtin_plugins_root().display());
    info!("User root:   {}", config.paths.user_root.display());
    info!("Managers:    {}", app.manager_names().join(", "));
    info!("Loaded:      {}", app.plugins().plugin_names().join(", "));
    info!("Globals:     {}", app.plugins().globals().borrow().len());
    info!("{}", separator);
}

/// Logs a fatal error with its causes and, when captured, a backtrace.
pub fn report_fatal(err: &PieError) {
    let report = ErrorReport::from_error(err).with_backtrace(&Backtrace::capture());
    for line in report.lines() {
        error!("{}", line);
    }
}
