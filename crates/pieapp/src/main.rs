//! # PieApp
//!
//! Main entry point: load configuration, start logging, mount managers and
//! plugins, then wait for a termination signal.

use pieapp::{startup, PieApp};
use piekit_config::{AppConfig, ConfigLoader};
use piekit_core::{init_telemetry, PieResult, TelemetryConfig};
use tokio::signal;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            // Nothing configured yet, log with the defaults.
            let _ = init_telemetry(&TelemetryConfig::default());
            startup::report_fatal(&e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&config.telemetry) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    startup::print_banner();
    info!("Starting {}...", config.app.name);
    info!("Version: {}", config.app.version);

    if let Err(e) = run(config).await {
        startup::report_fatal(&e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> PieResult<()> {
    let mut app = PieApp::new(config);
    app.start()?;
    startup::print_startup_info(&app);

    shutdown_signal().await?;

    app.stop()?;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() -> PieResult<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C, shutting down...");
            }
            _ = terminate.recv() => {
                info!("Received terminate signal, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, shutting down...");
    }

    Ok(())
}
