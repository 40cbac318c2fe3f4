//! Terminal front-end for the Idle Machine.
//!
//! This is the main entry point that wires the machine core to a terminal:
//! player commands come in on stdin, snapshots go out on stdout, and the
//! countdown bar is drawn on stderr. It loads configuration, builds a
//! session, and runs the machine loop until the player quits, input ends
//! on a stopped machine, or a configured bound is reached.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `machine-config.yaml` (or `MACHINE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the session
//! 4. Spawn the stdin console
//! 5. Spawn the countdown renderer
//! 6. Run the machine loop
//! 7. Log the result

mod console;
mod error;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use machine_core::config::{LoggingConfig, MachineConfig};
use machine_core::countdown;
use machine_core::runner;
use machine_core::session::Session;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::render::ConsoleRenderer;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "MACHINE_CONFIG";

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "machine-config.yaml";

/// Depth of the console-to-runner command queue.
const COMMAND_QUEUE_DEPTH: usize = 32;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the machine loop fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;
    let config_found = config_path.exists();

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("machine-engine starting");
    if !config_found {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        path = %config_path.display(),
        tick_interval_ms = config.clock.tick_interval_ms,
        modules = config.modules.len(),
        heat = config.heat.is_some(),
        "Configuration loaded"
    );

    // 3. Create the session.
    let json_snapshots = config.presentation.json_snapshots;
    let countdown_frame_ms = config.presentation.countdown_frame_ms;
    let mut session = Session::new(config)?;

    // 4. Spawn the console.
    let (command_tx, mut command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let console_handle = tokio::spawn(console::run_console(command_tx));
    info!("Console ready");

    // 5. Spawn the countdown renderer.
    let (countdown_tx, countdown_rx) = countdown::channel();
    let countdown_handle = if countdown_frame_ms > 0 && !json_snapshots {
        Some(tokio::spawn(render::run_countdown(
            countdown_rx,
            Duration::from_millis(countdown_frame_ms),
        )))
    } else {
        None
    };

    // 6. Run the machine loop.
    let mut callback = ConsoleRenderer::new(json_snapshots);
    let result =
        runner::run_machine(&mut session, &mut command_rx, &countdown_tx, &mut callback).await?;

    // 7. Log the result.
    runner::log_run_end(&result);

    drop(countdown_tx);
    if let Some(handle) = countdown_handle {
        let _ = handle.await;
    }
    // The console may be parked on a stdin read; it is not awaited.
    console_handle.abort();

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "machine-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `MACHINE_CONFIG` or `machine-config.yaml`.
///
/// A missing file yields the built-in defaults (with the environment
/// interval override still applied).
fn load_config() -> Result<(MachineConfig, PathBuf), EngineError> {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = MachineConfig::from_file(&path)?;
        Ok((config, path))
    } else {
        let mut config = MachineConfig::default();
        config.clock.apply_env_overrides();
        config.validate()?;
        Ok((config, path))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`; `logging.json` switches to JSON
/// lines.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}
