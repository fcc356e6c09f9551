//! Diagnostics for the `chainlog` tool itself
//!
//! The library emits `tracing` events; the binary routes them to a
//! timestamped file so they never mix with the logger's console output.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Generate a timestamped diagnostics file path
pub fn create_log_file_path(logs_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    logs_dir.join(format!("chainlog-{}.log", timestamp))
}

/// Install the global subscriber writing to a new file under `logs_dir`
///
/// `default_filter` applies when RUST_LOG is not set. Returns the file path.
pub fn init_diagnostics(logs_dir: &Path, default_filter: &str) -> Result<PathBuf> {
    fs::create_dir_all(logs_dir).context("Failed to create logs directory")?;

    let log_path = create_log_file_path(logs_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open diagnostics file")?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install diagnostics subscriber")?;

    Ok(log_path)
}
