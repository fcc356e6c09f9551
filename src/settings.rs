//! Settings for the `chainlog` command-line tool

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::ConfigPatch;

/// Tool settings, read from `~/.chainlog/config.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory reports are written to (default: current directory)
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Filter for the tool's own diagnostics when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Logger configuration merged over the logger defaults
    #[serde(default)]
    pub logger: ConfigPatch,
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_filter() -> String {
    "chainlog=info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            log_filter: default_log_filter(),
            logger: ConfigPatch::default(),
        }
    }
}

impl Settings {
    /// Load settings from the default location, or defaults if there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read settings file")?;
            toml::from_str(&content).context("Failed to parse settings file")
        } else {
            Ok(Self::default())
        }
    }
}

/// Get the base directory (~/.chainlog)
/// Falls back to ./.chainlog if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".chainlog")
    })
}

/// Try to get the base directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chainlog"))
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Directory for the tool's diagnostic logs
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Directory backing the persisted logger configuration
pub fn store_dir() -> PathBuf {
    config_dir().join("store")
}

/// Ensure all required directories exist
pub fn ensure_directories() -> Result<()> {
    std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
    std::fs::create_dir_all(logs_dir()).context("Failed to create logs directory")?;
    std::fs::create_dir_all(store_dir()).context("Failed to create store directory")?;
    Ok(())
}
