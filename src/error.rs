//! Error type shared by the logger and its host capabilities

use std::io;

use thiserror::Error;

/// Errors surfaced by [`Logger`](crate::Logger) operations
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The persisted configuration exists but is not valid JSON for a config
    #[error("failed to load persisted configuration '{key}': {source}")]
    ConfigurationLoad {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A console method name that the console cannot dispatch to
    #[error("unsupported console method '{method}'")]
    UnsupportedMethod { method: String },

    /// The key-value store failed to read, write or remove an entry
    #[error("key-value store failed for '{key}': {source}")]
    Store {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The report sink could not deliver the report
    #[error("failed to deliver report '{filename}': {source}")]
    ReportDelivery {
        filename: String,
        #[source]
        source: io::Error,
    },

    /// A configuration patch given as JSON does not describe a configuration
    #[error("invalid configuration patch: {0}")]
    InvalidPatch(#[source] serde_json::Error),

    /// The configuration could not be encoded for persistence
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl LoggerError {
    pub(crate) fn unsupported(method: impl Into<String>) -> Self {
        LoggerError::UnsupportedMethod {
            method: method.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoggerError>;
