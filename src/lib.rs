//! Chainlog - chainable logger with console dispatch and exportable reports
//!
//! This library provides the logger, its configuration and the host
//! capabilities it writes through.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod level;
pub mod logger;
pub mod method;
pub mod settings;
pub mod template;

pub use config::{ConfigPatch, LoggerConfig};
pub use error::LoggerError;
pub use host::Host;
pub use level::Level;
pub use logger::{Fork, LogChain, LogRecord, Logger};
pub use method::ConsoleMethod;
