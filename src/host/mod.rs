//! Host capabilities the logger talks to
//!
//! The logger never writes to a terminal, a file or a store directly. It goes
//! through three capabilities bundled in a [`Host`]: a [`Console`] for
//! surfaced records, an optional [`KeyValueStore`] for persisted configuration
//! and a [`ReportSink`] that receives exported reports.

mod console;
mod download;
mod store;

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::method::ConsoleMethod;

pub use console::{format_table, MemoryConsole, StdConsole};
pub use download::{DirectorySink, MemorySink, Report};
pub use store::{FileStore, MemoryStore};

/// What a console receives for one surfaced record
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Rendered lines, one per logged value
    Lines(Vec<String>),
    /// Raw values for tabular display, announced by the reporter name
    Table {
        reporter_name: String,
        rows: Vec<Value>,
    },
}

/// One dispatch to the console
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub method: ConsoleMethod,
    pub payload: Payload,
}

/// Named console output methods
pub trait Console: Send + Sync {
    /// Write `emission` through its method
    ///
    /// Consoles that lack the method must return
    /// [`LoggerError::UnsupportedMethod`](crate::LoggerError::UnsupportedMethod).
    fn emit(&self, emission: &Emission) -> Result<()>;
}

/// Whole-value string storage keyed by name
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Receiver of exported reports
pub trait ReportSink: Send + Sync {
    fn deliver(&self, filename: &str, contents: &str) -> Result<()>;
}

/// The capabilities a logger is built against
#[derive(Clone)]
pub struct Host {
    pub console: Arc<dyn Console>,
    pub store: Option<Arc<dyn KeyValueStore>>,
    pub sink: Arc<dyn ReportSink>,
}

impl Host {
    pub fn new(console: Arc<dyn Console>, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            console,
            store: None,
            sink,
        }
    }

    /// Attach a key-value store for persisted configuration
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}
