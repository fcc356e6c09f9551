//! The chainable logger
//!
//! A [`Logger`] decides, for every record, whether it reaches the console and
//! whether it is kept for the exported report. Entry points such as
//! [`Logger::error`] return a [`LogChain`] that can adjust the record before
//! that decision is made.

mod bindings;
mod buffer;
mod chain;
mod fork;
mod record;

use std::sync::{PoisonError, RwLock};

use chrono::Local;
use serde::Serialize;
use serde_json::Value;

use crate::config::{ConfigPatch, LoggerConfig};
use crate::error::{LoggerError, Result};
use crate::host::{Emission, Host, Payload};
use crate::level;
use crate::method::ConsoleMethod;
use crate::template::{render_all, RenderFields};

pub use bindings::{Binding, BindingNames, Capability, Registry};
pub use buffer::ReportBuffer;
pub use chain::LogChain;
pub use fork::{Fork, ForkCallee};
pub use record::{to_value, LogRecord, PendingRecord};

/// Logger with console dispatch, a report buffer and optional persisted config
#[derive(Debug)]
pub struct Logger {
    config: RwLock<LoggerConfig>,
    /// Configuration before any persisted state was applied
    initial: LoggerConfig,
    buffer: ReportBuffer,
    host: Host,
}

impl Logger {
    /// Create a logger with `initial` merged over the defaults
    ///
    /// When persistence is on and the store already holds a configuration under
    /// `persistObjectName`, that stored configuration replaces the merged one
    /// entirely.
    pub fn new(initial: ConfigPatch, host: Host) -> Result<Self> {
        let initial = LoggerConfig::from_patch(&initial);
        let config = match load_persisted(&host, &initial)? {
            Some(stored) => {
                tracing::info!(
                    "Loaded persisted logger configuration from '{}'",
                    initial.persist_object_name
                );
                stored
            }
            None => initial.clone(),
        };

        Ok(Self {
            config: RwLock::new(config),
            initial,
            buffer: ReportBuffer::new(),
            host,
        })
    }

    pub fn with_defaults(host: Host) -> Result<Self> {
        Self::new(ConfigPatch::default(), host)
    }

    /// Snapshot of the live configuration
    pub fn configuration(&self) -> LoggerConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge `patch` into the live configuration
    ///
    /// With persistence on, the whole configuration is written to the store.
    /// Switching persistence off, or moving it to another key, removes the
    /// entry under the previous key.
    pub fn config(&self, patch: ConfigPatch) -> Result<()> {
        let (config, was_persisting, old_key) = {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            let was_persisting = config.persist_configuration;
            let old_key = config.persist_object_name.clone();
            config.apply(&patch);
            (config.clone(), was_persisting, old_key)
        };

        if config.persist_configuration {
            self.persist(&config)?;
            if was_persisting && config.persist_object_name != old_key {
                self.remove_persisted(&old_key)?;
            }
            Ok(())
        } else if was_persisting {
            self.remove_persisted(&old_key)
        } else {
            Ok(())
        }
    }

    /// Remove the persisted configuration and restore the construction-time one
    pub fn erase_configuration(&self) -> Result<()> {
        let key = self.configuration().persist_object_name;
        self.remove_persisted(&key)?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = self.initial.clone();
        Ok(())
    }

    /// Print the live configuration through the console's `log` method
    pub fn shout_configuration(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.configuration())?;
        self.host.console.emit(&Emission {
            method: ConsoleMethod::Log,
            payload: Payload::Lines(vec![json]),
        })
    }

    fn persist(&self, config: &LoggerConfig) -> Result<()> {
        let Some(store) = &self.host.store else {
            tracing::debug!("Configuration persistence is on but the host has no store");
            return Ok(());
        };
        let json = serde_json::to_string(config)?;
        store.set(&config.persist_object_name, &json)?;
        tracing::debug!(
            "Persisted logger configuration under '{}'",
            config.persist_object_name
        );
        Ok(())
    }

    fn remove_persisted(&self, key: &str) -> Result<()> {
        if let Some(store) = &self.host.store {
            store.remove(key)?;
            tracing::info!("Removed persisted logger configuration '{}'", key);
        }
        Ok(())
    }

    /// Drop every buffered record; configuration is untouched
    pub fn erase(&self) {
        self.buffer.clear();
    }

    /// Copies of the buffered records, oldest first
    pub fn logs(&self) -> Vec<LogRecord> {
        self.buffer.all_records()
    }

    /// Start a record: unbounded level, configured default method
    pub fn begin_record(&self, what: Vec<Value>) -> PendingRecord {
        PendingRecord::new(what, self.configuration().default_method)
    }

    /// Decide whether `pending` enters the report buffer, and append it if so
    pub fn commit_record(&self, pending: PendingRecord) -> bool {
        let config = self.configuration();
        let eligible = pending.report_eligible(&config);
        tracing::debug!(
            level = %pending.record.level,
            method = %pending.method,
            eligible,
            "Committing log record"
        );
        if eligible {
            self.buffer.push(pending.record);
        }
        eligible
    }

    /// Generic entry point: a chain over a fresh record
    pub fn record(&self, what: Vec<Value>) -> LogChain<'_> {
        LogChain::new(self, self.begin_record(what))
    }

    /// Chain preset for the entry point named after `method`
    pub fn entry(&self, method: ConsoleMethod, what: Vec<Value>) -> LogChain<'_> {
        let chain = self.record(what);
        match method {
            ConsoleMethod::Error => chain.level(level::ERROR).error(),
            ConsoleMethod::Warn => chain.level(level::WARNING).warn(),
            ConsoleMethod::Info => chain.level(level::INFO).info(),
            ConsoleMethod::Log => chain.level(level::INFO).log(),
            ConsoleMethod::Dir => chain.level(level::INFO).dir(),
            ConsoleMethod::Table => chain.table(),
        }
    }

    pub fn critical<T: Serialize>(&self, what: T) -> LogChain<'_> {
        self.record(vec![to_value(what)]).critical()
    }

    pub fn error<T: Serialize>(&self, what: T) -> LogChain<'_> {
        self.entry(ConsoleMethod::Error, vec![to_value(what)])
    }

    pub fn warn<T: Serialize>(&self, what: T) -> LogChain<'_> {
        self.entry(ConsoleMethod::Warn, vec![to_value(what)])
    }

    pub fn info<T: Serialize>(&self, what: T) -> LogChain<'_> {
        self.entry(ConsoleMethod::Info, vec![to_value(what)])
    }

    pub fn log<T: Serialize>(&self, what: T) -> LogChain<'_> {
        self.entry(ConsoleMethod::Log, vec![to_value(what)])
    }

    pub fn dir<T: Serialize>(&self, what: T) -> LogChain<'_> {
        self.entry(ConsoleMethod::Dir, vec![to_value(what)])
    }

    pub fn table<T: Serialize>(&self, what: T) -> LogChain<'_> {
        self.entry(ConsoleMethod::Table, vec![to_value(what)])
    }

    /// Start a fork with no defaults
    pub fn fork(&self) -> Fork<'_> {
        Fork::new(self)
    }

    /// Send `pending` to the console if it is eligible
    fn dispatch(&self, pending: &PendingRecord) -> Result<bool> {
        let config = self.configuration();
        if !pending.console_eligible(&config) {
            return Ok(false);
        }

        let payload = match pending.method {
            ConsoleMethod::Table => Payload::Table {
                reporter_name: reporter_name(&pending.record, &config).to_string(),
                rows: pending.record.what.clone(),
            },
            _ => Payload::Lines(render_record(&pending.record, &config)),
        };
        self.host.console.emit(&Emission {
            method: pending.method,
            payload,
        })?;
        Ok(true)
    }

    /// The report document: every value of every buffered record on its own line
    pub fn report_text(&self) -> String {
        let config = self.configuration();
        self.buffer
            .all_records()
            .iter()
            .map(|record| render_record(record, &config).join("\n"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Hand the report to the host sink as `name`, or the configured default
    ///
    /// The buffer is left as it is.
    pub fn get_report(&self, name: Option<&str>) -> Result<()> {
        let filename = match name {
            Some(name) => name.to_string(),
            None => self.configuration().default_report_filename,
        };
        self.host.sink.deliver(&filename, &self.report_text())
    }
}

fn reporter_name<'c>(record: &'c LogRecord, config: &'c LoggerConfig) -> &'c str {
    record
        .reporter_name
        .as_deref()
        .unwrap_or(&config.reporter_name)
}

fn render_record(record: &LogRecord, config: &LoggerConfig) -> Vec<String> {
    let template = record.template.as_deref().unwrap_or(&config.template);
    let fields = RenderFields {
        level: record.level,
        level_names: &config.level_names,
        reporter_name: reporter_name(record, config),
        at: Local::now().naive_local(),
    };
    render_all(template, &fields, &record.what)
}

fn load_persisted(host: &Host, config: &LoggerConfig) -> Result<Option<LoggerConfig>> {
    if !config.persist_configuration {
        return Ok(None);
    }
    let Some(store) = &host.store else {
        return Ok(None);
    };
    let key = &config.persist_object_name;
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| LoggerError::ConfigurationLoad {
                key: key.clone(),
                source,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::*;
    use crate::host::{KeyValueStore, MemoryConsole, MemorySink};

    pub struct TestHost {
        pub console: Arc<MemoryConsole>,
        pub sink: Arc<MemorySink>,
        pub host: Host,
    }

    pub fn test_host() -> TestHost {
        let console = Arc::new(MemoryConsole::new());
        let sink = Arc::new(MemorySink::new());
        let host = Host::new(console.clone(), sink.clone());
        TestHost {
            console,
            sink,
            host,
        }
    }

    pub fn test_host_with_store(store: Arc<dyn KeyValueStore>) -> TestHost {
        let mut t = test_host();
        t.host = t.host.with_store(store);
        t
    }

    /// Template reduced to the parts that do not depend on the clock
    pub const PLAIN: &str = "[{{REPORTERNAME}}][{{LEVEL}}]: {{BODY}}";
}
