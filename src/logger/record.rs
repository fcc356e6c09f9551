//! Log records and the pending state attached to them before commit

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{CallOverrides, ConfigPatch, LoggerConfig};
use crate::level::Level;
use crate::method::ConsoleMethod;

/// One logged event as kept in the report buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub level: Level,
    pub what: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl LogRecord {
    pub fn new(what: Vec<Value>) -> Self {
        Self {
            what,
            ..Self::default()
        }
    }
}

/// A record whose modifier chain has not finished yet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingRecord {
    pub record: LogRecord,
    /// Console method used if the record surfaces
    pub method: ConsoleMethod,
    /// `Some(true)` forces the console path, `Some(false)` suppresses it
    pub forced_console: Option<bool>,
    /// `Some(true)` forces the report path, `Some(false)` suppresses it
    pub forced_report: Option<bool>,
    pub overrides: CallOverrides,
}

impl PendingRecord {
    pub fn new(what: Vec<Value>, method: ConsoleMethod) -> Self {
        Self {
            record: LogRecord::new(what),
            method,
            ..Self::default()
        }
    }

    /// Apply a per-call configuration patch
    ///
    /// Only the gate fields, `defaultMethod`, `reporterName` and `template` are
    /// honored. Returns the names of the fields that were ignored.
    pub fn apply_config(&mut self, patch: &ConfigPatch) -> Vec<&'static str> {
        self.overrides.absorb(patch);
        if let Some(method) = patch.default_method {
            self.method = method;
        }
        if let Some(name) = &patch.reporter_name {
            self.record.reporter_name = Some(name.clone());
        }
        if let Some(template) = &patch.template {
            self.record.template = Some(template.clone());
        }
        patch.fields_ignored_per_call()
    }

    pub fn console_eligible(&self, config: &LoggerConfig) -> bool {
        eligible(
            self.forced_console,
            self.overrides.console_gate(config),
            self.record.level,
        )
    }

    pub fn report_eligible(&self, config: &LoggerConfig) -> bool {
        eligible(
            self.forced_report,
            self.overrides.report_gate(config),
            self.record.level,
        )
    }
}

fn eligible(forced: Option<bool>, (enabled, threshold): (bool, Level), level: Level) -> bool {
    forced.unwrap_or_else(|| enabled && threshold.admits(level))
}

/// Convert a logged value to JSON
///
/// Values serde cannot represent (maps with non-string keys, failing
/// `Serialize` impls) are kept as a string describing the failure.
pub fn to_value<T: Serialize>(what: T) -> Value {
    serde_json::to_value(what).unwrap_or_else(|e| {
        tracing::warn!("Logged value could not be converted to JSON: {}", e);
        Value::String(format!("<unserializable: {}>", e))
    })
}
