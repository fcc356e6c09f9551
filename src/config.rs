//! Logger configuration
//!
//! [`LoggerConfig`] is the live configuration of a logger and also the layout
//! written to the key-value store when persistence is on. [`ConfigPatch`] is a
//! partial configuration merged over it field by field.

use serde::{Deserialize, Deserializer, Serialize};

use crate::level::{default_level_names, Level, LevelNames};
use crate::method::ConsoleMethod;

/// Default placeholder pattern used to render every value
pub const DEFAULT_TEMPLATE: &str =
    "[{{DD}}/{{MM}}/{{YYYY}}]:[{{hh}}:{{mm}}:{{ss}}:{{ms}}][{{REPORTERNAME}}][{{LEVEL}}]: {{BODY}}";

/// Default key under which the configuration is persisted
pub const DEFAULT_PERSIST_OBJECT_NAME: &str = "loggerPersist";

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Whether records may reach the console at all
    #[serde(default = "default_true")]
    pub console_enabled: bool,

    /// Records with a level above this are kept off the console (default: 2)
    #[serde(default = "default_console_level")]
    pub console_level: Level,

    /// Whether records may be appended to the report buffer
    #[serde(default = "default_true")]
    pub report_enabled: bool,

    /// Records with a level above this are kept out of the report (default: unbounded)
    #[serde(default)]
    pub report_level: Level,

    /// Console method used when a record does not pick one
    #[serde(default)]
    pub default_method: ConsoleMethod,

    /// Filename handed to the report sink when none is given
    #[serde(default = "default_report_filename")]
    pub default_report_filename: String,

    /// Labels substituted for `{{LEVEL}}`
    #[serde(default = "default_level_names")]
    pub level_names: LevelNames,

    /// Label substituted for `{{REPORTERNAME}}`
    #[serde(default = "default_reporter_name")]
    pub reporter_name: String,

    /// Placeholder pattern used to render each value
    #[serde(default = "default_template")]
    pub template: String,

    /// Write the configuration to the key-value store on every change
    #[serde(default = "default_true")]
    pub persist_configuration: bool,

    /// Key used in the key-value store
    #[serde(default = "default_persist_object_name")]
    pub persist_object_name: String,
}

fn default_true() -> bool {
    true
}

fn default_console_level() -> Level {
    Level::At(2)
}

fn default_report_filename() -> String {
    "report.txt".to_string()
}

fn default_reporter_name() -> String {
    "logger".to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_persist_object_name() -> String {
    DEFAULT_PERSIST_OBJECT_NAME.to_string()
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            console_level: default_console_level(),
            report_enabled: true,
            report_level: Level::Unbounded,
            default_method: ConsoleMethod::Log,
            default_report_filename: default_report_filename(),
            level_names: default_level_names(),
            reporter_name: default_reporter_name(),
            template: default_template(),
            persist_configuration: true,
            persist_object_name: default_persist_object_name(),
        }
    }
}

impl LoggerConfig {
    /// Defaults with `patch` merged over them
    pub fn from_patch(patch: &ConfigPatch) -> Self {
        let mut config = Self::default();
        config.apply(patch);
        config
    }

    /// Shallow merge: every field set in `patch` replaces the current value
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(v) = patch.console_enabled {
            self.console_enabled = v;
        }
        if let Some(v) = patch.console_level {
            self.console_level = v;
        }
        if let Some(v) = patch.report_enabled {
            self.report_enabled = v;
        }
        if let Some(v) = patch.report_level {
            self.report_level = v;
        }
        if let Some(v) = patch.default_method {
            self.default_method = v;
        }
        if let Some(v) = &patch.default_report_filename {
            self.default_report_filename = v.clone();
        }
        if let Some(v) = &patch.level_names {
            self.level_names = v.clone();
        }
        if let Some(v) = &patch.reporter_name {
            self.reporter_name = v.clone();
        }
        if let Some(v) = &patch.template {
            self.template = v.clone();
        }
        if let Some(v) = patch.persist_configuration {
            self.persist_configuration = v;
        }
        if let Some(v) = &patch.persist_object_name {
            self.persist_object_name = v.clone();
        }
    }
}

/// A partial [`LoggerConfig`]
///
/// A threshold given as `null` in JSON means "unbounded", not "unset".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub console_enabled: Option<bool>,
    #[serde(deserialize_with = "explicit_level")]
    pub console_level: Option<Level>,
    pub report_enabled: Option<bool>,
    #[serde(deserialize_with = "explicit_level")]
    pub report_level: Option<Level>,
    pub default_method: Option<ConsoleMethod>,
    pub default_report_filename: Option<String>,
    pub level_names: Option<LevelNames>,
    pub reporter_name: Option<String>,
    pub template: Option<String>,
    pub persist_configuration: Option<bool>,
    pub persist_object_name: Option<String>,
}

fn explicit_level<'de, D>(deserializer: D) -> Result<Option<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(|n| Some(Level::from(n)))
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn console_enabled(mut self, enabled: bool) -> Self {
        self.console_enabled = Some(enabled);
        self
    }

    pub fn console_level(mut self, level: impl Into<Level>) -> Self {
        self.console_level = Some(level.into());
        self
    }

    pub fn report_enabled(mut self, enabled: bool) -> Self {
        self.report_enabled = Some(enabled);
        self
    }

    pub fn report_level(mut self, level: impl Into<Level>) -> Self {
        self.report_level = Some(level.into());
        self
    }

    pub fn default_method(mut self, method: ConsoleMethod) -> Self {
        self.default_method = Some(method);
        self
    }

    pub fn default_report_filename(mut self, filename: impl Into<String>) -> Self {
        self.default_report_filename = Some(filename.into());
        self
    }

    pub fn level_names(mut self, names: LevelNames) -> Self {
        self.level_names = Some(names);
        self
    }

    pub fn reporter_name(mut self, name: impl Into<String>) -> Self {
        self.reporter_name = Some(name.into());
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn persist_configuration(mut self, persist: bool) -> Self {
        self.persist_configuration = Some(persist);
        self
    }

    pub fn persist_object_name(mut self, name: impl Into<String>) -> Self {
        self.persist_object_name = Some(name.into());
        self
    }

    /// Later patch wins for every field it sets
    pub fn merge(&mut self, other: &ConfigPatch) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field.clone();
                })*
            };
        }
        take!(
            console_enabled,
            console_level,
            report_enabled,
            report_level,
            default_method,
            default_report_filename,
            level_names,
            reporter_name,
            template,
            persist_configuration,
            persist_object_name
        );
    }

    /// Fields set in this patch that a single record cannot override
    pub fn fields_ignored_per_call(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.default_report_filename.is_some() {
            ignored.push("defaultReportFilename");
        }
        if self.level_names.is_some() {
            ignored.push("levelNames");
        }
        if self.persist_configuration.is_some() {
            ignored.push("persistConfiguration");
        }
        if self.persist_object_name.is_some() {
            ignored.push("persistObjectName");
        }
        ignored
    }
}

/// Per-record overrides of the console and report gates
///
/// Only the enable flags and thresholds live here; method, reporter name and
/// template overrides are written straight onto the pending record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOverrides {
    pub console_enabled: Option<bool>,
    pub console_level: Option<Level>,
    pub report_enabled: Option<bool>,
    pub report_level: Option<Level>,
}

impl CallOverrides {
    /// Take the gate fields from `patch`, keeping earlier values it leaves unset
    pub fn absorb(&mut self, patch: &ConfigPatch) {
        self.console_enabled = patch.console_enabled.or(self.console_enabled);
        self.console_level = patch.console_level.or(self.console_level);
        self.report_enabled = patch.report_enabled.or(self.report_enabled);
        self.report_level = patch.report_level.or(self.report_level);
    }

    /// Console gate resolved against the live configuration
    pub fn console_gate(&self, config: &LoggerConfig) -> (bool, Level) {
        (
            self.console_enabled.unwrap_or(config.console_enabled),
            self.console_level.unwrap_or(config.console_level),
        )
    }

    /// Report gate resolved against the live configuration
    pub fn report_gate(&self, config: &LoggerConfig) -> (bool, Level) {
        (
            self.report_enabled.unwrap_or(config.report_enabled),
            self.report_level.unwrap_or(config.report_level),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert!(config.console_enabled);
        assert_eq!(config.console_level, Level::At(2));
        assert!(config.report_enabled);
        assert_eq!(config.report_level, Level::Unbounded);
        assert_eq!(config.default_method, ConsoleMethod::Log);
        assert_eq!(config.reporter_name, "logger");
        assert_eq!(config.default_report_filename, "report.txt");
        assert!(config.persist_configuration);
        assert_eq!(config.persist_object_name, "loggerPersist");
        assert_eq!(config.level_names.get(&4).map(String::as_str), Some("DEBUG"));
    }

    #[test]
    fn test_apply_patch_is_shallow_merge() {
        let mut config = LoggerConfig::default();
        config.apply(&ConfigPatch::new().console_level(5).reporter_name("api"));

        assert_eq!(config.console_level, Level::At(5));
        assert_eq!(config.reporter_name, "api");
        assert_eq!(config.template, DEFAULT_TEMPLATE);
        assert!(config.report_enabled);
    }

    #[test]
    fn test_config_serialization_is_camel_case() {
        let config = LoggerConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["consoleLevel"], 2);
        assert!(json["reportLevel"].is_null());
        assert_eq!(json["defaultMethod"], "log");
        assert_eq!(json["levelNames"]["0"], "CRITICAL");

        let parsed: LoggerConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_stored_config_uses_defaults() {
        let parsed: LoggerConfig =
            serde_json::from_str(r#"{"consoleLevel": null, "reporterName": "ui"}"#).unwrap();
        assert_eq!(parsed.console_level, Level::Unbounded);
        assert_eq!(parsed.reporter_name, "ui");
        assert_eq!(parsed.template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_patch_null_threshold_means_unbounded() {
        let patch: ConfigPatch =
            serde_json::from_str(r#"{"consoleLevel": null, "reportEnabled": false}"#).unwrap();
        assert_eq!(patch.console_level, Some(Level::Unbounded));
        assert_eq!(patch.report_level, None);
        assert_eq!(patch.report_enabled, Some(false));
    }

    #[test]
    fn test_patch_merge_later_wins() {
        let mut patch = ConfigPatch::new().console_level(1).template("a");
        patch.merge(&ConfigPatch::new().template("b"));
        assert_eq!(patch.console_level, Some(Level::At(1)));
        assert_eq!(patch.template.as_deref(), Some("b"));
    }

    #[test]
    fn test_fields_ignored_per_call() {
        let patch = ConfigPatch::new()
            .console_level(1)
            .persist_configuration(true)
            .default_report_filename("x.txt");
        assert_eq!(
            patch.fields_ignored_per_call(),
            vec!["defaultReportFilename", "persistConfiguration"]
        );
    }

    #[test]
    fn test_call_overrides_resolve_against_config() {
        let config = LoggerConfig::default();
        let mut overrides = CallOverrides::default();
        assert_eq!(overrides.console_gate(&config), (true, Level::At(2)));

        overrides.absorb(&ConfigPatch::new().console_level(7).report_enabled(false));
        overrides.absorb(&ConfigPatch::new().console_enabled(false));
        assert_eq!(overrides.console_gate(&config), (false, Level::At(7)));
        assert_eq!(overrides.report_gate(&config), (false, Level::Unbounded));
    }
}
