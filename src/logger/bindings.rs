//! Named entry points an application can expose however it likes
//!
//! [`Logger::bindings`] builds a [`Registry`] mapping caller-chosen names to
//! [`Binding`]s. Each binding proxies to one logger capability and carries a
//! one-line help text for interactive discovery.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::Logger;
use crate::config::ConfigPatch;
use crate::error::{LoggerError, Result};
use crate::host::{Emission, Payload};
use crate::method::ConsoleMethod;

/// Registered bindings keyed by their exposed name
pub type Registry = BTreeMap<String, Binding>;

/// Logger operations that can be exposed as bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Configure,
    GetReport,
    Log,
    ShoutConfiguration,
    EraseConfiguration,
}

/// Which capabilities to expose and under what names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingNames {
    names: Vec<(Capability, String)>,
}

impl BindingNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, capability: Capability, name: impl Into<String>) -> Self {
        self.names.retain(|(c, _)| *c != capability);
        self.names.push((capability, name.into()));
        self
    }

    pub fn configure(self, name: impl Into<String>) -> Self {
        self.bind(Capability::Configure, name)
    }

    pub fn get_report(self, name: impl Into<String>) -> Self {
        self.bind(Capability::GetReport, name)
    }

    pub fn log(self, name: impl Into<String>) -> Self {
        self.bind(Capability::Log, name)
    }

    pub fn shout_configuration(self, name: impl Into<String>) -> Self {
        self.bind(Capability::ShoutConfiguration, name)
    }

    pub fn erase_configuration(self, name: impl Into<String>) -> Self {
        self.bind(Capability::EraseConfiguration, name)
    }
}

/// A logger capability exposed under a name
#[derive(Debug, Clone)]
pub struct Binding {
    name: String,
    capability: Capability,
    logger: Arc<Logger>,
}

impl Binding {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// One-line usage description
    pub fn help(&self) -> String {
        let name = &self.name;
        match self.capability {
            Capability::Configure => format!(
                "{}(config) changes this logger's configuration; config is an object with any of \
                 consoleEnabled, consoleLevel, reportEnabled, reportLevel, defaultMethod, \
                 reporterName, template",
                name
            ),
            Capability::GetReport => format!(
                "{}(filename?) exports every buffered record as a text report",
                name
            ),
            Capability::Log => format!(
                "{}(...values) logs the values through the configured default method",
                name
            ),
            Capability::ShoutConfiguration => format!(
                "{}() prints the current configuration of this logger to the console",
                name
            ),
            Capability::EraseConfiguration => format!(
                "{}() removes the persisted configuration and restores the initial one",
                name
            ),
        }
    }

    /// Print [`Binding::help`] through the console's `log` method
    pub fn print_help(&self) -> Result<()> {
        self.logger.host.console.emit(&Emission {
            method: ConsoleMethod::Log,
            payload: Payload::Lines(vec![self.help()]),
        })
    }

    /// Invoke the capability with JSON arguments
    pub fn call(&self, args: Vec<Value>) -> Result<()> {
        match self.capability {
            Capability::Configure => {
                let patch = match args.into_iter().next() {
                    Some(value) => serde_json::from_value::<ConfigPatch>(value)
                        .map_err(LoggerError::InvalidPatch)?,
                    None => ConfigPatch::default(),
                };
                self.logger.config(patch)
            }
            Capability::GetReport => {
                let filename = args.first().and_then(Value::as_str);
                self.logger.get_report(filename)
            }
            Capability::Log => {
                let method = self.logger.configuration().default_method;
                self.logger.entry(method, args).emit().map(|_| ())
            }
            Capability::ShoutConfiguration => self.logger.shout_configuration(),
            Capability::EraseConfiguration => self.logger.erase_configuration(),
        }
    }
}

impl Logger {
    /// Build bindings for the capabilities named in `names`
    pub fn bindings(self: &Arc<Self>, names: &BindingNames) -> Registry {
        names
            .names
            .iter()
            .map(|(capability, name)| {
                (
                    name.clone(),
                    Binding {
                        name: name.clone(),
                        capability: *capability,
                        logger: Arc::clone(self),
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{KeyValueStore, MemoryStore};
    use crate::level::Level;
    use crate::logger::test_support::*;
    use serde_json::json;

    fn all_names() -> BindingNames {
        BindingNames::new()
            .configure("configureLogger")
            .get_report("getLogReport")
            .log("logIt")
            .shout_configuration("shoutLogger")
            .erase_configuration("eraseLogger")
    }

    #[test]
    fn test_only_requested_bindings_are_built() {
        let t = test_host();
        let logger = Arc::new(Logger::with_defaults(t.host.clone()).unwrap());

        let registry = logger.bindings(&BindingNames::new().get_report("report"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry["report"].capability(), Capability::GetReport);

        let registry = logger.bindings(&all_names());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_rebinding_replaces_name() {
        let names = BindingNames::new().log("a").log("b");
        let t = test_host();
        let logger = Arc::new(Logger::with_defaults(t.host.clone()).unwrap());
        let registry = logger.bindings(&names);
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_help_mentions_name() {
        let t = test_host();
        let logger = Arc::new(Logger::with_defaults(t.host.clone()).unwrap());
        let registry = logger.bindings(&all_names());

        for (name, binding) in &registry {
            assert!(binding.help().starts_with(name.as_str()));
        }

        registry["logIt"].print_help().unwrap();
        assert_eq!(
            t.console.lines(ConsoleMethod::Log),
            vec![registry["logIt"].help()]
        );
    }

    #[test]
    fn test_configure_binding() {
        let t = test_host();
        let logger = Arc::new(Logger::with_defaults(t.host.clone()).unwrap());
        let registry = logger.bindings(&all_names());

        registry["configureLogger"]
            .call(vec![json!({"consoleLevel": null, "reporterName": "web"})])
            .unwrap();

        let config = logger.configuration();
        assert_eq!(config.console_level, Level::Unbounded);
        assert_eq!(config.reporter_name, "web");

        let err = registry["configureLogger"]
            .call(vec![json!({"consoleLevel": "high"})])
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidPatch(_)));
    }

    #[test]
    fn test_log_binding_uses_default_method() {
        let t = test_host();
        let logger = Arc::new(
            Logger::new(
                ConfigPatch::new()
                    .template(PLAIN)
                    .default_method(ConsoleMethod::Warn),
                t.host.clone(),
            )
            .unwrap(),
        );
        let registry = logger.bindings(&all_names());

        registry["logIt"].call(vec![json!("a"), json!(2)]).unwrap();

        assert_eq!(
            t.console.lines(ConsoleMethod::Warn),
            vec!["[logger][WARNING]: \"a\"", "[logger][WARNING]: 2"]
        );
        assert_eq!(logger.logs().len(), 1);
    }

    #[test]
    fn test_get_report_binding() {
        let t = test_host();
        let logger = Arc::new(
            Logger::new(ConfigPatch::new().template(PLAIN), t.host.clone()).unwrap(),
        );
        let registry = logger.bindings(&all_names());
        logger.error("boom");

        registry["getLogReport"].call(vec![json!("out.txt")]).unwrap();
        registry["getLogReport"].call(Vec::new()).unwrap();

        let reports = t.sink.reports();
        assert_eq!(reports[0].filename, "out.txt");
        assert_eq!(reports[0].contents, "[logger][ERROR]: \"boom\"");
        assert_eq!(reports[1].filename, "report.txt");
    }

    #[test]
    fn test_shout_and_erase_configuration_bindings() {
        let store = Arc::new(MemoryStore::new());
        let t = test_host_with_store(store.clone());
        let logger = Arc::new(
            Logger::new(ConfigPatch::new().persist_configuration(true), t.host.clone()).unwrap(),
        );
        let registry = logger.bindings(&all_names());

        registry["configureLogger"]
            .call(vec![json!({"reporterName": "persisted"})])
            .unwrap();
        assert!(store.get("loggerPersist").unwrap().is_some());

        registry["shoutLogger"].call(Vec::new()).unwrap();
        assert!(t.console.lines(ConsoleMethod::Log)[0].contains("\"persisted\""));

        registry["eraseLogger"].call(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(logger.configuration().reporter_name, "logger");
    }
}
