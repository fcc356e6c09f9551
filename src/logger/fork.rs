//! Pre-configured record factories
//!
//! A [`Fork`] accumulates defaults instead of describing a single record.
//! Calling it with a value gives a [`ForkCallee`] whose entry points each start
//! a fresh record seeded with those defaults.

use serde::Serialize;
use serde_json::Value;

use super::chain::LogChain;
use super::record::to_value;
use super::Logger;
use crate::config::ConfigPatch;
use crate::level::{self, Level};
use crate::method::ConsoleMethod;

/// Reusable record factory created by [`Logger::fork`]
#[derive(Debug, Clone)]
pub struct Fork<'a> {
    logger: &'a Logger,
    level: Option<Level>,
    method: Option<ConsoleMethod>,
    template: Option<String>,
    forced_console: Option<bool>,
    forced_report: Option<bool>,
    reporter_name: Option<String>,
    config: Option<ConfigPatch>,
}

impl<'a> Fork<'a> {
    pub(crate) fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            level: None,
            method: None,
            template: None,
            forced_console: None,
            forced_report: None,
            reporter_name: None,
            config: None,
        }
    }

    /// Pin the level of every record; entry point presets no longer apply
    pub fn level(mut self, level: impl Into<Level>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Method used by [`ForkCallee::shout`]
    pub fn method(mut self, method: ConsoleMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Per-call configuration applied to every record
    pub fn config(mut self, patch: ConfigPatch) -> Self {
        self.config
            .get_or_insert_with(ConfigPatch::default)
            .merge(&patch);
        self
    }

    /// Name stamped on every record, handy for telling forks apart in one report
    pub fn change_reporter_name(mut self, name: impl Into<String>) -> Self {
        self.reporter_name = Some(name.into());
        self
    }

    pub fn force_console(mut self) -> Self {
        self.forced_console = Some(true);
        self
    }

    pub fn disable_console(mut self) -> Self {
        self.forced_console = Some(false);
        self
    }

    pub fn force_report(mut self) -> Self {
        self.forced_report = Some(true);
        self
    }

    pub fn disable_report(mut self) -> Self {
        self.forced_report = Some(false);
        self
    }

    pub fn log(self) -> Self {
        self.method(ConsoleMethod::Log)
    }

    pub fn info(self) -> Self {
        self.method(ConsoleMethod::Info)
    }

    pub fn warn(self) -> Self {
        self.method(ConsoleMethod::Warn)
    }

    pub fn error(self) -> Self {
        self.method(ConsoleMethod::Error)
    }

    pub fn dir(self) -> Self {
        self.method(ConsoleMethod::Dir)
    }

    pub fn table(self) -> Self {
        self.method(ConsoleMethod::Table)
    }

    pub fn critical(self) -> Self {
        self.error().level(level::CRITICAL)
    }

    /// Bind a value; pick the entry point on the returned callee
    pub fn call<T: Serialize>(&self, what: T) -> ForkCallee<'a> {
        self.call_values(vec![to_value(what)])
    }

    pub fn call_values(&self, what: Vec<Value>) -> ForkCallee<'a> {
        ForkCallee {
            fork: self.clone(),
            what,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Critical,
    Method(ConsoleMethod),
    Shout,
}

impl Entry {
    fn preset_level(self) -> Option<Level> {
        match self {
            Entry::Critical => Some(level::CRITICAL),
            Entry::Method(ConsoleMethod::Error) => Some(level::ERROR),
            Entry::Method(ConsoleMethod::Warn) => Some(level::WARNING),
            Entry::Method(ConsoleMethod::Info)
            | Entry::Method(ConsoleMethod::Log)
            | Entry::Method(ConsoleMethod::Dir) => Some(level::INFO),
            Entry::Method(ConsoleMethod::Table) | Entry::Shout => None,
        }
    }
}

/// Values bound to a fork, waiting for an entry point
#[derive(Debug, Clone)]
pub struct ForkCallee<'a> {
    fork: Fork<'a>,
    what: Vec<Value>,
}

impl<'a> ForkCallee<'a> {
    fn spawn(self, entry: Entry) -> LogChain<'a> {
        let Self { fork, what } = self;
        let mut chain = fork.logger.record(what);

        if let Some(level) = fork.level.or(entry.preset_level()) {
            chain = chain.level(level);
        }

        let method = match entry {
            Entry::Critical => ConsoleMethod::Error,
            Entry::Method(method) => method,
            Entry::Shout => fork.method.unwrap_or(ConsoleMethod::Log),
        };
        chain = chain.method(method);

        if let Some(template) = fork.template {
            chain = chain.template(template);
        }
        match fork.forced_console {
            Some(true) => chain = chain.force_console(),
            Some(false) => chain = chain.disable_console(),
            None => {}
        }
        match fork.forced_report {
            Some(true) => chain = chain.force_report(),
            Some(false) => chain = chain.disable_report(),
            None => {}
        }
        if let Some(name) = fork.reporter_name {
            chain = chain.change_reporter_name(name);
        }
        if let Some(patch) = fork.config {
            chain = chain.config(patch);
        }
        chain
    }

    pub fn critical(self) -> LogChain<'a> {
        self.spawn(Entry::Critical)
    }

    pub fn error(self) -> LogChain<'a> {
        self.spawn(Entry::Method(ConsoleMethod::Error))
    }

    pub fn warn(self) -> LogChain<'a> {
        self.spawn(Entry::Method(ConsoleMethod::Warn))
    }

    pub fn info(self) -> LogChain<'a> {
        self.spawn(Entry::Method(ConsoleMethod::Info))
    }

    pub fn log(self) -> LogChain<'a> {
        self.spawn(Entry::Method(ConsoleMethod::Log))
    }

    pub fn dir(self) -> LogChain<'a> {
        self.spawn(Entry::Method(ConsoleMethod::Dir))
    }

    pub fn table(self) -> LogChain<'a> {
        self.spawn(Entry::Method(ConsoleMethod::Table))
    }

    /// Replay with whatever method the fork was last given
    pub fn shout(self) -> LogChain<'a> {
        self.spawn(Entry::Shout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::test_support::*;
    use serde_json::json;

    fn logger(t: &TestHost) -> Logger {
        Logger::new(ConfigPatch::new().template(PLAIN), t.host.clone()).unwrap()
    }

    #[test]
    fn test_fork_critical_reused() {
        let t = test_host();
        let logger = logger(&t);
        let fork = logger.fork().critical();

        fork.call("first").shout().emit().unwrap();
        fork.call("second").shout().emit().unwrap();

        assert_eq!(
            t.console.lines(ConsoleMethod::Error),
            vec!["[logger][CRITICAL]: \"first\"", "[logger][CRITICAL]: \"second\""]
        );
        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|r| r.level == level::CRITICAL));
    }

    #[test]
    fn test_fork_entry_presets_without_pinned_level() {
        let t = test_host();
        let logger = logger(&t);
        let fork = logger.fork();

        let cases = [
            (fork.call(1).critical(), Level::At(0), ConsoleMethod::Error),
            (fork.call(1).error(), Level::At(1), ConsoleMethod::Error),
            (fork.call(1).warn(), Level::At(2), ConsoleMethod::Warn),
            (fork.call(1).info(), Level::At(3), ConsoleMethod::Info),
            (fork.call(1).log(), Level::At(3), ConsoleMethod::Log),
            (fork.call(1).dir(), Level::At(3), ConsoleMethod::Dir),
            (fork.call(1).table(), Level::Unbounded, ConsoleMethod::Table),
            (fork.call(1).shout(), Level::Unbounded, ConsoleMethod::Log),
        ];
        for (chain, level, method) in cases {
            assert_eq!(chain.pending().record.level, level);
            assert_eq!(chain.pending().method, method);
        }
    }

    #[test]
    fn test_fork_pinned_level_beats_preset() {
        let t = test_host();
        let logger = logger(&t);
        let fork = logger.fork().level(9);

        let chain = fork.call("x").error();
        assert_eq!(chain.pending().record.level, Level::At(9));
        assert_eq!(chain.pending().method, ConsoleMethod::Error);
        assert!(!chain.emit().unwrap());
    }

    #[test]
    fn test_fork_carries_defaults() {
        let t = test_host();
        let logger = logger(&t);
        let fork = logger
            .fork()
            .change_reporter_name("worker")
            .template("{{REPORTERNAME}}/{{LEVEL}} {{BODY}}")
            .force_console()
            .disable_report();

        fork.call(json!({"job": 7})).info().emit().unwrap();

        assert_eq!(
            t.console.lines(ConsoleMethod::Info),
            vec!["worker/INFO {\"job\":7}"]
        );
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_fork_config_applied_per_record() {
        let t = test_host();
        let logger = logger(&t);
        let fork = logger
            .fork()
            .config(ConfigPatch::new().console_level(3))
            .config(ConfigPatch::new().reporter_name("cfg"));

        assert!(fork.call("shown").info().emit().unwrap());
        assert_eq!(t.console.lines(ConsoleMethod::Info), vec!["[cfg][INFO]: \"shown\""]);
        assert_eq!(logger.configuration().console_level, Level::At(2));
    }

    #[test]
    fn test_fork_modifiers_do_not_touch_earlier_clones() {
        let t = test_host();
        let logger = logger(&t);
        let base = logger.fork();
        let loud = base.clone().warn();

        assert_eq!(base.call(0).shout().pending().method, ConsoleMethod::Log);
        assert_eq!(loud.call(0).shout().pending().method, ConsoleMethod::Warn);
    }

    #[test]
    fn test_fork_call_values() {
        let t = test_host();
        let logger = logger(&t);
        logger.fork().call_values(vec![json!("a"), json!("b")]).warn();

        assert_eq!(logger.logs()[0].what, vec![json!("a"), json!("b")]);
    }
}
