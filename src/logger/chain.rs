//! The chainable handle returned by every logging entry point
//!
//! A [`LogChain`] owns one [`PendingRecord`]. Each modifier consumes the chain
//! and hands it back updated, so calls compose left to right. Nothing reaches
//! the console until [`LogChain::emit`] is called. The record is committed to
//! the report buffer exactly once: by [`LogChain::commit`], or when the chain
//! is dropped at the end of the statement that built it.

use serde::Serialize;

use super::record::{to_value, PendingRecord};
use super::Logger;
use crate::config::ConfigPatch;
use crate::error::Result;
use crate::level::{self, Level};
use crate::method::ConsoleMethod;

pub struct LogChain<'a> {
    logger: &'a Logger,
    pending: PendingRecord,
    settled: bool,
}

impl<'a> LogChain<'a> {
    pub(crate) fn new(logger: &'a Logger, pending: PendingRecord) -> Self {
        Self {
            logger,
            pending,
            settled: false,
        }
    }

    /// The record as the chain currently describes it
    pub fn pending(&self) -> &PendingRecord {
        &self.pending
    }

    fn update(mut self, f: impl FnOnce(&mut PendingRecord)) -> Self {
        f(&mut self.pending);
        self
    }

    pub fn level(self, level: impl Into<Level>) -> Self {
        let level = level.into();
        self.update(|p| p.record.level = level)
    }

    pub fn method(self, method: ConsoleMethod) -> Self {
        self.update(|p| p.method = method)
    }

    pub fn template(self, template: impl Into<String>) -> Self {
        let template = template.into();
        self.update(|p| p.record.template = Some(template))
    }

    /// Override configuration for this record only
    ///
    /// Honors console/report enable flags and thresholds, `defaultMethod`,
    /// `reporterName` and `template`; other fields are ignored.
    pub fn config(self, patch: ConfigPatch) -> Self {
        self.update(|p| {
            let ignored = p.apply_config(&patch);
            if !ignored.is_empty() {
                tracing::debug!("Per-call config ignores fields: {}", ignored.join(", "));
            }
        })
    }

    pub fn change_reporter_name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|p| p.record.reporter_name = Some(name))
    }

    pub fn force_console(self) -> Self {
        self.update(|p| p.forced_console = Some(true))
    }

    pub fn disable_console(self) -> Self {
        self.update(|p| p.forced_console = Some(false))
    }

    pub fn force_report(self) -> Self {
        self.update(|p| p.forced_report = Some(true))
    }

    pub fn disable_report(self) -> Self {
        self.update(|p| p.forced_report = Some(false))
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

    /// Error method at the most severe level
    pub fn critical(self) -> Self {
        self.error().level(level::CRITICAL)
    }

    /// Append another value to the record
    pub fn and<T: Serialize>(self, what: T) -> Self {
        let value = to_value(what);
        self.update(|p| p.record.what.push(value))
    }

    /// Write the record to the console if it is eligible, then commit it
    ///
    /// Returns whether anything was written.
    pub fn emit(self) -> Result<bool> {
        self.logger.dispatch(&self.pending)
    }

    /// Commit without touching the console
    ///
    /// Returns whether the record entered the report buffer.
    pub fn commit(mut self) -> bool {
        self.settled = true;
        self.logger.commit_record(std::mem::take(&mut self.pending))
    }
}

impl Drop for LogChain<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.settled = true;
            self.logger.commit_record(std::mem::take(&mut self.pending));
        }
    }
}

impl std::fmt::Debug for LogChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogChain")
            .field("pending", &self.pending)
            .field("settled", &self.settled)
            .finish()
    }
}
