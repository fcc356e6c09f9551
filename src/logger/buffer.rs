//! In-memory report buffer
//!
//! Holds committed records in the order they were committed until erased.

use std::sync::{PoisonError, RwLock};

use super::record::LogRecord;

/// Append-only store of committed records
#[derive(Debug, Default)]
pub struct ReportBuffer {
    records: RwLock<Vec<LogRecord>>,
}

impl ReportBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed record
    pub fn push(&self, record: LogRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Copies of all records, oldest first
    pub fn all_records(&self) -> Vec<LogRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every record
    pub fn clear(&self) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
