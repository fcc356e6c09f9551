//! Report sinks

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::ReportSink;
use crate::error::{LoggerError, Result};

/// Writes each report as a file inside a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where a report named `filename` ends up
    ///
    /// Only the final path component is kept.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        let name = Path::new(filename)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "report.txt".into());
        self.dir.join(name)
    }
}

impl ReportSink for DirectorySink {
    fn deliver(&self, filename: &str, contents: &str) -> Result<()> {
        let to_error = |source| LoggerError::ReportDelivery {
            filename: filename.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(to_error)?;
        let path = self.path_for(filename);
        std::fs::write(&path, contents).map_err(to_error)?;

        tracing::info!("Report written to {}", path.display());
        Ok(())
    }
}

/// A delivered report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub filename: String,
    pub contents: String,
}

/// Keeps delivered reports in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: RwLock<Vec<Report>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.read().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Report> {
        self.reports.read().ok().and_then(|r| r.last().cloned())
    }
}

impl ReportSink for MemorySink {
    fn deliver(&self, filename: &str, contents: &str) -> Result<()> {
        if let Ok(mut reports) = self.reports.write() {
            reports.push(Report {
                filename: filename.to_string(),
                contents: contents.to_string(),
            });
        }
        Ok(())
    }
}
