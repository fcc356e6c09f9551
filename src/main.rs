use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use chainlog::host::{DirectorySink, FileStore, StdConsole};
use chainlog::settings::{self, Settings};
use chainlog::{diagnostics, Host, Logger};

fn main() -> Result<()> {
    // Ensure config directory exists (creates logs and store dirs too)
    settings::ensure_directories()?;

    let settings = Settings::load()?;

    // Initialize diagnostics BEFORE any tracing calls
    let log_path = diagnostics::init_diagnostics(&settings::logs_dir(), &settings.log_filter)?;
    tracing::info!("Diagnostics written to {}", log_path.display());

    let host = Host::new(
        Arc::new(StdConsole),
        Arc::new(DirectorySink::new(settings.report_dir.clone())),
    )
    .with_store(Arc::new(FileStore::new(settings::store_dir())));
    let logger = Logger::new(settings.logger.clone(), host).context("Failed to create logger")?;

    // Optional first argument names the report file
    let report_name = std::env::args().nth(1);

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str::<Value>(&line).unwrap_or(Value::String(line));
        logger.info(value).emit()?;
    }

    logger.get_report(report_name.as_deref())?;
    tracing::info!("Logged {} records", logger.logs().len());
    Ok(())
}
