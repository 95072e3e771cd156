//! File logging.
//!
//! The TUI owns the terminal, so log lines go to rolling files under
//! `<data_dir>/logs` and never to stdout/stderr.

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use std::path::Path;

const LOG_FILE_BASENAME: &str = "studyflow";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start the file logger. Keep the returned handle alive for the whole
/// process; dropping it flushes and stops logging.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle> {
    let level = normalize_level(level);
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let handle = Logger::try_with_str(&level)
        .with_context(|| format!("Invalid log level `{}`", level))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("Failed to start logger")?;

    info!(
        "event=app_start status=ok platform={} version={} level={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        level
    );
    Ok(handle)
}

/// Lower-case the level and map `warning` to `warn`. Module specs such as
/// `studyflow=debug` pass through unchanged.
fn normalize_level(level: &str) -> String {
    let trimmed = level.trim();
    if trimmed.is_empty() {
        return "info".to_string();
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        lower if lower.contains('=') => trimmed.to_string(),
        lower => lower.to_string(),
    }
}
