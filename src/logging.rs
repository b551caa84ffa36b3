//! Tracing subscriber setup.
//!
//! The terminal belongs to the UI, so log records go to a plain-text file.

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// # Arguments
/// * `config` - Application configuration (log level and file)
///
/// # Returns
/// * `Result<PathBuf>` - Path of the log file being appended to
///
/// # Details
/// `RUST_LOG` takes precedence over `config.log_level`. Calling this twice
/// is an error because the global subscriber can only be set once.
pub fn init_logging(config: &Config) -> Result<PathBuf> {
    let path = config.log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    Ok(path)
}
