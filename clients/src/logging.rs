//! Log setup for the `owl-to-km` binary.
//!
//! Every run writes to its own file under the configured directory. With
//! `debug` set the level drops to `debug` and the same events also go to
//! stderr. `RUST_LOG` overrides the configured level.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Keeps the background log writer alive; drop it to flush.
#[derive(Debug)]
pub struct LogGuard {
    _guard: WorkerGuard,
    path: PathBuf,
}

impl LogGuard {
    /// The log file of this run.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `owl-to-km_<YYYYmmdd_HHMMSS>_<pid>.log`
#[must_use]
pub fn log_file_name(now: DateTime<Local>, pid: u32) -> String {
    format!("owl-to-km_{}_{pid}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if the log directory or file cannot be created, or if a global
/// subscriber is already installed.
pub fn init(settings: &LoggingSettings) -> Result<LogGuard> {
    std::fs::create_dir_all(&settings.dir).with_context(|| {
        format!("Failed to create log directory: {}", settings.dir.display())
    })?;
    let file_name = log_file_name(Local::now(), std::process::id());
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.as_str())
        .build(&settings.dir)
        .with_context(|| format!("Failed to open log file {file_name}"))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let level = if settings.debug {
        "debug"
    } else {
        settings.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    let console_layer = settings
        .debug
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard {
        _guard: guard,
        path: settings.dir.join(file_name),
    })
}
