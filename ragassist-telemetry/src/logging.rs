//! Subscriber installation.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Third-party targets that are chatty at `info`.
const QUIET_TARGETS: &[&str] = &["lance", "lancedb", "lance_index", "ort", "hf_hub"];

/// Errors raised while installing the logging subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log directory could not be created.
    #[error("cannot create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A subscriber was already installed for this process.
    #[error("logging is already initialised: {0}")]
    AlreadyInitialised(String),
}

/// Where and how to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory for the rolling log files.
    pub log_dir: PathBuf,
    /// File name prefix; files are named `{prefix}.YYYY-MM-DD.log`.
    pub file_prefix: String,
    /// Filter used when `RUST_LOG` is unset.
    pub default_directive: String,
    /// Also log to stderr.
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            file_prefix: "ragassist".to_string(),
            default_directive: "info".to_string(),
            console: true,
        }
    }
}

impl LogConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self { log_dir: log_dir.into(), ..Self::default() }
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }
}

/// Build the filter: `RUST_LOG` if set, else `default_directive` with noisy
/// dependencies raised to `warn`.
pub fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives = vec![default_directive.to_string()];
        directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
        EnvFilter::new(directives.join(","))
    })
}

/// Install the global subscriber: console layer plus a daily rolling file.
///
/// The returned guard flushes the file writer when dropped; keep it alive for
/// the whole program.
///
/// # Errors
///
/// Fails if the log directory cannot be created or a global subscriber is
/// already set.
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard, TelemetryError> {
    ensure_dir(&config.log_dir)?;

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(&config.log_dir)
        .map_err(|e| TelemetryError::LogDir {
            path: config.log_dir.clone(),
            source: std::io::Error::other(e.to_string()),
        })?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // stdout belongs to the conversation
    let console_layer = config.console.then(|| {
        tracing_subscriber::fmt::layer().with_target(false).compact().with_writer(std::io::stderr)
    });
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(build_filter(&config.default_directive))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialised(e.to_string()))?;

    Ok(guard)
}

fn ensure_dir(path: &Path) -> Result<(), TelemetryError> {
    std::fs::create_dir_all(path)
        .map_err(|source| TelemetryError::LogDir { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_quiets_dependencies() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = build_filter("info").to_string();
        assert!(filter.contains("lancedb=warn"));
        assert!(filter.contains("ort=warn"));
    }

    #[test]
    fn log_dir_that_is_a_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(ensure_dir(&file), Err(TelemetryError::LogDir { .. })));
    }
}
