//! # ragassist-telemetry
//!
//! Logging for ragassist binaries.
//!
//! Library crates only emit `tracing` events. The binary calls
//! [`init_logging`] once at startup, which installs an `EnvFilter` (default
//! `info`), a console layer, and a daily rolling file
//! `{log_dir}/ragassist.YYYY-MM-DD.log` behind a non-blocking writer.
//!
//! ```rust,no_run
//! use ragassist_telemetry::{LogConfig, init_logging};
//!
//! let _guard = init_logging(&LogConfig::new("./logs")).expect("logging");
//! tracing::info!("ready");
//! ```
//!
//! [`CaptureLayer`] records events in memory for tests.

mod capture;
mod logging;

pub use capture::{CaptureLayer, CapturedEvent, CapturedEvents};
pub use logging::{LogConfig, TelemetryError, build_filter, init_logging};
pub use tracing_appender::non_blocking::WorkerGuard;
