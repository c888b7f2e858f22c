//! Tracing subscriber setup
//!
//! The library itself only emits `tracing` events and spans. Hosts call
//! [`init_tracing`] once at startup to install a subscriber; `RUST_LOG`, when
//! set, takes precedence over the configured level.

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable output
    #[default]
    Compact,
    /// One JSON object per event, including the current span
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingOptions {
    /// Filter directive used when `RUST_LOG` is not set, e.g. `info` or
    /// `tailspin_infra=debug`
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self { level: default_level(), format: LogFormat::default() }
    }
}

impl LoggingOptions {
    /// Options with an explicit level and format
    #[must_use]
    pub fn new(level: impl Into<String>, format: LogFormat) -> Self {
        Self { level: level.into(), format }
    }
}

/// Install the global tracing subscriber
///
/// Returns `true` if this call installed the subscriber and `false` if one
/// was already set, in which case nothing changes.
pub fn init_tracing(options: &LoggingOptions) -> bool {
    let filter = build_filter(&options.level);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match options.format {
        LogFormat::Compact => registry.with(fmt::layer().compact().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .try_init(),
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %options.level, format = ?options.format, "Tracing ready");
            true
        }
        Err(_) => false,
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(default_level()))
}
