//! Logging initialization with environment-based formatters
//!
//! - Production: Structured JSON logs for log aggregation
//! - Anything else: Colorful, human-readable logs

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn for_environment(env: &str) -> Self {
        match env.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// `RUST_LOG` if set and valid, otherwise [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber for the format `APP_ENV` selects.
///
/// Fails if a global subscriber is already set.
pub fn try_init_logging() -> Result<LogFormat, tracing_subscriber::util::TryInitError> {
    let format = LogFormat::for_environment(&get_environment());
    let registry = tracing_subscriber::registry().with(env_filter());

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init()?,
    }

    Ok(format)
}

/// Initialize logging once at process start; a second call is a no-op.
pub fn init_logging() {
    if let Err(e) = try_init_logging() {
        eprintln!("Logging already initialized: {}", e);
    }
}
