use tracing::Span;
use tracing_subscriber::{fmt, EnvFilter};
use crate::config::{LogConfig, LogFormat};
use crate::error::{Error, Result};

/// Installs the global subscriber. `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::ConfigError(format!("invalid log level {:?}: {}", config.level, e)))?;

    let builder = fmt().with_env_filter(filter).with_target(true);
    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    installed.map_err(|e| Error::ConfigError(format!("tracing already initialized: {}", e)))
}

pub fn trace_tick(sequence: u64) -> Span {
    tracing::info_span!(
        "feed_tick",
        sequence = sequence,
    )
}

pub fn trace_fetch(source_id: &str) -> Span {
    tracing::debug_span!(
        "rate_fetch",
        source_id = %source_id,
    )
}
