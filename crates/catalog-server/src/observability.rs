// Tracing initialization driven by the `[logging]` config section.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LogFormat, LoggingConfig};

/// Installs the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG`, when set and parseable, overrides `logging.level`.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = env_filter(&config.level);
    let text = matches!(config.format, LogFormat::Text).then(fmt::layer);
    let json = matches!(config.format, LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init();
}

fn env_filter(level: &str) -> EnvFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}
