//! Logging setup for the feature client binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::FeatureError;

/// Initialize logging with the specified configuration.
///
/// `RUST_LOG`, when set, takes precedence over the configured level. Logs go
/// to stderr so command output on stdout stays machine-readable.
pub fn init_logging(config: &LoggingConfig) -> crate::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| FeatureError::config(format!("Failed to initialize logging: {}", e)))
}
