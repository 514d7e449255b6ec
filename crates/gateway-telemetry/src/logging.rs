//! Console logging setup.
//!
//! One global subscriber: an `EnvFilter`, an optional OpenTelemetry layer
//! and either a JSON or a human-readable formatter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::{TelemetryConfig, TelemetryError};

/// OpenTelemetry layer sitting directly on the registry.
pub(crate) type OtelLayer =
    tracing_opentelemetry::OpenTelemetryLayer<Registry, opentelemetry_sdk::trace::Tracer>;

/// Install console logging only, without span export.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    install_subscriber(config, None)
}

pub(crate) fn install_subscriber(
    config: &TelemetryConfig,
    otel_layer: Option<OtelLayer>,
) -> Result<(), TelemetryError> {
    // `log_level` already falls back to RUST_LOG
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    // JSON output for containers/production
    let json_layer = (config.console_output && config.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    // Pretty output for development
    let fmt_layer = (config.console_output && !config.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
    });

    tracing_subscriber::registry()
        .with(otel_layer)
        .with(env_filter)
        .with(json_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(
        json_logs = config.json_logs,
        console_output = config.console_output,
        "Logging initialized"
    );

    Ok(())
}

