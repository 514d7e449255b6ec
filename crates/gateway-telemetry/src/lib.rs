//! # Gateway Telemetry
//!
//! Observability bootstrap for the interaction gateway.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with JSON or human-readable output
//! - **Traces**: optional OpenTelemetry span export over OTLP
//! - **Metrics**: Prometheus counters and histograms, served at `/metrics`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gateway_telemetry::{init_telemetry, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).await?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | unset | OTLP collector; unset disables span export |
//! | `OTEL_SERVICE_NAME` | `interaction-gateway` | Service name in traces |
//! | `GATEWAY_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `GATEWAY_JSON_LOGS` | `true` in containers | JSON formatted logs |

mod config;
mod logging;
mod metrics;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, INTERACTIONS_RECEIVED,
    JOBS_SUBMITTED, JOB_SUBMISSION_FAILURES, REGISTRY, REPLIES_SENT, REPLY_DURATION,
    SIGNATURE_FAILURES,
};
pub use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize OpenTelemetry tracer: {0}")]
    TracerInit(String),

    #[error("Failed to install log subscriber: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging, metrics and (when configured) trace export.
///
/// Returns a guard that must be held for the lifetime of the application.
/// Dropping it flushes pending spans.
pub async fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;

    let (otel_layer, tracing_guard) = match tracing_setup::init_tracing(&config).await? {
        Some((layer, guard)) => (Some(layer), Some(guard)),
        None => (None, None),
    };

    logging::install_subscriber(&config, otel_layer)?;

    tracing::info!(
        service = %config.service_name,
        otlp = config.exports_traces(),
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active. Drop to flush and shutdown.
pub struct TelemetryGuard {
    _tracing: Option<TracingGuard>,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Record a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
