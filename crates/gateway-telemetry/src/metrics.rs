//! Prometheus metrics for the interaction gateway.
//!
//! All metrics follow the naming convention: `ig_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Requests received, by classified kind
    pub static ref INTERACTIONS_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("ig_interactions_received_total", "Interactions received by kind"),
        &["kind"]  // kind: ping/command/unknown/unparseable/unauthenticated
    ).expect("metric creation failed");

    /// Signature verification failures (for alerting)
    pub static ref SIGNATURE_FAILURES: CounterVec = CounterVec::new(
        Opts::new("ig_signature_failures_total", "Signature verification failures by reason"),
        &["reason"]
    ).expect("metric creation failed");

    /// Replies sent, by status code
    pub static ref REPLIES_SENT: CounterVec = CounterVec::new(
        Opts::new("ig_replies_sent_total", "Replies sent by status code"),
        &["status"]
    ).expect("metric creation failed");

    /// Jobs accepted by the worker
    pub static ref JOBS_SUBMITTED: Counter = Counter::new(
        "ig_jobs_submitted_total",
        "Jobs accepted by the worker"
    ).expect("metric creation failed");

    /// Job submissions that failed
    pub static ref JOB_SUBMISSION_FAILURES: Counter = Counter::new(
        "ig_job_submission_failures_total",
        "Job submissions that failed"
    ).expect("metric creation failed");

    /// Time from request arrival to reply
    pub static ref REPLY_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "ig_reply_duration_seconds",
            "Time spent producing the synchronous reply"
        ).buckets(exponential_buckets(0.0001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(INTERACTIONS_RECEIVED.clone()),
        Box::new(SIGNATURE_FAILURES.clone()),
        Box::new(REPLIES_SENT.clone()),
        Box::new(JOBS_SUBMITTED.clone()),
        Box::new(JOB_SUBMISSION_FAILURES.clone()),
        Box::new(REPLY_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}
