//! Observer that reports pipeline events to `tracing` and Prometheus.

use crate::domain::dispatch::Decision;
use crate::domain::entities::{HttpResult, JobDescription};
use crate::domain::errors::{AuthenticationError, ParseError};
use crate::domain::interaction::VerifiedInteraction;
use crate::ports::outbound::{ForwardOutcome, InteractionObserver, RequestDiagnostics};
use gateway_telemetry::{
    metric_inc, INTERACTIONS_RECEIVED, JOBS_SUBMITTED, JOB_SUBMISSION_FAILURES, REPLIES_SENT,
    SIGNATURE_FAILURES,
};
use tracing::{debug, info};

/// Metrics plus optional per-request diagnostics.
///
/// With `verbose` set, every request logs whether the key and both headers
/// were present, plus the decided reply. Header values and the key itself
/// are never logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    verbose: bool,
}

impl TracingObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl InteractionObserver for TracingObserver {
    fn request_received(&self, diagnostics: &RequestDiagnostics) {
        if self.verbose {
            info!(
                key_configured = diagnostics.key_configured,
                signature_present = diagnostics.signature_present,
                timestamp_present = diagnostics.timestamp_present,
                body_len = diagnostics.body_len,
                "Interaction request received"
            );
        }
    }

    fn verification_completed(&self, result: Result<(), &AuthenticationError>) {
        match result {
            Ok(()) => {
                if self.verbose {
                    info!("Signature verified");
                }
            }
            Err(e) => {
                metric_inc!(SIGNATURE_FAILURES, &[e.reason()]);
                metric_inc!(INTERACTIONS_RECEIVED, &["unauthenticated"]);
            }
        }
    }

    fn interaction_classified(&self, result: Result<&VerifiedInteraction, &ParseError>) {
        let kind = match result {
            Ok(interaction) => interaction.kind(),
            Err(_) => "unparseable",
        };
        metric_inc!(INTERACTIONS_RECEIVED, &[kind]);

        if self.verbose {
            if let Ok(VerifiedInteraction::Unknown { reason, .. }) = result {
                info!(reason = %reason, "Interaction not handled");
            }
        }
    }

    fn reply_decided(&self, decision: &Decision, result: &HttpResult) {
        let status = result.status_code.to_string();
        metric_inc!(REPLIES_SENT, &[status.as_str()]);

        if self.verbose {
            info!(
                status = result.status_code,
                reply = ?decision.reply,
                job = decision.job.is_some(),
                "Reply decided"
            );
        }
    }

    fn job_forwarded(&self, job: &JobDescription, outcome: &ForwardOutcome) {
        match outcome {
            ForwardOutcome::Submitted => metric_inc!(JOBS_SUBMITTED),
            ForwardOutcome::SubmissionFailed(_) => metric_inc!(JOB_SUBMISSION_FAILURES),
        }
        debug!(
            interaction_id = %job.interaction_id,
            submitted = outcome.is_submitted(),
            "Job forward finished"
        );
    }
}
