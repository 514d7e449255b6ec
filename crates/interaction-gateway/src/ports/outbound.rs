//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies the pipeline needs: somewhere to submit jobs and something
//! to report to.

use crate::domain::dispatch::Decision;
use crate::domain::entities::{HttpResult, JobDescription};
use crate::domain::errors::{AuthenticationError, ForwardingError, ParseError};
use crate::domain::interaction::VerifiedInteraction;

/// Gateway to the asynchronous worker.
///
/// `submit` returns once the worker has accepted the job for processing.
/// It must not wait for the job itself to finish.
#[async_trait::async_trait]
pub trait WorkerGateway: Send + Sync {
    /// Submit one job.
    ///
    /// # Errors
    /// * `ForwardingError::Transport` - the worker could not be reached
    /// * `ForwardingError::Rejected` - the worker refused the job
    async fn submit(&self, job: &JobDescription) -> Result<(), ForwardingError>;

    /// Short description of the target, for logs.
    fn target(&self) -> String;
}

/// Result of one submission attempt.
#[derive(Debug)]
pub enum ForwardOutcome {
    Submitted,
    SubmissionFailed(ForwardingError),
}

impl ForwardOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, ForwardOutcome::Submitted)
    }
}

/// Presence checks taken before verification. Never carries secret values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDiagnostics {
    pub key_configured: bool,
    pub signature_present: bool,
    pub timestamp_present: bool,
    pub body_len: usize,
}

/// Observability collaborator.
///
/// Every hook defaults to a no-op. Hooks observe outcomes; they cannot
/// change them.
pub trait InteractionObserver: Send + Sync {
    fn request_received(&self, _diagnostics: &RequestDiagnostics) {}

    fn verification_completed(&self, _result: Result<(), &AuthenticationError>) {}

    fn interaction_classified(&self, _result: Result<&VerifiedInteraction, &ParseError>) {}

    fn reply_decided(&self, _decision: &Decision, _result: &HttpResult) {}

    fn job_forwarded(&self, _job: &JobDescription, _outcome: &ForwardOutcome) {}
}

/// Observer that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl InteractionObserver for NoopObserver {}
