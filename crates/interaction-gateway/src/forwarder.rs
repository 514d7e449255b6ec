//! # Async Job Forwarder
//!
//! Fire-and-forget hand-off of a [`JobDescription`] to the worker. The reply
//! path calls [`JobForwarder::dispatch`], which runs the submission on a
//! detached Tokio task and returns immediately.

use crate::domain::entities::JobDescription;
use crate::domain::errors::ForwardingError;
use crate::ports::outbound::{ForwardOutcome, InteractionObserver, WorkerGateway};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};

/// Submits jobs to a [`WorkerGateway`] and logs the outcome.
#[derive(Clone)]
pub struct JobForwarder {
    gateway: Arc<dyn WorkerGateway>,
    observer: Arc<dyn InteractionObserver>,
}

impl JobForwarder {
    pub fn new(gateway: Arc<dyn WorkerGateway>, observer: Arc<dyn InteractionObserver>) -> Self {
        Self { gateway, observer }
    }

    /// Perform one submission attempt.
    ///
    /// Failures are logged and returned as `SubmissionFailed`; they never
    /// propagate further.
    pub async fn forward(&self, job: JobDescription) -> ForwardOutcome {
        let outcome = match self.gateway.submit(&job).await {
            Ok(()) => {
                info!(
                    interaction_id = %job.interaction_id,
                    command = %job.command_name,
                    target = %self.gateway.target(),
                    "Worker triggered successfully"
                );
                ForwardOutcome::Submitted
            }
            Err(e) => {
                error!(
                    interaction_id = %job.interaction_id,
                    command = %job.command_name,
                    target = %self.gateway.target(),
                    error = %e,
                    "Error triggering worker"
                );
                ForwardOutcome::SubmissionFailed(e)
            }
        };

        self.observer.job_forwarded(&job, &outcome);
        outcome
    }

    /// Start a submission on a detached task and return without waiting.
    ///
    /// # Errors
    /// `ForwardingError::NoRuntime` when called outside a Tokio runtime.
    pub fn dispatch(
        &self,
        job: JobDescription,
    ) -> Result<JoinHandle<ForwardOutcome>, ForwardingError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| ForwardingError::NoRuntime)?;

        let span = info_span!(
            "job_forward",
            interaction_id = %job.interaction_id,
            command = %job.command_name,
        );
        let forwarder = self.clone();

        Ok(handle.spawn(async move { forwarder.forward(job).await }.instrument(span)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::NoopObserver;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingGateway {
        jobs: Mutex<Vec<JobDescription>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl WorkerGateway for RecordingGateway {
        async fn submit(&self, job: &JobDescription) -> Result<(), ForwardingError> {
            self.jobs.lock().unwrap().push(job.clone());
            if self.fail {
                Err(ForwardingError::Transport("connection refused".into()))
            } else {
                Ok(())
            }
        }

        fn target(&self) -> String {
            "recording".into()
        }
    }

    fn job() -> JobDescription {
        JobDescription {
            invoker_display_name: "alice".into(),
            interaction_id: "abc123".into(),
            command_name: "start".into(),
        }
    }

    #[tokio::test]
    async fn test_forward_success() {
        let gateway = Arc::new(RecordingGateway::default());
        let forwarder = JobForwarder::new(gateway.clone(), Arc::new(NoopObserver));

        let outcome = forwarder.forward(job()).await;
        assert!(outcome.is_submitted());
        assert_eq!(gateway.jobs.lock().unwrap().as_slice(), &[job()]);
    }

    #[tokio::test]
    async fn test_forward_failure_is_reported_not_raised() {
        let gateway = Arc::new(RecordingGateway {
            fail: true,
            ..Default::default()
        });
        let forwarder = JobForwarder::new(gateway, Arc::new(NoopObserver));

        match forwarder.forward(job()).await {
            ForwardOutcome::SubmissionFailed(ForwardingError::Transport(_)) => {}
            other => panic!("expected transport failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_runs_detached() {
        let gateway = Arc::new(RecordingGateway::default());
        let forwarder = JobForwarder::new(gateway.clone(), Arc::new(NoopObserver));

        let handle = forwarder.dispatch(job()).unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("submission should finish")
            .expect("task should not panic");

        assert!(outcome.is_submitted());
        assert_eq!(gateway.jobs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_dispatch_outside_runtime() {
        let forwarder = JobForwarder::new(
            Arc::new(RecordingGateway::default()),
            Arc::new(NoopObserver),
        );
        assert!(matches!(
            forwarder.dispatch(job()),
            Err(ForwardingError::NoRuntime)
        ));
    }
}
