//! Worker gateway implementations.
//!
//! - [`HttpWorkerGateway`]: POSTs the job JSON to the configured endpoint
//! - [`ChannelWorkerGateway`]: in-process hand-off over a Tokio channel
//! - [`UnconfiguredWorkerGateway`]: rejects every job, used when no target is set

use crate::domain::entities::JobDescription;
use crate::domain::errors::ForwardingError;
use crate::ports::outbound::WorkerGateway;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Submits jobs over HTTP.
///
/// A 2xx status means the worker accepted the job. The worker is expected to
/// acknowledge before doing the work.
#[derive(Debug, Clone)]
pub struct HttpWorkerGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpWorkerGateway {
    /// Create a gateway for `endpoint` with a per-submission timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ForwardingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForwardingError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl WorkerGateway for HttpWorkerGateway {
    async fn submit(&self, job: &JobDescription) -> Result<(), ForwardingError> {
        let payload = job.to_json()?;
        debug!(endpoint = %self.endpoint, bytes = payload.len(), "Submitting job");

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| ForwardingError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ForwardingError::Rejected(status.as_u16()))
        }
    }

    fn target(&self) -> String {
        self.endpoint.clone()
    }
}

/// Hands jobs to an in-process consumer.
///
/// Submission completes once the job is queued; the receiver owns it from
/// then on.
#[derive(Debug, Clone)]
pub struct ChannelWorkerGateway {
    sender: mpsc::Sender<JobDescription>,
}

impl ChannelWorkerGateway {
    /// Create a gateway and the receiving end for the worker.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobDescription>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl WorkerGateway for ChannelWorkerGateway {
    async fn submit(&self, job: &JobDescription) -> Result<(), ForwardingError> {
        self.sender
            .send(job.clone())
            .await
            .map_err(|_| ForwardingError::ChannelClosed)
    }

    fn target(&self) -> String {
        "in-process".to_string()
    }
}

/// Gateway used when no worker target is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredWorkerGateway;

#[async_trait]
impl WorkerGateway for UnconfiguredWorkerGateway {
    async fn submit(&self, _job: &JobDescription) -> Result<(), ForwardingError> {
        Err(ForwardingError::NotConfigured)
    }

    fn target(&self) -> String {
        "unconfigured".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobDescription {
        JobDescription {
            invoker_display_name: "alice".into(),
            interaction_id: "abc123".into(),
            command_name: "start".into(),
        }
    }

    #[tokio::test]
    async fn test_channel_gateway_delivers() {
        let (gateway, mut rx) = ChannelWorkerGateway::new(4);
        gateway.submit(&job()).await.unwrap();
        assert_eq!(rx.recv().await, Some(job()));
    }

    #[tokio::test]
    async fn test_channel_gateway_closed() {
        let (gateway, rx) = ChannelWorkerGateway::new(1);
        drop(rx);
        assert!(matches!(
            gateway.submit(&job()).await,
            Err(ForwardingError::ChannelClosed)
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_rejects() {
        assert!(matches!(
            UnconfiguredWorkerGateway.submit(&job()).await,
            Err(ForwardingError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_http_gateway_unreachable() {
        // Bind then release a port so nothing is listening on it.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let endpoint = format!("http://{}/jobs", addr);

        let gateway = HttpWorkerGateway::new(endpoint.clone(), Duration::from_millis(500)).unwrap();
        assert_eq!(gateway.target(), endpoint);
        assert!(matches!(
            gateway.submit(&job()).await,
            Err(ForwardingError::Transport(_))
        ));
    }
}
