//! # Interaction Service
//!
//! Application service that implements [`InteractionApi`].
//!
//! ## Flow
//!
//! ```text
//! RawRequest ─→ verify ──fail──→ 401
//!                 │
//!                 ↓
//!             classify ──→ decide ──→ render ──→ HttpResult
//!                            │
//!                            └──job──→ JobForwarder::dispatch (detached)
//! ```
//!
//! One parameterized pipeline serves both the forwarding and the
//! verify-only variants; see [`DispatchMode`].

use crate::domain::config::GatewayConfig;
use crate::domain::dispatch::{decide, Decision, DispatchInput, DispatchMode};
use crate::domain::entities::{HttpResult, RawRequest};
use crate::domain::interaction::{classify, CommandFilter};
use crate::domain::response::render;
use crate::domain::signature::SignatureVerifier;
use crate::forwarder::JobForwarder;
use crate::ports::inbound::InteractionApi;
use crate::ports::outbound::{
    ForwardOutcome, InteractionObserver, RequestDiagnostics, WorkerGateway,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Everything produced while handling one request.
pub struct Handled {
    /// Reply for the caller.
    pub result: HttpResult,
    /// Decision that produced the reply.
    pub decision: Decision,
    /// Detached submission, if a job was dispatched.
    pub submission: Option<JoinHandle<ForwardOutcome>>,
}

/// Interaction handling service.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct InteractionService {
    verifier: SignatureVerifier,
    mode: DispatchMode,
    filter: CommandFilter,
    forwarder: JobForwarder,
    observer: Arc<dyn InteractionObserver>,
}

impl InteractionService {
    /// Create a service from its parts.
    pub fn new(
        verifier: SignatureVerifier,
        mode: DispatchMode,
        gateway: Arc<dyn WorkerGateway>,
        observer: Arc<dyn InteractionObserver>,
    ) -> Self {
        Self {
            verifier,
            filter: mode.command_filter(),
            mode,
            forwarder: JobForwarder::new(gateway, Arc::clone(&observer)),
            observer,
        }
    }

    /// Create a service from gateway configuration.
    ///
    /// A missing or malformed public key does not fail construction; every
    /// request is rejected with 401 instead.
    pub fn from_config(
        config: &GatewayConfig,
        gateway: Arc<dyn WorkerGateway>,
        observer: Arc<dyn InteractionObserver>,
    ) -> Self {
        Self::new(
            SignatureVerifier::new(config.public_key.as_deref()),
            config.dispatch_mode(),
            gateway,
            observer,
        )
    }

    pub fn mode(&self) -> &DispatchMode {
        &self.mode
    }

    /// Run the full pipeline for one request.
    pub fn process(&self, request: &RawRequest) -> Handled {
        let material = request.signature_material();
        self.observer.request_received(&RequestDiagnostics {
            key_configured: self.verifier.has_key(),
            signature_present: material.signature_hex.is_some(),
            timestamp_present: material.timestamp.is_some(),
            body_len: request.body().len(),
        });

        let input = match self.verifier.verify_request(request) {
            Err(e) => {
                warn!(reason = %e, "Invalid request signature");
                self.observer.verification_completed(Err(&e));
                DispatchInput::AuthenticationFailed(e)
            }
            Ok(body) => {
                self.observer.verification_completed(Ok(()));
                match classify(body, &self.filter) {
                    Ok(interaction) => {
                        debug!(kind = interaction.kind(), "Interaction classified");
                        self.observer.interaction_classified(Ok(&interaction));
                        DispatchInput::Classified(interaction)
                    }
                    Err(e) => {
                        warn!(error = %e, "Verified body could not be parsed");
                        self.observer.interaction_classified(Err(&e));
                        DispatchInput::Unparseable(e)
                    }
                }
            }
        };

        let decision = decide(&self.mode, input);
        let result = render(&decision.reply);

        let submission = decision.job.clone().and_then(|job| {
            match self.forwarder.dispatch(job.clone()) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    error!(
                        interaction_id = %job.interaction_id,
                        error = %e,
                        "Error triggering worker"
                    );
                    self.observer
                        .job_forwarded(&job, &ForwardOutcome::SubmissionFailed(e));
                    None
                }
            }
        });

        self.observer.reply_decided(&decision, &result);

        Handled {
            result,
            decision,
            submission,
        }
    }
}

impl InteractionApi for InteractionService {
    fn handle(&self, request: &RawRequest) -> HttpResult {
        self.process(request).result
    }
}
