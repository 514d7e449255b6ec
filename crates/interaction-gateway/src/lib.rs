//! Interaction Gateway - signed webhook endpoint for chat-platform interactions.
//!
//! Verifies Ed25519-signed requests, answers the platform's liveness probe,
//! acknowledges the configured trigger command and hands the real work to an
//! asynchronous worker without waiting for it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     INTERACTION GATEWAY                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  axum Router: POST /interactions, POST /, /health, /metrics  │
//! │        │                                                     │
//! │  ┌─────┴──────────────────────────────┐                      │
//! │  │  Middleware: Tracing → BodyLimit   │                      │
//! │  └─────┬──────────────────────────────┘                      │
//! │        │                                                     │
//! │  ┌─────┴──────────────────────────────────────────────┐      │
//! │  │ InteractionService                                 │      │
//! │  │  verify → classify → decide → render               │      │
//! │  └─────┬──────────────────────────────────────────────┘      │
//! │        │ job (detached)                                      │
//! │  ┌─────┴──────────┐                                          │
//! │  │  JobForwarder  │──→ WorkerGateway (HTTP / channel)        │
//! │  └────────────────┘                                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use interaction_gateway::{build_router, GatewayConfig, InteractionService};
//!
//! let config = GatewayConfig::from_env();
//! let service = InteractionService::from_config(&config, gateway, observer);
//! let router = build_router(Arc::new(service), config.http.max_body_bytes);
//! ```
//!
//! # Security
//!
//! - Signature covers `timestamp || body` over the exact received bytes
//! - Every verification failure, including missing headers or key, is a 401
//! - Classification only accepts a body the verifier produced

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod forwarder;
pub mod middleware;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use adapters::{
    build_router, serve, ChannelWorkerGateway, HttpWorkerGateway, TracingObserver,
    UnconfiguredWorkerGateway,
};
pub use domain::config::{ConfigError, GatewayConfig, GatewayMode};
pub use domain::dispatch::{decide, Decision, DispatchInput, DispatchMode, Reply};
pub use domain::entities::{HttpResult, JobDescription, RawRequest};
pub use domain::errors::{
    AuthenticationError, ClassificationMiss, ForwardingError, InteractionError, ParseError,
};
pub use domain::interaction::{classify, CommandFilter, VerifiedInteraction};
pub use domain::response::render;
pub use domain::signature::{verify, SignatureVerifier, VerifiedBody};
pub use forwarder::JobForwarder;
pub use ports::inbound::InteractionApi;
pub use ports::outbound::{
    ForwardOutcome, InteractionObserver, NoopObserver, RequestDiagnostics, WorkerGateway,
};
pub use service::{Handled, InteractionService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
