//! Adapters for the interaction gateway.
//!
//! Infrastructure implementations of the ports: the axum HTTP surface,
//! worker gateways and the tracing/metrics observer.

pub mod http;
pub mod observer;
pub mod worker;

pub use http::{build_router, serve, AppState};
pub use observer::TracingObserver;
pub use worker::{ChannelWorkerGateway, HttpWorkerGateway, UnconfiguredWorkerGateway};
