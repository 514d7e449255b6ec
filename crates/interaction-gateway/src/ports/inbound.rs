//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::{HttpResult, RawRequest};

/// Primary interaction handling API.
///
/// Implementations must be thread-safe (`Send + Sync`) and must return a
/// well-formed [`HttpResult`] on every branch.
pub trait InteractionApi: Send + Sync {
    /// Handle one inbound request.
    ///
    /// Any job submission is started before returning but never awaited.
    fn handle(&self, request: &RawRequest) -> HttpResult;
}
