//! # Interaction Errors
//!
//! Every variant here is recovered locally into an `HttpResult`; none of
//! them escapes to the transport layer.

use thiserror::Error;

/// Why a request failed authentication.
///
/// All variants map to the same 401 reply. The distinction exists for logs
/// only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Signature header missing")]
    MissingSignature,

    #[error("Timestamp header missing")]
    MissingTimestamp,

    #[error("Timestamp header is not printable ASCII")]
    MalformedTimestamp,

    #[error("Public key not configured")]
    MissingPublicKey,

    #[error("Public key malformed: {0}")]
    MalformedPublicKey(String),

    #[error("Signature malformed: {0}")]
    MalformedSignature(String),

    #[error("Signature verification failed")]
    Mismatch,
}

impl AuthenticationError {
    /// Stable label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingSignature => "missing_signature",
            Self::MissingTimestamp => "missing_timestamp",
            Self::MalformedTimestamp => "malformed_timestamp",
            Self::MissingPublicKey => "missing_public_key",
            Self::MalformedPublicKey(_) => "malformed_public_key",
            Self::MalformedSignature(_) => "malformed_signature",
            Self::Mismatch => "mismatch",
        }
    }
}

/// Verified body is not well-formed structured data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Interaction body is not valid JSON: {0}")]
pub struct ParseError(pub String);

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

/// Structure was recognized but nothing handles it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationMiss {
    #[error("Unsupported interaction type: {0}")]
    UnsupportedType(u64),

    #[error("Interaction type field missing or not numeric")]
    MissingType,

    #[error("Command `{0}` is not the configured trigger")]
    UnknownCommand(String),

    #[error("Command interaction has no name")]
    MissingCommandName,

    #[error("Command interaction has no id")]
    MissingInteractionId,
}

/// Submission to the worker failed. Logged, never surfaced to the caller.
#[derive(Debug, Error)]
pub enum ForwardingError {
    #[error("Worker target not configured")]
    NotConfigured,

    #[error("Failed to encode job: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Worker transport error: {0}")]
    Transport(String),

    #[error("Worker rejected job with status {0}")]
    Rejected(u16),

    #[error("Worker channel closed")]
    ChannelClosed,

    #[error("No async runtime available to run the submission")]
    NoRuntime,
}

/// Umbrella error for the whole pipeline.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    ClassificationMiss(#[from] ClassificationMiss),

    #[error(transparent)]
    Forwarding(#[from] ForwardingError),
}
