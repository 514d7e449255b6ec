//! # Domain Entities
//!
//! Request, job and reply shapes that flow through one invocation.
//! Nothing here outlives a single request except the serialized
//! [`JobDescription`], which the worker owns once submitted.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header carrying the hex-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the timestamp that was signed together with the body.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Capitalized spellings some proxies forward instead of the canonical ones.
const SIGNATURE_HEADER_FALLBACK: &str = "X-Signature-Ed25519";
const TIMESTAMP_HEADER_FALLBACK: &str = "X-Signature-Timestamp";

/// Inbound HTTP-shaped request.
///
/// The body is kept as the exact bytes received. It is never re-serialized
/// before verification because the signature covers those bytes.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    headers: BTreeMap<String, String>,
    body: Bytes,
}

impl RawRequest {
    /// Create a request from its headers and raw body.
    pub fn new(headers: BTreeMap<String, String>, body: impl Into<Bytes>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Builder-style header insertion (mostly useful in tests and adapters).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Look up a header.
    ///
    /// Exact match first, then the capitalized fallback spelling, then any
    /// ASCII case-insensitive match.
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.headers.get(name) {
            return Some(value.as_str());
        }

        let fallback = match name {
            SIGNATURE_HEADER => Some(SIGNATURE_HEADER_FALLBACK),
            TIMESTAMP_HEADER => Some(TIMESTAMP_HEADER_FALLBACK),
            _ => None,
        };
        if let Some(value) = fallback.and_then(|f| self.headers.get(f)) {
            return Some(value.as_str());
        }

        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Exact body bytes as received.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Signature material carried by this request.
    pub fn signature_material(&self) -> SignatureMaterial<'_> {
        SignatureMaterial {
            signature_hex: self.header(SIGNATURE_HEADER),
            timestamp: self.header(TIMESTAMP_HEADER),
        }
    }
}

/// Signature and timestamp extracted from the request headers.
///
/// Either may be absent; absence is a verification failure, never a skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureMaterial<'a> {
    pub signature_hex: Option<&'a str>,
    pub timestamp: Option<&'a str>,
}

/// Work handed to the asynchronous worker.
///
/// Serialized as `{"user": .., "interactionId": .., "command": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    /// Display name of the invoking user.
    #[serde(rename = "user")]
    pub invoker_display_name: String,
    /// Opaque interaction identifier used for correlation.
    #[serde(rename = "interactionId")]
    pub interaction_id: String,
    /// Name of the command that triggered the job.
    #[serde(rename = "command")]
    pub command_name: String,
}

impl JobDescription {
    /// Encode as UTF-8 JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Final HTTP-shaped result. The only value returned by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResult {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResult {
    /// Parse the body as JSON (test and diagnostics helper).
    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}
