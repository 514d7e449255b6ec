//! # Ed25519 Request Verification
//!
//! The signed message is `timestamp || raw_body`, exactly as received.
//!
//! ## Security Properties
//!
//! - Fail-closed: a missing header, an empty or malformed key, malformed hex
//!   and a cryptographic mismatch all produce the same rejection
//! - Deterministic, no RNG and no I/O
//! - Stateless: safe to share across concurrent requests

use crate::domain::entities::RawRequest;
use crate::domain::errors::AuthenticationError;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Ed25519 public keys are 32 bytes.
const PUBLIC_KEY_LEN: usize = 32;

/// Verify a request signature.
///
/// Returns `false` on any failure, including malformed or missing input.
pub fn verify(raw_body: &[u8], signature_hex: &str, timestamp: &str, public_key: &str) -> bool {
    match verify_detailed(raw_body, Some(signature_hex), Some(timestamp), Some(public_key)) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(reason = %e, "Signature rejected");
            false
        }
    }
}

/// Verify a request signature and report why it failed.
pub fn verify_detailed(
    raw_body: &[u8],
    signature_hex: Option<&str>,
    timestamp: Option<&str>,
    public_key: Option<&str>,
) -> Result<(), AuthenticationError> {
    let key = parse_public_key(public_key)?;
    verify_with_key(&key, raw_body, signature_hex, timestamp)
}

/// Decode a hex-encoded Ed25519 verifying key.
pub fn parse_public_key(public_key: Option<&str>) -> Result<VerifyingKey, AuthenticationError> {
    let hex_key = match public_key {
        Some(k) if !k.is_empty() => k,
        _ => return Err(AuthenticationError::MissingPublicKey),
    };

    let bytes =
        hex::decode(hex_key).map_err(|e| AuthenticationError::MalformedPublicKey(e.to_string()))?;
    let bytes: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
        AuthenticationError::MalformedPublicKey(format!(
            "expected {} bytes, got {}",
            PUBLIC_KEY_LEN,
            v.len()
        ))
    })?;

    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| AuthenticationError::MalformedPublicKey(e.to_string()))
}

fn verify_with_key(
    key: &VerifyingKey,
    raw_body: &[u8],
    signature_hex: Option<&str>,
    timestamp: Option<&str>,
) -> Result<(), AuthenticationError> {
    let signature_hex = match signature_hex {
        Some(s) if !s.is_empty() => s,
        _ => return Err(AuthenticationError::MissingSignature),
    };
    let timestamp = match timestamp {
        Some(t) if !t.is_empty() => t,
        _ => return Err(AuthenticationError::MissingTimestamp),
    };
    if !timestamp.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(AuthenticationError::MalformedTimestamp);
    }

    let sig_bytes = hex::decode(signature_hex)
        .map_err(|e| AuthenticationError::MalformedSignature(e.to_string()))?;
    let signature = Signature::from_slice(&sig_bytes)
        .map_err(|e| AuthenticationError::MalformedSignature(e.to_string()))?;

    let mut message = Vec::with_capacity(timestamp.len() + raw_body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(raw_body);

    key.verify(&message, &signature)
        .map_err(|_| AuthenticationError::Mismatch)
}

/// Body bytes that passed signature verification.
///
/// Only [`SignatureVerifier::verify_request`] can construct one, so the
/// classifier never sees unverified bytes.
#[derive(Debug, Clone, Copy)]
pub struct VerifiedBody<'a> {
    bytes: &'a [u8],
}

impl<'a> VerifiedBody<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Verifier bound to the configured public key.
///
/// The key is decoded once. A missing or malformed key is remembered as an
/// error and every request is rejected with it.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: Result<VerifyingKey, AuthenticationError>,
}

impl SignatureVerifier {
    /// Create a verifier from a hex-encoded public key.
    pub fn new(public_key_hex: Option<&str>) -> Self {
        Self {
            key: parse_public_key(public_key_hex),
        }
    }

    /// Create a verifier from an already decoded key.
    pub fn from_key(key: VerifyingKey) -> Self {
        Self { key: Ok(key) }
    }

    /// Whether a usable key is configured.
    pub fn has_key(&self) -> bool {
        self.key.is_ok()
    }

    /// Verify a request and hand back its body as a [`VerifiedBody`].
    pub fn verify_request<'a>(
        &self,
        request: &'a RawRequest,
    ) -> Result<VerifiedBody<'a>, AuthenticationError> {
        let key = self.key.as_ref().map_err(Clone::clone)?;
        let material = request.signature_material();

        verify_with_key(key, request.body(), material.signature_hex, material.timestamp)?;

        Ok(VerifiedBody {
            bytes: request.body(),
        })
    }
}
