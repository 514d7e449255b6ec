//! # Interaction Classification
//!
//! Turns a verified body into a [`VerifiedInteraction`]: handshake, the
//! trigger command, or unknown.

use crate::domain::errors::{ClassificationMiss, ParseError};
use crate::domain::signature::VerifiedBody;

/// Display name used when the payload carries no user.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Interaction type codes sent by the platform.
pub mod interaction_type {
    pub const PING: u64 = 1;
    pub const APPLICATION_COMMAND: u64 = 2;
    pub const MESSAGE_COMPONENT: u64 = 3;
    pub const APPLICATION_COMMAND_AUTOCOMPLETE: u64 = 4;
    pub const MODAL_SUBMIT: u64 = 5;
}

/// Reply type codes understood by the platform.
pub mod response_type {
    pub const PONG: u8 = 1;
    pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
}

/// Which commands count as recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFilter {
    /// Only the named trigger command.
    Trigger(String),
    /// Any command name.
    Any,
}

impl CommandFilter {
    fn accepts(&self, name: &str) -> bool {
        match self {
            CommandFilter::Trigger(trigger) => trigger == name,
            CommandFilter::Any => true,
        }
    }
}

/// A classified interaction. Only built from a [`VerifiedBody`].
#[derive(Debug, Clone, PartialEq)]
pub enum VerifiedInteraction {
    Ping,
    /// Name and id are always present when classified against a trigger.
    Command {
        name: Option<String>,
        invoker_display_name: String,
        interaction_id: Option<String>,
    },
    Unknown {
        raw: serde_json::Value,
        reason: ClassificationMiss,
    },
}

impl VerifiedInteraction {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifiedInteraction::Ping => "ping",
            VerifiedInteraction::Command { .. } => "command",
            VerifiedInteraction::Unknown { .. } => "unknown",
        }
    }
}

/// Non-empty string at `pointer`, if any.
fn text_at<'v>(raw: &'v serde_json::Value, pointer: &str) -> Option<&'v str> {
    raw.pointer(pointer)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

/// Classify a verified body.
///
/// Only `type` decides the kind. Every other field is read leniently: a
/// field that is absent or of an unexpected type counts as missing.
///
/// With [`CommandFilter::Trigger`] a command must name the trigger and carry
/// an id. With [`CommandFilter::Any`] every command is recognized, even
/// without a name or id.
///
/// # Errors
/// `ParseError` when the body is not a JSON object.
pub fn classify(
    body: VerifiedBody<'_>,
    filter: &CommandFilter,
) -> Result<VerifiedInteraction, ParseError> {
    let raw: serde_json::Value = serde_json::from_slice(body.as_bytes())?;
    if !raw.is_object() {
        return Err(ParseError("expected a JSON object".into()));
    }

    let kind = match raw.get("type").and_then(|v| v.as_u64()) {
        Some(k) => k,
        None => {
            return Ok(VerifiedInteraction::Unknown {
                raw,
                reason: ClassificationMiss::MissingType,
            })
        }
    };

    let classified = match kind {
        interaction_type::PING => return Ok(VerifiedInteraction::Ping),
        interaction_type::APPLICATION_COMMAND => {
            let name = text_at(&raw, "/data/name").map(str::to_string);
            let interaction_id = raw.get("id").and_then(|v| v.as_str()).map(str::to_string);

            let rejected = match filter {
                CommandFilter::Any => None,
                CommandFilter::Trigger(_) => match (&name, &interaction_id) {
                    (None, _) => Some(ClassificationMiss::MissingCommandName),
                    (Some(n), _) if !filter.accepts(n) => {
                        Some(ClassificationMiss::UnknownCommand(n.clone()))
                    }
                    (_, None) => Some(ClassificationMiss::MissingInteractionId),
                    _ => None,
                },
            };

            match rejected {
                Some(reason) => Err(reason),
                None => {
                    let invoker_display_name = text_at(&raw, "/member/user/username")
                        .or_else(|| text_at(&raw, "/user/username"))
                        .unwrap_or(UNKNOWN_USER)
                        .to_string();
                    Ok(VerifiedInteraction::Command {
                        name,
                        invoker_display_name,
                        interaction_id,
                    })
                }
            }
        }
        other => Err(ClassificationMiss::UnsupportedType(other)),
    };

    Ok(classified.unwrap_or_else(|reason| VerifiedInteraction::Unknown { raw, reason }))
}
