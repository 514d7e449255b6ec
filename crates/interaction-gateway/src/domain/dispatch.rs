//! # Dispatch Decision Engine
//!
//! Single-shot state machine: one classified input in, one synchronous reply
//! and at most one job out. No intermediate states.
//!
//! | Input | Job | Reply |
//! |-------|-----|-------|
//! | Ping | none | Pong |
//! | Command (recognized) | forward mode: one job | Acknowledge |
//! | Unknown / unparseable | none | Unhandled |
//! | Authentication failed | none | Unauthorized |

use crate::domain::entities::JobDescription;
use crate::domain::errors::{AuthenticationError, ParseError};
use crate::domain::interaction::{CommandFilter, VerifiedInteraction};

/// Acknowledgment sent when a job has been handed off.
pub const PROCESSING_STARTED: &str = "Process initiated. Please wait...";

/// Acknowledgment sent by the verify-only pipeline.
pub const VERIFICATION_READY: &str = "Verification successful! The switch is ready.";

/// How recognized commands are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchMode {
    /// Forward the trigger command to the worker.
    Forward { trigger: String },
    /// Acknowledge any command without forwarding anything.
    VerifyOnly,
}

impl DispatchMode {
    /// Which commands the classifier should recognize in this mode.
    pub fn command_filter(&self) -> CommandFilter {
        match self {
            DispatchMode::Forward { trigger } => CommandFilter::Trigger(trigger.clone()),
            DispatchMode::VerifyOnly => CommandFilter::Any,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DispatchMode::Forward { .. } => "forward",
            DispatchMode::VerifyOnly => "verify-only",
        }
    }
}

/// What reached the decision engine.
#[derive(Debug)]
pub enum DispatchInput {
    AuthenticationFailed(AuthenticationError),
    Unparseable(ParseError),
    Classified(VerifiedInteraction),
}

/// Synchronous reply chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Pong,
    Acknowledge { content: &'static str },
    Unhandled,
    Unauthorized,
}

/// Output of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub reply: Reply,
    /// Job to submit. The reply does not depend on whether submission works.
    pub job: Option<JobDescription>,
}

impl Decision {
    fn reply_only(reply: Reply) -> Self {
        Self { reply, job: None }
    }
}

/// Decide the reply and the optional job for one request.
pub fn decide(mode: &DispatchMode, input: DispatchInput) -> Decision {
    let interaction = match input {
        DispatchInput::AuthenticationFailed(_) => return Decision::reply_only(Reply::Unauthorized),
        DispatchInput::Unparseable(_) => return Decision::reply_only(Reply::Unhandled),
        DispatchInput::Classified(interaction) => interaction,
    };

    match (interaction, mode) {
        (VerifiedInteraction::Ping, _) => Decision::reply_only(Reply::Pong),

        (
            VerifiedInteraction::Command {
                name,
                invoker_display_name,
                interaction_id,
            },
            DispatchMode::Forward { trigger },
        ) => {
            // Only the trigger is ever forwarded, whatever filter classified it.
            let (name, interaction_id) = match (name, interaction_id) {
                (Some(name), Some(id)) if &name == trigger => (name, id),
                _ => return Decision::reply_only(Reply::Unhandled),
            };
            Decision {
                reply: Reply::Acknowledge {
                    content: PROCESSING_STARTED,
                },
                job: Some(JobDescription {
                    invoker_display_name,
                    interaction_id,
                    command_name: name,
                }),
            }
        }

        (VerifiedInteraction::Command { .. }, DispatchMode::VerifyOnly) => {
            Decision::reply_only(Reply::Acknowledge {
                content: VERIFICATION_READY,
            })
        }

        (VerifiedInteraction::Unknown { .. }, _) => Decision::reply_only(Reply::Unhandled),
    }
}
