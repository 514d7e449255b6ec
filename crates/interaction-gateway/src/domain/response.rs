//! # Response Builder
//!
//! Maps a [`Reply`] to the [`HttpResult`] returned to the caller. All status
//! codes and the JSON `Content-Type` header are decided here.

use crate::domain::dispatch::Reply;
use crate::domain::entities::HttpResult;
use crate::domain::interaction::response_type;
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

pub const UNHANDLED_INTERACTION: &str = "Unhandled interaction";
pub const INVALID_SIGNATURE: &str = "Invalid request signature";

/// Render a reply.
pub fn render(reply: &Reply) -> HttpResult {
    match reply {
        Reply::Pong => json(200, serde_json::json!({ "type": response_type::PONG })),
        Reply::Acknowledge { content } => json(
            200,
            serde_json::json!({
                "type": response_type::CHANNEL_MESSAGE_WITH_SOURCE,
                "data": { "content": content }
            }),
        ),
        Reply::Unhandled => json(400, serde_json::json!({ "error": UNHANDLED_INTERACTION })),
        Reply::Unauthorized => json(401, serde_json::json!({ "error": INVALID_SIGNATURE })),
    }
}

fn json(status_code: u16, body: serde_json::Value) -> HttpResult {
    let mut headers = BTreeMap::new();
    headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());

    HttpResult {
        status_code,
        headers,
        body: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dispatch::PROCESSING_STARTED;

    #[test]
    fn test_pong() {
        let result = render(&Reply::Pong);
        assert_eq!(result.status_code, 200);
        assert_eq!(result.json_body().unwrap(), serde_json::json!({"type": 1}));
    }

    #[test]
    fn test_acknowledge() {
        let result = render(&Reply::Acknowledge {
            content: PROCESSING_STARTED,
        });
        assert_eq!(result.status_code, 200);
        assert_eq!(
            result.json_body().unwrap(),
            serde_json::json!({"type": 4, "data": {"content": "Process initiated. Please wait..."}})
        );
    }

    #[test]
    fn test_error_statuses() {
        let unhandled = render(&Reply::Unhandled);
        assert_eq!(unhandled.status_code, 400);
        assert_eq!(
            unhandled.json_body().unwrap(),
            serde_json::json!({"error": "Unhandled interaction"})
        );

        let unauthorized = render(&Reply::Unauthorized);
        assert_eq!(unauthorized.status_code, 401);
        assert_eq!(
            unauthorized.json_body().unwrap(),
            serde_json::json!({"error": "Invalid request signature"})
        );
    }

    #[test]
    fn test_content_type_on_every_branch() {
        for reply in [
            Reply::Pong,
            Reply::Acknowledge { content: "x" },
            Reply::Unhandled,
            Reply::Unauthorized,
        ] {
            let result = render(&reply);
            assert_eq!(
                result.headers.get(CONTENT_TYPE).map(String::as_str),
                Some(APPLICATION_JSON)
            );
        }
    }
}
