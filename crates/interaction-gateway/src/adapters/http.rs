//! HTTP surface for the interaction pipeline.
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/interactions` | POST | Signed interaction webhook |
//! | `/` | POST | Same as `/interactions` |
//! | `/health` | GET | Liveness probe |
//! | `/metrics` | GET | Prometheus text exposition |

use crate::domain::entities::{HttpResult, RawRequest};
use crate::middleware::TracingLayer;
use crate::ports::inbound::InteractionApi;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn InteractionApi>,
}

/// Build the router around an [`InteractionApi`].
///
/// Bodies larger than `max_body_bytes` are refused with 413 before the
/// pipeline sees them.
pub fn build_router(api: Arc<dyn InteractionApi>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/interactions", post(handle_interaction))
        .route("/", post(handle_interaction))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TracingLayer::new())
        .with_state(AppState { api })
}

/// Bind `addr` and serve `router` until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Starting HTTP server");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn handle_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = raw_request(&headers, body);
    into_response(state.api.handle(&request))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn metrics() -> Response {
    match gateway_telemetry::encode_metrics() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Copy headers into a [`RawRequest`], leaving the body untouched.
///
/// Values that are not visible ASCII are dropped; the first occurrence of a
/// repeated header wins.
pub fn raw_request(headers: &HeaderMap, body: Bytes) -> RawRequest {
    let mut map = BTreeMap::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            map.entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    RawRequest::new(map, body)
}

/// Convert a pipeline result into an HTTP response.
pub fn into_response(result: HttpResult) -> Response {
    let status = StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = Response::new(Body::from(result.body));
    *response.status_mut() = status;

    for (name, value) in &result.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}
