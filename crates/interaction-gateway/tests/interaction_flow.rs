//! End-to-end tests driving the axum router with signed requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use ed25519_dalek::{Signer, SigningKey};
use interaction_gateway::domain::entities::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use interaction_gateway::{
    build_router, ChannelWorkerGateway, DispatchMode, ForwardingError, HttpWorkerGateway,
    InteractionObserver, InteractionService, JobDescription, NoopObserver, SignatureVerifier,
    TracingObserver, WorkerGateway,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;

const TIMESTAMP: &str = "1700000000";
const TRIGGER_BODY: &str = r#"{"type":2,"data":{"name":"start"},"member":{"user":{"username":"alice"}},"id":"abc123"}"#;

struct FailingGateway;

#[async_trait::async_trait]
impl WorkerGateway for FailingGateway {
    async fn submit(&self, _job: &JobDescription) -> Result<(), ForwardingError> {
        Err(ForwardingError::Transport("connection refused".into()))
    }

    fn target(&self) -> String {
        "failing".into()
    }
}

fn new_key() -> SigningKey {
    SigningKey::generate(&mut rand::thread_rng())
}

fn forward_mode() -> DispatchMode {
    DispatchMode::Forward {
        trigger: "start".into(),
    }
}

fn router(
    key: &SigningKey,
    mode: DispatchMode,
    gateway: Arc<dyn WorkerGateway>,
    observer: Arc<dyn InteractionObserver>,
) -> Router {
    let service = InteractionService::new(
        SignatureVerifier::from_key(key.verifying_key()),
        mode,
        gateway,
        observer,
    );
    build_router(Arc::new(service), 64 * 1024)
}

fn signed_request(key: &SigningKey, body: &str) -> Request<Body> {
    let mut message = TIMESTAMP.as_bytes().to_vec();
    message.extend_from_slice(body.as_bytes());
    let signature = hex::encode(key.sign(&message).to_bytes());

    Request::builder()
        .method("POST")
        .uri("/interactions")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .header(TIMESTAMP_HEADER, TIMESTAMP)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<Value>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).ok())
}

async fn expect_no_job(rx: &mut mpsc::Receiver<JobDescription>) {
    let waited = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(waited.is_err(), "unexpected job forwarded: {:?}", waited);
}

#[tokio::test]
async fn test_ping_returns_pong() {
    let key = new_key();
    let (gateway, mut rx) = ChannelWorkerGateway::new(4);
    let app = router(&key, forward_mode(), Arc::new(gateway), Arc::new(NoopObserver));

    let (status, body) = send(app, signed_request(&key, r#"{"type":1}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!({ "type": 1 })));
    expect_no_job(&mut rx).await;
}

#[tokio::test]
async fn test_trigger_command_acknowledged_and_forwarded_once() {
    let key = new_key();
    let (gateway, mut rx) = ChannelWorkerGateway::new(4);
    let app = router(
        &key,
        forward_mode(),
        Arc::new(gateway),
        Arc::new(TracingObserver::new(true)),
    );

    let (status, body) = send(app, signed_request(&key, TRIGGER_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        Some(json!({
            "type": 4,
            "data": { "content": "Process initiated. Please wait..." }
        }))
    );

    let job = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("job forwarded")
        .expect("channel open");
    assert_eq!(
        serde_json::to_value(&job).unwrap(),
        json!({ "user": "alice", "interactionId": "abc123", "command": "start" })
    );
    expect_no_job(&mut rx).await;
}

#[tokio::test]
async fn test_other_command_is_400_without_forwarding() {
    let key = new_key();
    let (gateway, mut rx) = ChannelWorkerGateway::new(4);
    let app = router(&key, forward_mode(), Arc::new(gateway), Arc::new(NoopObserver));

    let body = TRIGGER_BODY.replace("\"start\"", "\"other\"");
    let (status, _) = send(app, signed_request(&key, &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    expect_no_job(&mut rx).await;
}

#[tokio::test]
async fn test_corrupted_signature_is_401_without_forwarding() {
    let key = new_key();
    let (gateway, mut rx) = ChannelWorkerGateway::new(4);
    let app = router(&key, forward_mode(), Arc::new(gateway), Arc::new(NoopObserver));

    let mut request = signed_request(&key, TRIGGER_BODY);
    let signature = request.headers()[SIGNATURE_HEADER].to_str().unwrap().to_string();
    let flipped = if signature.starts_with('0') { "1" } else { "0" };
    let corrupted = format!("{}{}", flipped, &signature[1..]);
    request
        .headers_mut()
        .insert(SIGNATURE_HEADER, corrupted.parse().unwrap());

    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    expect_no_job(&mut rx).await;
}

#[tokio::test]
async fn test_missing_headers_are_401() {
    let key = new_key();
    let (gateway, _rx) = ChannelWorkerGateway::new(4);
    let app = router(&key, forward_mode(), Arc::new(gateway), Arc::new(NoopObserver));

    let mut request = signed_request(&key, r#"{"type":1}"#);
    request.headers_mut().remove(TIMESTAMP_HEADER);
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = signed_request(&key, r#"{"type":1}"#);
    request.headers_mut().remove(SIGNATURE_HEADER);
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_worker_failure_is_invisible_to_caller() {
    let key = new_key();
    let app = router(
        &key,
        forward_mode(),
        Arc::new(FailingGateway),
        Arc::new(TracingObserver::new(false)),
    );

    let (status, body) = send(app, signed_request(&key, TRIGGER_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["data"]["content"], "Process initiated. Please wait...");
}

#[tokio::test]
async fn test_verify_only_acknowledges_any_command() {
    let key = new_key();
    let (gateway, mut rx) = ChannelWorkerGateway::new(4);
    let app = router(
        &key,
        DispatchMode::VerifyOnly,
        Arc::new(gateway),
        Arc::new(NoopObserver),
    );

    let body = TRIGGER_BODY.replace("\"start\"", "\"anything\"");
    let (status, body) = send(app, signed_request(&key, &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.unwrap()["data"]["content"],
        "Verification successful! The switch is ready."
    );
    expect_no_job(&mut rx).await;
}

#[tokio::test]
async fn test_verify_only_acknowledges_command_without_name_or_id() {
    let key = new_key();
    let (gateway, mut rx) = ChannelWorkerGateway::new(4);
    let app = router(
        &key,
        DispatchMode::VerifyOnly,
        Arc::new(gateway),
        Arc::new(NoopObserver),
    );

    let (status, _) = send(app, signed_request(&key, r#"{"type":2}"#)).await;

    assert_eq!(status, StatusCode::OK);
    expect_no_job(&mut rx).await;
}

#[tokio::test]
async fn test_ping_with_numeric_id_is_pong() {
    let key = new_key();
    let (gateway, _rx) = ChannelWorkerGateway::new(4);
    let app = router(&key, forward_mode(), Arc::new(gateway), Arc::new(NoopObserver));

    let (status, body) = send(app, signed_request(&key, r#"{"type":1,"id":42}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!({ "type": 1 })));
}

#[tokio::test]
async fn test_empty_username_forwarded_as_unknown_user() {
    let key = new_key();
    let (gateway, mut rx) = ChannelWorkerGateway::new(4);
    let app = router(&key, forward_mode(), Arc::new(gateway), Arc::new(NoopObserver));

    let body = TRIGGER_BODY.replace("\"alice\"", "\"\"");
    let (status, _) = send(app, signed_request(&key, &body)).await;
    assert_eq!(status, StatusCode::OK);

    let job = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("job forwarded")
        .expect("channel open");
    assert_eq!(job.invoker_display_name, "Unknown User");
}

#[tokio::test]
async fn test_http_worker_receives_job() {
    let (tx, mut rx) = mpsc::channel::<Value>(4);
    let worker = Router::new().route(
        "/jobs",
        post(move |Json(job): Json<Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(job).await;
                StatusCode::ACCEPTED
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, worker).await });

    let key = new_key();
    let gateway = HttpWorkerGateway::new(format!("http://{}/jobs", addr), Duration::from_secs(2))
        .unwrap();
    let app = router(&key, forward_mode(), Arc::new(gateway), Arc::new(NoopObserver));

    let (status, _) = send(app, signed_request(&key, TRIGGER_BODY)).await;
    assert_eq!(status, StatusCode::OK);

    let job = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("worker called")
        .unwrap();
    assert_eq!(job["interactionId"], "abc123");
    assert_eq!(job["user"], "alice");
}

#[tokio::test]
async fn test_http_worker_rejection_reported() {
    let worker = Router::new().route("/jobs", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, worker).await });

    let gateway = HttpWorkerGateway::new(format!("http://{}/jobs", addr), Duration::from_secs(2))
        .unwrap();
    let job = JobDescription {
        invoker_display_name: "alice".into(),
        interaction_id: "abc123".into(),
        command_name: "start".into(),
    };

    assert!(matches!(
        gateway.submit(&job).await,
        Err(ForwardingError::Rejected(503))
    ));
}
