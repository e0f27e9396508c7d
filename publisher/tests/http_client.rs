//! HTTP client behaviour against an in-process KM server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use km_publisher::{ClientError, HttpClientConfig, HttpKmClient, KmClient};
use serde_json::{json, Value};

/// How the fake server answers.
#[derive(Clone, Copy)]
enum Mode {
    Accept,
    RejectInBody,
    BadRequest,
    /// 503 for the first N calls, then accept.
    Flaky(usize),
    AlwaysDown,
}

#[derive(Clone)]
struct FakeKm {
    mode: Mode,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn handle(State(km): State<FakeKm>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let hit = km.hits.fetch_add(1, Ordering::SeqCst) + 1;
    km.bodies.lock().expect("bodies lock").push(body);
    match km.mode {
        Mode::Accept => (StatusCode::OK, Json(json!({"success": true, "result": "(t)"}))),
        Mode::RejectInBody => (
            StatusCode::OK,
            Json(json!({"success": false, "error": "undefined frame Animal"})),
        ),
        Mode::BadRequest => (StatusCode::BAD_REQUEST, Json(json!({"error": "syntax"}))),
        Mode::Flaky(failures) if hit <= failures => {
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "busy"})))
        }
        Mode::Flaky(_) => (StatusCode::OK, Json(json!({"success": true}))),
        Mode::AlwaysDown => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
    }
}

async fn spawn_server(mode: Mode) -> (String, FakeKm) {
    let km = FakeKm {
        mode,
        hits: Arc::new(AtomicUsize::new(0)),
        bodies: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/km", post(handle))
        .with_state(km.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}/km"), km)
}

fn fast_config(url: String) -> HttpClientConfig {
    HttpClientConfig {
        url,
        timeout_ms: 2_000,
        backoff_min_ms: 5,
        backoff_max_ms: 20,
        ..HttpClientConfig::default()
    }
}

#[tokio::test]
async fn accepted_expression() {
    let (url, km) = spawn_server(Mode::Accept).await;
    let client = HttpKmClient::new(fast_config(url)).expect("client");
    let outcome = client.publish("(Animal has)", false).await.expect("publish");

    assert!(outcome.success);
    assert!(outcome.detail.contains("\"success\""));
    let bodies = km.bodies.lock().expect("bodies lock").clone();
    assert_eq!(bodies, vec![json!({"expr": "(Animal has)", "fail_mode": "fail"})]);
}

#[tokio::test]
async fn success_false_in_body_is_a_rejection() {
    let (url, km) = spawn_server(Mode::RejectInBody).await;
    let client = HttpKmClient::new(fast_config(url)).expect("client");
    let outcome = client.publish("(Dog has)", false).await.expect("publish");
    assert!(!outcome.success);
    assert!(outcome.detail.contains("undefined frame"));
    assert_eq!(km.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let (url, km) = spawn_server(Mode::BadRequest).await;
    let client = HttpKmClient::new(fast_config(url)).expect("client");
    let outcome = client.publish("(Dog has", false).await.expect("publish");
    assert!(!outcome.success);
    assert!(outcome.detail.contains("400"));
    assert_eq!(km.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn transient_errors_are_retried() {
    let (url, km) = spawn_server(Mode::Flaky(2)).await;
    let client = HttpKmClient::new(fast_config(url)).expect("client");
    let outcome = client.publish("(Dog has)", false).await.expect("publish");
    assert!(outcome.success);
    assert_eq!(km.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_are_network_errors() {
    let (url, km) = spawn_server(Mode::AlwaysDown).await;
    let client = HttpKmClient::new(fast_config(url)).expect("client");
    let err = client.publish("(Dog has)", false).await.expect_err("gives up");
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(km.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = HttpKmClient::new(fast_config(format!("http://{addr}/km"))).expect("client");
    let err = client.publish("(Dog has)", false).await.expect_err("refused");
    assert!(matches!(err, ClientError::Network(_)));
}

#[tokio::test]
async fn dry_run_never_hits_the_server() {
    let (url, km) = spawn_server(Mode::AlwaysDown).await;
    let client = HttpKmClient::new(fast_config(url)).expect("client");
    let outcome = client.publish("(Dog has)", true).await.expect("dry run");
    assert!(outcome.success);
    assert_eq!(km.hits.load(Ordering::SeqCst), 0);
}
