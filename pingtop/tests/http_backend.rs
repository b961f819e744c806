//! End-to-end over real HTTP against an in-process stub backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pingtop::api::{ApiClient, ReqwestTransport};
use pingtop::results::LogLine;
use pingtop::types::ProbeState;
use pingtop::{ApiError, Console, ProbeApi};
use serde_json::{json, Value};

type Store = Arc<Mutex<Vec<Value>>>;

async fn verify(State(store): State<Store>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let url = body["url"].as_str().unwrap_or_default().to_string();
    if url.contains("explode") {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "probe crashed" })),
        );
    }
    let down = url.contains("down");
    let code = if down { 0 } else { 200 };
    let message = if down { "timeout" } else { "" };
    let latency = if url.contains("slow") { 1200 } else { 35 };
    let statut = json!({
        "url": url,
        "est_disponible": !down,
        "code_http": code,
        "message_erreur": message,
        "latence_ms": latency,
        "verifie_a": "2025-10-01T12:00:00Z",
    });
    store.lock().unwrap().insert(0, statut.clone());
    (StatusCode::OK, Json(json!({ "statut": statut })))
}

async fn list(State(store): State<Store>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let limit = q
        .get("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(50);
    let items: Vec<Value> = store.lock().unwrap().iter().take(limit).cloned().collect();
    Json(json!({ "resultats": items }))
}

async fn clear(State(store): State<Store>) -> Json<Value> {
    store.lock().unwrap().clear();
    Json(json!({ "ok": true }))
}

async fn spawn_backend() -> String {
    let store: Store = Arc::default();
    let app = Router::new()
        .route("/api/verifier", post(verify))
        .route("/api/resultats", get(list).delete(clear))
        .route("/api/etat", get(|| async { "OK" }))
        .with_state(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str) -> ApiClient<ReqwestTransport> {
    ApiClient::new(ReqwestTransport::new(base, None).unwrap())
}

#[tokio::test]
async fn probe_list_and_clear_round_trip() {
    let base = spawn_backend().await;
    let api = client(&base);

    api.health().await.unwrap();
    let up = api.submit_check("https://up.example").await.unwrap();
    assert_eq!(up.state(), ProbeState::Online);
    let slow = api.submit_check("https://slow.example").await.unwrap();
    assert_eq!(slow.state(), ProbeState::Slow);
    let down = api.submit_check("https://down.example").await.unwrap();
    assert_eq!(down.state(), ProbeState::Offline);
    assert_eq!(down.error_detail(), Some("timeout"));

    let recent = api.fetch_recent(2).await.unwrap();
    let urls: Vec<&str> = recent.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, ["https://down.example", "https://slow.example"]);

    api.clear_all().await.unwrap();
    assert!(api.fetch_recent(50).await.unwrap().is_empty());
}

#[tokio::test]
async fn backend_error_body_becomes_the_message() {
    let base = spawn_backend().await;
    let err = client(&base)
        .submit_check("https://explode.example")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 502,
            message: "probe crashed".into()
        }
    );
}

#[tokio::test]
async fn unknown_route_falls_back_to_status_text() {
    let base = spawn_backend().await;
    let api = ApiClient::with_check_path(ReqwestTransport::new(&base, None).unwrap(), "/api/check");
    let err = api.submit_check("https://up.example").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 404,
            message: "HTTP 404".into()
        }
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .fetch_recent(5)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn console_over_http_keeps_newest_first() {
    let base = spawn_backend().await;
    let mut console = Console::new(Arc::new(client(&base)), 50, 500);

    console.submit("https://up.example");
    console.settle().await;
    console.submit("https://down.example");
    console.settle().await;

    let lines = console.log().lines();
    let urls: Vec<&str> = lines
        .iter()
        .filter_map(|l| match l {
            LogLine::Entry(e) => Some(e.url.as_str()),
            LogLine::Placeholder => None,
        })
        .collect();
    assert_eq!(urls, ["https://down.example", "https://up.example"]);

    // a reload shows the same order the backend keeps
    console.load_recent();
    console.settle().await;
    assert_eq!(console.log().lines(), lines);
}

#[test]
fn transport_rejects_bad_backend_urls() {
    for bad in ["not a url", "ftp://host", ""] {
        assert!(matches!(
            ReqwestTransport::new(bad, None),
            Err(ApiError::Validation(_))
        ));
    }
    let t = ReqwestTransport::new("http://127.0.0.1:8080/", None).unwrap();
    assert_eq!(t.base_url(), "http://127.0.0.1:8080");
}
