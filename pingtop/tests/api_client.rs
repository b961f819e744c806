//! API client behaviour over a scripted transport.
mod common;

use common::{ok, reply, FakeTransport};
use pingtop::api::{ApiClient, Method, LEGACY_CHECK_PATH};
use pingtop::{ApiError, ProbeApi};
use serde_json::json;

const STATUT: &str = r#"{"statut":{"url":"https://example.com","est_disponible":true,"code_http":200,"message_erreur":"","latence_ms":120,"verifie_a":"2025-10-01T12:00:00Z"}}"#;

#[tokio::test]
async fn invalid_url_never_reaches_the_network() {
    let client = ApiClient::new(FakeTransport::default());
    for bad in ["not-a-url", "", "   ", "ftp://example.com", "example.com", "http:/x"] {
        let err = client.submit_check(bad).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)), "{bad:?} -> {err:?}");
    }
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn scheme_check_is_case_insensitive_and_input_trimmed() {
    let client = ApiClient::new(FakeTransport::with_replies(vec![ok(STATUT), ok(STATUT)]));
    client.submit_check("HTTPS://Example.com").await.unwrap();
    client.submit_check("  http://example.com  ").await.unwrap();

    let req = client.transport().last_request().unwrap();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.path, "/api/verifier");
    assert_eq!(req.body, Some(json!({ "url": "http://example.com" })));
}

#[tokio::test]
async fn submit_extracts_statut() {
    let client = ApiClient::new(FakeTransport::with_replies(vec![ok(STATUT)]));
    let r = client.submit_check("https://example.com").await.unwrap();
    assert_eq!(r.url, "https://example.com");
    assert!(r.is_available);
    assert_eq!(r.http_code, Some(200));
    assert_eq!(r.latency_ms, Some(120.0));
    assert_eq!(r.error_detail(), None);
}

#[tokio::test]
async fn submit_without_statut_is_an_invalid_response() {
    let client = ApiClient::new(FakeTransport::with_replies(vec![
        ok(r#"{"ok":true}"#),
        ok(r#"{"statut":null}"#),
        ok(r#"{"statut":{"url":5}}"#),
    ]));
    for _ in 0..3 {
        let err = client.submit_check("https://example.com").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)), "{err:?}");
    }
}

#[tokio::test]
async fn legacy_check_path_is_honoured() {
    let client = ApiClient::with_check_path(
        FakeTransport::with_replies(vec![ok(STATUT)]),
        LEGACY_CHECK_PATH,
    );
    client.submit_check("https://example.com").await.unwrap();
    assert_eq!(client.transport().last_request().unwrap().path, "/api/check");
}

#[tokio::test]
async fn error_message_priority() {
    let client = ApiClient::new(FakeTransport::with_replies(vec![
        reply(500, r#"{"error":"boom","message":"ignored"}"#),
        reply(400, r#"{"message":"bad body"}"#),
        reply(404, r#"{"error":""}"#),
        reply(400, "Corps invalide"),
        reply(503, ""),
    ]));
    let mut got = Vec::new();
    for _ in 0..5 {
        got.push(client.submit_check("https://example.com").await.unwrap_err());
    }
    assert_eq!(
        got,
        vec![
            ApiError::Api { status: 500, message: "boom".into() },
            ApiError::Api { status: 400, message: "bad body".into() },
            ApiError::Api { status: 404, message: "HTTP 404".into() },
            ApiError::Api { status: 400, message: "HTTP 400".into() },
            ApiError::Api { status: 503, message: "HTTP 503".into() },
        ]
    );
    assert_eq!(got[0].to_string(), "boom");
    assert_eq!(got[0].status(), Some(500));
}

#[tokio::test]
async fn transport_and_body_failures_are_network_errors() {
    let client = ApiClient::new(FakeTransport::with_replies(vec![
        Err(ApiError::Network("connection refused".into())),
        ok("<html>not json</html>"),
    ]));
    for _ in 0..2 {
        let err = client.submit_check("https://example.com").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "{err:?}");
        assert!(err.to_string().starts_with("network error"));
    }
}

#[tokio::test]
async fn fetch_recent_accepts_both_shapes() {
    let item = r#"{"url":"https://a","est_disponible":true,"latence_ms":1}"#;
    let client = ApiClient::new(FakeTransport::with_replies(vec![
        ok(&format!("[{item},{item}]")),
        ok(&format!(r#"{{"resultats":[{item}]}}"#)),
        ok(r#"{"resultats":null}"#),
        ok(r#"{"other":1}"#),
        ok("[]"),
        ok("42"),
    ]));
    let mut lens = Vec::new();
    for _ in 0..6 {
        lens.push(client.fetch_recent(50).await.unwrap().len());
    }
    assert_eq!(lens, [2, 1, 0, 0, 0, 0]);
}

#[tokio::test]
async fn fetch_recent_skips_unreadable_rows() {
    let good = r#"{"url":"https://a","est_disponible":true,"latence_ms":1}"#;
    let down = r#"{"url":"https://c","est_disponible":false,"message_erreur":"timeout"}"#;
    let bad = r#"{"url":"https://b","est_disponible":null}"#;
    let client = ApiClient::new(FakeTransport::with_replies(vec![
        ok(&format!(r#"{{"resultats":[{good},{down},{bad}]}}"#)),
        ok(&format!("[{bad},{good}]")),
    ]));

    let page = client.fetch_recent(50).await.unwrap();
    let urls: Vec<&str> = page.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, ["https://a", "https://c"]);

    let page = client.fetch_recent(50).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn fetch_recent_with_only_unreadable_rows_is_an_invalid_response() {
    let bad = r#"{"url":"https://b","est_disponible":null}"#;
    let client = ApiClient::new(FakeTransport::with_replies(vec![ok(&format!(
        r#"{{"resultats":[{bad},{{"url":7}}]}}"#
    ))]));
    let err = client.fetch_recent(50).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn fetch_recent_sends_limit() {
    let client = ApiClient::new(FakeTransport::with_replies(vec![ok("[]"), ok("[]")]));
    client.fetch_recent(7).await.unwrap();
    let req = client.transport().last_request().unwrap();
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.path, "/api/resultats");
    assert_eq!(req.query, vec![("limit".to_string(), "7".to_string())]);

    client.fetch_recent(0).await.unwrap();
    let req = client.transport().last_request().unwrap();
    assert_eq!(req.query, vec![("limit".to_string(), "1".to_string())]);
}

#[tokio::test]
async fn clear_all_and_health() {
    let client = ApiClient::new(FakeTransport::with_replies(vec![
        ok(r#"{"ok":true}"#),
        reply(500, r#"{"error":"disk full"}"#),
        ok("OK"),
    ]));
    client.clear_all().await.unwrap();
    assert_eq!(client.transport().last_request().unwrap().method, Method::Delete);

    let err = client.clear_all().await.unwrap_err();
    assert_eq!(err.to_string(), "disk full");

    client.health().await.unwrap();
    assert_eq!(client.transport().last_request().unwrap().path, "/api/etat");
}
