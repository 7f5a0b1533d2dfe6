//! Integration tests for the logs client against a local stub backend.

use std::path::Path;
use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;

use maillog::client::LogsClient;
use maillog::config::ApiConfig;
use maillog::error::MaillogError;
use maillog::filter::LogFilter;
use maillog::model::log::Log;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Backend answering `/logs` with a fixed status and body.
async fn backend(status: StatusCode, body: String) -> String {
    let router = Router::new().route(
        "/logs",
        get(move || {
            let body = body.clone();
            async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }
        }),
    );
    serve(router).await
}

// ─── Success paths ──────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_returns_all_records_in_backend_order() {
    let base = backend(StatusCode::OK, fixture("logs.json")).await;
    let logs = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap();

    let ids: Vec<i64> = logs.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![3, 1, 2], "order must match the backend response");
}

#[tokio::test]
async fn test_fields_are_mapped_as_received() {
    let base = backend(StatusCode::OK, fixture("logs.json")).await;
    let logs = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap();

    let first = &logs[0];
    assert_eq!(first.subject, "Circolare n. 45 - Sciopero del 3 ottobre");
    assert_eq!(first.sender, "Segreteria Didattica <segreteria@scuola.it>");
    assert_eq!(first.received_at, "2024-10-01T09:30:00.123456+02:00");
    assert!(first.processed);
    assert_eq!(first.attachment_list()[0].filename, "circolare45.pdf");
    assert_eq!(
        first.summary_for("circolare45.pdf").unwrap().text,
        "Sciopero del personale il 3 ottobre: possibili disagi."
    );

    // Monitor-style `{"file": ...}` attachments without content
    let third = &logs[2];
    assert_eq!(third.attachment_count(), 2);
    assert_eq!(third.attachment_list()[1].filename, "programma.jpg");
    assert!(third.summary.is_none());
}

#[tokio::test]
async fn test_missing_attachments_is_none() {
    let base = backend(StatusCode::OK, fixture("logs.json")).await;
    let logs = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap();

    let second = &logs[1];
    assert_eq!(second.id, 1);
    assert!(second.attachments.is_none());
    assert!(second.summary.is_none());
}

#[tokio::test]
async fn test_empty_array_gives_empty_list() {
    let base = backend(StatusCode::OK, "[]".to_string()).await;
    let logs = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_accept_header_is_sent() {
    let router = Router::new().route(
        "/logs",
        get(|headers: HeaderMap| async move {
            match headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) {
                Some("application/json") => (StatusCode::OK, "[]"),
                _ => (StatusCode::NOT_ACCEPTABLE, "json only"),
            }
        }),
    );
    let base = serve(router).await;
    let logs = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_fetch_log_by_id() {
    let base = backend(StatusCode::OK, fixture("logs.json")).await;
    let client = LogsClient::new(&base).unwrap();

    let log = client.fetch_log(2).await.unwrap();
    assert_eq!(log.subject, "Uscita didattica");

    let err = client.fetch_log(99).await.unwrap_err();
    assert!(matches!(err, MaillogError::LogNotFound(99)));
}

#[tokio::test]
async fn test_filter_over_fetched_logs() {
    let base = backend(StatusCode::OK, fixture("logs.json")).await;
    let logs = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap();

    let pending: Vec<i64> = LogFilter::unprocessed()
        .apply(&logs)
        .iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(pending, vec![1, 2]);
}

#[tokio::test]
async fn test_from_config_sends_user_agent() {
    let router = Router::new().route(
        "/logs",
        get(|headers: HeaderMap| async move {
            match headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
                Some("maillog-test/1.0") => (StatusCode::OK, "[]"),
                _ => (StatusCode::BAD_REQUEST, "unexpected user agent"),
            }
        }),
    );
    let base = serve(router).await;
    let api = ApiConfig {
        base_url: base,
        user_agent: "maillog-test/1.0".to_string(),
        ..ApiConfig::default()
    };

    let logs = LogsClient::from_config(&api).unwrap().fetch_logs().await.unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_shared_http_client_serves_two_backends() {
    let first = backend(StatusCode::OK, fixture("logs.json")).await;
    let second = backend(StatusCode::OK, "[]".to_string()).await;

    let http = reqwest::Client::new();
    let a = LogsClient::with_http_client(http.clone(), &first).unwrap();
    let b = LogsClient::with_http_client(http, &format!("{second}/")).unwrap();

    assert_eq!(a.fetch_logs().await.unwrap().len(), 3);
    assert!(b.fetch_logs().await.unwrap().is_empty());
    assert_eq!(b.logs_url(), format!("{second}/logs"));
}

// ─── Failure paths ──────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_fails() {
    let base = backend(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()).await;
    let err = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap_err();

    match err {
        MaillogError::Status { status, body, url } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
            assert!(url.ends_with("/logs"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_route_fails() {
    let base = serve(Router::new()).await;
    let err = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap_err();
    assert!(matches!(err, MaillogError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_json_fails() {
    let base = backend(StatusCode::OK, r#"[{"id": "not a number"}]"#.to_string()).await;
    let err = LogsClient::new(&base).unwrap().fetch_logs().await.unwrap_err();
    assert!(matches!(err, MaillogError::Decode { .. }));
    assert!(err.is_backend_error());
}

#[tokio::test]
async fn test_unreachable_backend_fails() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = LogsClient::new(&format!("http://{addr}"))
        .unwrap()
        .fetch_logs()
        .await
        .unwrap_err();
    assert!(matches!(err, MaillogError::Http { .. }));
}

#[tokio::test]
async fn test_from_config_timeout_fails_slow_backend() {
    let router = Router::new().route(
        "/logs",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "[]"
        }),
    );
    let base = serve(router).await;
    let api = ApiConfig {
        base_url: base,
        timeout_secs: Some(1),
        ..ApiConfig::default()
    };

    let err = LogsClient::from_config(&api)
        .unwrap()
        .fetch_logs()
        .await
        .unwrap_err();
    match err {
        MaillogError::Http { source, .. } => assert!(source.is_timeout()),
        other => panic!("expected Http timeout, got {other:?}"),
    }
}

// ─── Round trip ─────────────────────────────────────────────────────

#[test]
fn test_fixture_roundtrip() {
    let logs: Vec<Log> = serde_json::from_str(&fixture("logs.json")).unwrap();
    let json = serde_json::to_string(&logs).unwrap();
    let back: Vec<Log> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, logs);
}
