// tests/http_executor.rs
//! Retry behaviour of the shared HTTP executor against a live mock server.

use content_relay::config::ApiConfig;
use content_relay::error::{AppError, Service};
use content_relay::{HttpExecutor, RetryPolicy};
use indexmap::IndexMap;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor(uri: &str, attempts: u32) -> HttpExecutor {
    let mut headers = IndexMap::new();
    headers.insert("x-test-client".to_string(), "content-relay".to_string());
    let retry = RetryPolicy::new(attempts, Duration::from_millis(10)).unwrap();
    let config = ApiConfig::new(uri, headers, retry, Duration::from_secs(5)).unwrap();
    HttpExecutor::new(Service::Notion, config).unwrap()
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("x-test-client", "content-relay"))
        .and(body_json(json!({ "name": "widget" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "item-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let value = executor(&server.uri(), 3)
        .execute(Method::POST, "/items", Some(&json!({ "name": "widget" })))
        .await
        .unwrap();

    assert_eq!(value, json!({ "id": "item-1" }));
}

#[tokio::test]
async fn exhaustion_returns_the_last_error_without_extra_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(3)
        .mount(&server)
        .await;

    let err = executor(&server.uri(), 3)
        .execute(Method::GET, "/items/1", None)
        .await
        .unwrap_err();

    match err {
        AppError::HttpStatus {
            service,
            status,
            body,
            ..
        } => {
            assert_eq!(service, Service::Notion);
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn client_errors_are_retried_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let err = executor(&server.uri(), 2)
        .execute(Method::GET, "/missing", None)
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let value = executor(&server.uri(), 3)
        .execute(Method::DELETE, "/items/1", None)
        .await
        .unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn malformed_success_body_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = executor(&server.uri(), 3)
        .execute(Method::GET, "/items", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Parse { service: Service::Notion, .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Nothing listens on the discard port.
    let err = executor("http://127.0.0.1:9", 2)
        .execute(Method::GET, "/items", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
    assert!(err.is_retryable());
}
