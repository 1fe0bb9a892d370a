use crate::common::{client, client_with, unused_port};
use httpmock::Method::GET;
use httpmock::MockServer;
use rest_client::{FailureKind, RequestOptions, ResponseFormat, RestClient};
use serde_json::json;
use std::time::Duration;

mod common;

#[tokio::test]
async fn get_sends_cors_header_to_joined_url() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/items")
                .header("access-control-allow-origin", "*");
            then.status(200).json_body(json!({"id": 1}));
        })
        .await;

    let client = client(&server);
    let response = client.get("/items", None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(Duration::from_millis(15000), client.config().timeout());
    assert_eq!(json!({"id": 1}), response.data);
    assert_eq!(200, response.status_code);
    assert!(response.success);
}

#[tokio::test]
async fn get_unwraps_results() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/items");
            then.status(200)
                .header("x-total", "2")
                .json_body(json!({"count": 2, "results": ["a", "b"]}));
        })
        .await;

    let client = RestClient::new(&server.url("/api/v1/")).unwrap();
    let response = client.get("items", None).await.unwrap();

    assert_eq!(json!(["a", "b"]), response.data);
    assert_eq!("2", response.headers["x-total"]);
}

#[tokio::test]
async fn success_requires_ok_status_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/created");
            then.status(201).body("done");
        })
        .await;

    let response = client(&server).get("/created", None).await.unwrap();

    assert!(!response.success);
    assert_eq!(201, response.status_code);
    assert_eq!(json!("done"), response.data);
}

#[tokio::test]
async fn get_status_error_is_normalized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404)
                .header("x-request-id", "abc")
                .json_body(json!({"results": [], "detail": "not found"}));
        })
        .await;

    let error = client(&server).get("/missing", None).await.unwrap_err();

    assert_eq!(404, error.status_code);
    assert!(!error.success);
    assert_eq!(FailureKind::Status, error.kind);
    assert_eq!("abc", error.headers["x-request-id"]);
    assert_eq!(json!({"results": [], "detail": "not found"}), error.data);
}

#[tokio::test]
async fn get_without_response_uses_sentinel_status() {
    let client = RestClient::new(&format!("http://127.0.0.1:{}", unused_port())).unwrap();

    let error = client.get("/items", None).await.unwrap_err();

    assert_eq!(0, error.status_code);
    assert!(!error.success);
    assert!(!error.has_response());
    assert!(error.headers.is_empty());
    assert_eq!(FailureKind::Connect, error.kind);
}

#[tokio::test]
async fn get_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500));
        })
        .await;

    let client = client_with(&server, |config| {
        config.with_timeout(Duration::from_millis(50))
    });
    let error = client.get("/slow", None).await.unwrap_err();

    assert_eq!(0, error.status_code);
    assert_eq!(FailureKind::Timeout, error.kind);
}

#[tokio::test]
async fn request_options_are_applied() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "rust")
                .query_param("page", "2")
                .header("x-api-key", "secret");
            then.status(200).json_body(json!([]));
        })
        .await;

    let options = RequestOptions::new()
        .query("q", "rust")
        .query("page", "2")
        .header("X-Api-Key", "secret");
    let response = client(&server).get("/search", Some(options)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(json!([]), response.data);
}

#[tokio::test]
async fn request_timeout_overrides_client_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500));
        })
        .await;

    let options = RequestOptions::new().timeout(Duration::from_millis(50));
    let error = client(&server).get("/slow", Some(options)).await.unwrap_err();

    assert_eq!(FailureKind::Timeout, error.kind);
}

#[tokio::test]
async fn text_format_keeps_body_as_string() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/raw");
            then.status(200).body(r#"{"results": [1]}"#);
        })
        .await;

    let client = client_with(&server, |config| {
        config.with_response_format(ResponseFormat::Text)
    });
    let response = client.get("/raw", None).await.unwrap();

    assert_eq!(json!(r#"{"results": [1]}"#), response.data);
}

#[tokio::test]
async fn concurrent_gets_are_independent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/first");
            then.status(200)
                .delay(Duration::from_millis(100))
                .json_body(json!({"results": "first"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/second");
            then.status(503).json_body(json!({"detail": "second"}));
        })
        .await;

    let client = client(&server);
    let (first, second) = tokio::join!(client.get("/first", None), client.get("/second", None));

    let first = first.unwrap();
    assert_eq!(json!("first"), first.data);
    assert_eq!(200, first.status_code);

    let second = second.unwrap_err();
    assert_eq!(json!({"detail": "second"}), second.data);
    assert_eq!(503, second.status_code);
}
