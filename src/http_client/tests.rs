use crate::config::{ClientConfig, ResponseFormat};
use crate::error::Error;
use crate::http_client::*;
use std::time::Duration;

#[test]
fn build_url_joins_base_and_path() {
    let client = RestClient::new("https://api.example.com").unwrap();

    assert_eq!("https://api.example.com/items", client.build_url("/items"));
    assert_eq!("https://api.example.com/items", client.build_url("items"));
}

#[test]
fn build_url_strips_slashes() {
    let client = RestClient::new("https://api.example.com/v1/").unwrap();

    assert_eq!(
        "https://api.example.com/v1/items/3",
        client.build_url("/items/3")
    );
}

#[test]
fn build_url_empty_path_keeps_base() {
    let client = RestClient::new("https://api.example.com/v1/").unwrap();

    assert_eq!("https://api.example.com/v1/", client.build_url(""));
}

#[test]
fn build_url_protocol_relative_uses_base_scheme() {
    let client = RestClient::new("https://api.example.com").unwrap();

    assert_eq!(
        "https://cdn.example.com/x",
        client.build_url("//cdn.example.com/x")
    );
}

#[test]
fn absolute_url_detection() {
    assert!(is_absolute("https://example.com"));
    assert!(is_absolute("git+ssh://example.com"));
    assert!(!is_absolute("/path?next=http://example.com"));
    assert!(!is_absolute("1http://example.com"));
    assert!(!is_absolute("relative/path"));
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = RestClient::new("not a url");

    assert!(matches!(result, Err(Error::InvalidBaseUrl { .. })));
}

#[test]
fn invalid_default_header_is_rejected() {
    let config = ClientConfig::new("https://api.example.com").with_header("bad header", "x");

    let result = RestClient::with_config(config);

    match result {
        Err(Error::InvalidHeader { name }) => assert_eq!("bad header", name),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn default_headers_include_cors_and_accept() {
    let headers = default_header_map(&ClientConfig::new("https://api.example.com")).unwrap();

    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["accept"], JSON_ACCEPT);
}

#[test]
fn text_format_sends_no_accept_header() {
    let config =
        ClientConfig::new("https://api.example.com").with_response_format(ResponseFormat::Text);

    let headers = default_header_map(&config).unwrap();

    assert!(!headers.contains_key("accept"));
}

#[test]
fn client_keeps_its_config() {
    let client = RestClient::new("https://api.example.com").unwrap();

    assert_eq!(Duration::from_millis(15000), client.config().timeout());
    assert_eq!("https://api.example.com", client.config().base_url());
}
