//! Conversion of `reqwest` outcomes into the uniform
//! `{data, success, statusCode, headers}` shape.

use crate::config::ResponseFormat;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;


pub type Headers = BTreeMap<String, String>;

/// Key whose value replaces the whole body when present at the top level.
pub const RESULTS_KEY: &str = "results";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    pub data: Value,
    pub success: bool,
    pub status_code: u16,
    pub headers: Headers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered with a non-success status.
    Status,
    Timeout,
    Connect,
    Other,
}

/// A failed request in normalized form.
///
/// Failures without a response use the status code `0`, no headers, and the
/// transport's error description as `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{}", describe(.kind, .status_code, .data))]
pub struct NormalizedError {
    pub data: Value,
    pub success: bool,
    pub status_code: u16,
    pub headers: Headers,
    #[serde(skip)]
    pub kind: FailureKind,
}

impl NormalizedError {
    pub fn from_status(status_code: u16, headers: Headers, data: Value) -> NormalizedError {
        NormalizedError {
            data,
            success: false,
            status_code,
            headers,
            kind: FailureKind::Status,
        }
    }

    pub fn from_transport(error: &reqwest::Error) -> NormalizedError {
        NormalizedError {
            data: Value::String(error.to_string()),
            success: false,
            status_code: error.status().map(|status| status.as_u16()).unwrap_or(0),
            headers: Headers::new(),
            kind: transport_kind(error),
        }
    }

    /// The status line and headers arrived but reading the body failed.
    pub fn from_interrupted_body(
        status_code: u16,
        headers: Headers,
        error: &reqwest::Error,
    ) -> NormalizedError {
        NormalizedError {
            data: Value::String(error.to_string()),
            success: false,
            status_code,
            headers,
            kind: transport_kind(error),
        }
    }

    /// `false` for the sentinel status `0`.
    pub fn has_response(&self) -> bool {
        self.status_code != 0
    }
}

fn transport_kind(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::Connect
    } else {
        FailureKind::Other
    }
}

fn describe(kind: &FailureKind, status_code: &u16, data: &Value) -> String {
    match (kind, data) {
        (FailureKind::Status, _) => format!("Request failed with status code {}", status_code),
        (FailureKind::Timeout, _) => String::from("Request timed out"),
        (_, Value::String(message)) => message.clone(),
        (_, data) => data.to_string(),
    }
}

/// Replaces an object body by its `results` value, if it has one.
pub fn unwrap_results(data: Value) -> Value {
    match data {
        Value::Object(mut map) => match map.remove(RESULTS_KEY) {
            Some(results) => results,
            None => Value::Object(map),
        },
        data => data,
    }
}

pub fn decode_body(format: ResponseFormat, body: &[u8]) -> Value {
    let text = String::from_utf8_lossy(body);
    match format {
        ResponseFormat::Json if !text.is_empty() => {
            serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.into_owned()))
        }
        _ => Value::String(text.into_owned()),
    }
}

/// `true` only when the status text is exactly `OK`.
pub fn is_status_ok(status: StatusCode) -> bool {
    status.canonical_reason() == Some("OK")
}

/// Flattens a header map; repeated headers are joined with `", "`.
pub fn flatten_headers(headers: &HeaderMap) -> Headers {
    let mut flattened = Headers::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes());
        flattened
            .entry(name.to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    flattened
}

/// Reads the whole response and normalizes it. Non-2xx statuses become a
/// [`NormalizedError`] carrying the decoded body.
pub async fn normalize_response(
    response: reqwest::Response,
    format: ResponseFormat,
) -> Result<NormalizedResponse, NormalizedError> {
    let status = response.status();
    let headers = flatten_headers(response.headers());
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            return Err(NormalizedError::from_interrupted_body(
                status.as_u16(),
                headers,
                &e,
            ))
        }
    };
    let data = decode_body(format, &body);

    if status.is_success() {
        Ok(NormalizedResponse {
            data: unwrap_results(data),
            success: is_status_ok(status),
            status_code: status.as_u16(),
            headers,
        })
    } else {
        Err(NormalizedError::from_status(status.as_u16(), headers, data))
    }
}
