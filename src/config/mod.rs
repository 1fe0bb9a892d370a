use crate::error::Error;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;


pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

pub const CORS_HEADER: &str = "Access-Control-Allow-Origin";

/// How response bodies are decoded before they reach `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Decode as JSON, keeping the text as a string when it is not JSON.
    Json,
    Text,
}

impl Default for ResponseFormat {
    fn default() -> Self {
        ResponseFormat::Json
    }
}

/// Which verbs convert their outcome into the normalized shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Normalization {
    /// Only `get` normalizes; `post`, `put` and `delete` return what
    /// `reqwest` produced.
    Legacy,
    AllVerbs,
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::Legacy
    }
}

/// Transport options fixed for the lifetime of a [`RestClient`](crate::RestClient).
///
/// The `with_*` methods consume the config, so a config can no longer change
/// once it has been handed to a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    base_url: String,
    #[serde(default = "default_proxy_disabled")]
    proxy_disabled: bool,
    #[serde(default)]
    response_format: ResponseFormat,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
    #[serde(default = "default_headers")]
    default_headers: BTreeMap<String, String>,
    #[serde(default)]
    normalization: Normalization,
}

fn default_proxy_disabled() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(String::from(CORS_HEADER), String::from("*"));
    headers
}

impl ClientConfig {
    pub fn new(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: String::from(base_url),
            proxy_disabled: default_proxy_disabled(),
            response_format: ResponseFormat::default(),
            timeout_ms: default_timeout_ms(),
            default_headers: default_headers(),
            normalization: Normalization::default(),
        }
    }

    /// Reads a JSON object such as
    /// `{"baseUrl": "https://api.example.com", "timeoutMs": 5000}`.
    pub fn from_json_file(path: &Path) -> Result<ClientConfig, Error> {
        let contents = read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = String::from(base_url);
        self
    }

    pub fn with_proxy_disabled(mut self, proxy_disabled: bool) -> Self {
        self.proxy_disabled = proxy_disabled;
        self
    }

    pub fn with_response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = response_format;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers
            .insert(String::from(name), String::from(value));
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn proxy_disabled(&self) -> bool {
        self.proxy_disabled
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }
}

/// Per-request additions on top of the client's [`ClientConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> RequestOptions {
        RequestOptions::default()
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((String::from(name), String::from(value)));
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((String::from(key), String::from(value)));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
