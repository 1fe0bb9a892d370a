use crate::config::{ClientConfig, Normalization, RequestOptions, ResponseFormat};
use crate::error::{Error, Rejection};
use crate::normalize::{normalize_response, NormalizedError, NormalizedResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;
use url::Url;

#[cfg(test)]
mod tests;

/// Accept header sent when bodies are decoded as JSON and none was configured.
const JSON_ACCEPT: &str = "application/json, text/plain, */*";

/// Success value of `post`, `put` and `delete`.
#[derive(Debug)]
pub enum RestResponse {
    Normalized(NormalizedResponse),
    /// The `reqwest` response, body unread.
    Raw(Response),
}

impl RestResponse {
    pub fn status_code(&self) -> u16 {
        match self {
            RestResponse::Normalized(response) => response.status_code,
            RestResponse::Raw(response) => response.status().as_u16(),
        }
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, RestResponse::Normalized(_))
    }
}

/// A REST client bound to one base URL.
///
/// Cloning is cheap and the clones share the underlying connection pool, so
/// one instance can serve any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    config: ClientConfig,
}

impl RestClient {
    /// Builds a client with the default configuration: 15 second timeout,
    /// JSON bodies, no proxy and `Access-Control-Allow-Origin: *` on every
    /// request.
    pub fn new(base_url: &str) -> Result<RestClient, Error> {
        RestClient::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<RestClient, Error> {
        Url::parse(config.base_url()).map_err(|source| Error::InvalidBaseUrl {
            url: String::from(config.base_url()),
            source,
        })?;

        let mut builder = Client::builder()
            .timeout(config.timeout())
            .default_headers(default_header_map(&config)?);
        if config.proxy_disabled() {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(Error::Client)?;

        Ok(RestClient { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues a GET and always normalizes the outcome. `data` holds the
    /// top-level `results` value when the body has one.
    pub async fn get(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> Result<NormalizedResponse, NormalizedError> {
        let request = self.request(Method::GET, url, options);
        self.send_normalized(request).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        options: Option<RequestOptions>,
    ) -> Result<RestResponse, Rejection> {
        let request = self.request(Method::POST, url, options).json(body);
        self.dispatch(request).await
    }

    pub async fn put<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        options: Option<RequestOptions>,
    ) -> Result<RestResponse, Rejection> {
        let request = self.request(Method::PUT, url, options).json(body);
        self.dispatch(request).await
    }

    pub async fn delete(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> Result<RestResponse, Rejection> {
        let request = self.request(Method::DELETE, url, options);
        self.dispatch(request).await
    }

    /// Resolves `url` against the base URL. Absolute and protocol-relative
    /// URLs pass through; an empty `url` yields the base unchanged.
    fn build_url(&self, url: &str) -> String {
        let base = self.config.base_url();
        if url.is_empty() {
            return String::from(base);
        }
        if url.starts_with("//") {
            let scheme = base.split(':').next().unwrap_or("http");
            return format!("{}:{}", scheme, url);
        }
        if is_absolute(url) {
            return String::from(url);
        }
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, url: &str, options: Option<RequestOptions>) -> RequestBuilder {
        let url = self.build_url(url);
        debug!(method = %method, url = %url, "sending request");

        let mut request = self.client.request(method, &url);
        if let Some(RequestOptions {
            headers,
            query,
            timeout,
        }) = options
        {
            for (name, value) in headers {
                request = request.header(name, value);
            }
            if !query.is_empty() {
                request = request.query(&query);
            }
            if let Some(timeout) = timeout {
                request = request.timeout(timeout);
            }
        }
        request
    }

    async fn send_normalized(
        &self,
        request: RequestBuilder,
    ) -> Result<NormalizedResponse, NormalizedError> {
        let response = request.send().await.map_err(|e| {
            debug!(error = %e, "request failed without a response");
            NormalizedError::from_transport(&e)
        })?;
        debug!(status = response.status().as_u16(), "received response");
        normalize_response(response, self.config.response_format()).await
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<RestResponse, Rejection> {
        match self.config.normalization() {
            Normalization::AllVerbs => {
                let response = self.send_normalized(request).await?;
                Ok(RestResponse::Normalized(response))
            }
            Normalization::Legacy => {
                let response = request.send().await.map_err(|e| {
                    debug!(error = %e, "request failed without a response");
                    e
                })?;
                debug!(status = response.status().as_u16(), "received response");
                if response.status().is_success() {
                    Ok(RestResponse::Raw(response))
                } else {
                    Err(Rejection::Status(response))
                }
            }
        }
    }
}

fn default_header_map(config: &ClientConfig) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    for (name, value) in config.default_headers() {
        let invalid = || Error::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::try_from(name.as_str()).map_err(|_| invalid())?;
        let header_value = HeaderValue::try_from(value.as_str()).map_err(|_| invalid())?;
        headers.insert(header_name, header_value);
    }
    if config.response_format() == ResponseFormat::Json && !headers.contains_key(ACCEPT) {
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_ACCEPT));
    }
    Ok(headers)
}

/// `scheme://...` where the scheme is a letter followed by letters, digits,
/// `+`, `-` or `.`.
fn is_absolute(url: &str) -> bool {
    let scheme = match url.find("://") {
        Some(end) => &url[..end],
        None => return false,
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        _ => false,
    }
}
