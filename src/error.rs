use crate::normalize::NormalizedError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a [`RestClient`](crate::RestClient) or its
/// configuration. Request failures are reported through [`Rejection`] or
/// [`NormalizedError`] instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("Could not build the http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Could not parse the configuration file - {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not read the configuration file - {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure value of `post`, `put` and `delete`.
///
/// Which variant is produced depends on the client's
/// [`Normalization`](crate::Normalization) mode: in legacy mode the
/// `reqwest` response or error is handed back untouched.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error(transparent)]
    Normalized(NormalizedError),

    /// The server answered with a non-2xx status. The response is handed
    /// back unread so its body and headers stay reachable.
    #[error("Request failed with status code {}", status_of(.0))]
    Status(reqwest::Response),

    /// No response was received.
    #[error(transparent)]
    Raw(reqwest::Error),
}

impl Rejection {
    /// Status code carried by the failure. A raw error that never got a
    /// response has none; a normalized one reports the sentinel `0`.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Rejection::Normalized(error) => Some(error.status_code),
            Rejection::Status(response) => Some(response.status().as_u16()),
            Rejection::Raw(error) => error.status().map(|status| status.as_u16()),
        }
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, Rejection::Normalized(_))
    }
}

fn status_of(response: &reqwest::Response) -> u16 {
    response.status().as_u16()
}

impl From<NormalizedError> for Rejection {
    fn from(error: NormalizedError) -> Self {
        Rejection::Normalized(error)
    }
}

impl From<reqwest::Error> for Rejection {
    fn from(error: reqwest::Error) -> Self {
        Rejection::Raw(error)
    }
}
