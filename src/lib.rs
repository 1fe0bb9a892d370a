//! A thin asynchronous REST client on top of `reqwest`.
//!
//! [`RestClient`] binds a base URL to a fixed [`ClientConfig`] and exposes
//! `get`, `post`, `put` and `delete`. `get` always converts its outcome into
//! a [`NormalizedResponse`] or [`NormalizedError`]; the other verbs do so only
//! when the client is configured with [`Normalization::AllVerbs`] and
//! otherwise hand back the `reqwest` response or error untouched.
//!
//! ```rust,no_run
//! use rest_client::RestClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::new("https://api.example.com")?;
//! let items = client.get("/items", None).await?;
//! println!("{} {}", items.status_code, items.data);
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
pub mod http_client;
pub mod normalize;
pub mod output;

pub use config::{ClientConfig, Normalization, RequestOptions, ResponseFormat};
pub use error::{Error, Rejection};
pub use http_client::{RestClient, RestResponse};
pub use normalize::{FailureKind, NormalizedError, NormalizedResponse};
