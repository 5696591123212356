//! HTTP access to the session-backed endpoints.
//!
//! Every call goes through [`Transport::fetch_json`], which attaches the ambient
//! session credential and maps failures onto [`FlowError`]. The flow controller
//! only ever sees this trait, so tests can script replies without a server.

pub mod api;
pub mod config;
pub mod errors;

pub use api::HttpTransport;
pub use config::{ClientConfig, DEFAULT_ORIGIN};
pub use errors::FlowError;
pub use reqwest::Method;

use async_trait::async_trait;
use serde_json::Value;

/// A credentialed JSON request/response channel to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request and resolve to the parsed JSON body.
    ///
    /// Single attempt: no retries, no caching.
    ///
    /// # Errors
    /// `FlowError::Http` for a non-2xx status, `FlowError::Network` when no
    /// response was obtained, `FlowError::InvalidBody` when a 2xx body is not JSON.
    async fn fetch_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, FlowError>;

    /// `GET path`
    ///
    /// # Errors
    /// See [`Transport::fetch_json`].
    async fn get_json(&self, path: &str) -> Result<Value, FlowError> {
        self.fetch_json(Method::GET, path, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    /// See [`Transport::fetch_json`].
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, FlowError> {
        self.fetch_json(Method::POST, path, Some(body)).await
    }
}
