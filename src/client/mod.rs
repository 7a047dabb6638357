//! HTTP client for the features resource.
//!
//! [`FeatureClient`] carries its base URL as a field; every request path is
//! `{base_url}/features[/{id}]`. All five operations go through one request
//! helper that issues a single attempt, checks the status and decodes JSON.

pub mod features;
pub mod operation;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{FeatureError, RequestFailure, Result};

pub use features::ListParams;
pub use operation::Operation;

/// Path segment of the features resource
pub const FEATURES_PATH: &str = "features";

/// Client for the features API
#[derive(Debug, Clone)]
pub struct FeatureClient {
    /// Base URL, e.g. `http://localhost:8000`
    base_url: Url,

    /// Pooled HTTP client
    http: reqwest::Client,
}

impl FeatureClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client that sends through a preconfigured `reqwest::Client`
    pub fn with_http_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url.as_ref())?,
            http,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FeatureError::config(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_http_client(&config.base_url, http)
    }

    /// Base URL requests are built on
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base_url}/features/{segments...}?{query}`
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| FeatureError::invalid_url(self.base_url.as_str()))?
            .pop_if_empty()
            .push(FEATURES_PATH)
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Issue one request and decode the JSON response.
    ///
    /// A body, when present, is sent as JSON with `Content-Type: application/json`.
    /// Any failure (transport, non-success status, undecodable body) is logged
    /// and returned as [`FeatureError::Request`] carrying the operation's message.
    async fn request<B, T>(
        &self,
        operation: Operation,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, query)?;
        debug!(operation = %operation, method = %method, url = %url, "Sending request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| operation.fail(RequestFailure::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(operation.fail(RequestFailure::Status(status)));
        }

        debug!(operation = %operation, status = %status, "Request succeeded");

        response
            .json::<T>()
            .await
            .map_err(|e| operation.fail(RequestFailure::Decode(e)))
    }
}

impl Default for FeatureClient {
    fn default() -> Self {
        Self {
            base_url: Url::parse(crate::DEFAULT_BASE_URL)
                .expect("DEFAULT_BASE_URL is a valid absolute URL"),
            http: reqwest::Client::new(),
        }
    }
}

/// Parse a base URL, rejecting ones that cannot carry path segments
fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| FeatureError::invalid_url(format!("{}: {}", raw, e)))?;

    if url.cannot_be_a_base() {
        return Err(FeatureError::invalid_url(format!(
            "{}: cannot be used as a base",
            raw
        )));
    }

    Ok(url)
}
