// # HTTP transport
//
// `reqwest` implementation of the single-request transport boundary. Every
// request carries the `x-auth-token` header and is bounded by the client
// timeout. Statuses are returned as-is; mapping happens in the client.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use zonesync_core::traits::{Method, Transport, TransportRequest, TransportResponse};
use zonesync_core::{Error, Result};

/// Header carrying the API secret key
pub const AUTH_HEADER: &str = "x-auth-token";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: String,
    /// NEVER log this value
    api_token: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("endpoint", &self.endpoint)
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

impl ReqwestTransport {
    /// Create a transport for `endpoint`
    ///
    /// Fails if the token is empty or the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Scaleway API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, request: TransportRequest) -> Result<TransportResponse> {
        let url = format!("{}{}", self.endpoint, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Patch => reqwest::Method::PATCH,
        };

        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(method, &url)
            .header(AUTH_HEADER, &self.api_token);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {}", e)))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!("{} {} -> {}", request.method, url, status);
        Ok(TransportResponse::new(status, body))
    }
}
