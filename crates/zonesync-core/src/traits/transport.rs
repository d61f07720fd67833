// # Transport Trait
//
// The HTTP boundary. A transport performs exactly one request per call and
// hands back the raw status and JSON body; it never retries and never
// interprets statuses. Status mapping happens in
// [`TransportResponse::into_json`].

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};

/// HTTP methods used by the providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Path relative to the API endpoint, starting with `/`
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl TransportRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response: status plus JSON body (`Value::Null` when empty, a string
/// when the body is not JSON)
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a 2xx response, or the mapped API error
    pub fn into_json(self) -> Result<Value> {
        if self.is_success() {
            return Ok(self.body);
        }

        let message = match &self.body {
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| self.body.to_string()),
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Err(Error::from_status(self.status, message))
    }
}

/// Trait for HTTP transports
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform `request`. Only failures to obtain a response are errors.
    async fn request(&self, request: TransportRequest) -> Result<TransportResponse>;
}
