//! Raw HTTP exchange
//!
//! [`Transport`] is the seam between the resilient channel and the network.
//! It performs exactly one exchange: no retries, no envelope handling, no
//! classification. A response of any status is `Ok`; `Err` means no
//! response was received at all.

mod network;
mod mock;

pub use self::network::ReqwestTransport;
pub use self::mock::ScriptedTransport;

use async_trait::async_trait;
use http::{Method, StatusCode};
use reqwest::Url;
use serde::Serialize;
use thiserror::Error;

use crate::error::{ClientError, ClientResult};

/// One logical request, before auth and URL resolution
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Attach the session bearer token when one is stored
    pub authenticated: bool,
}

impl RequestSpec {
    /// Create a request for a static path such as `/menu` or `/auth/login`
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            body: None,
            authenticated: true,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one dynamic path segment; it is percent-encoded as a whole
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Never attach a bearer token
    pub fn public(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Display path, unencoded (for logs)
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Resolve against the service base URL
    pub fn url(&self, base_url: &str) -> ClientResult<Url> {
        let mut url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {base_url}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("base URL cannot carry a path: {base_url}")))?
            .pop_if_empty()
            .extend(self.segments.iter());
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

/// A request ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl PreparedRequest {
    /// `Authorization` header value, if a token is attached
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Status and body of a received response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Why an exchange produced no usable response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// Response received with a non-2xx status
    #[error("HTTP {status}")]
    Status { status: StatusCode, body: String },

    /// No response within the request timeout
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established or the request could not be sent
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other client-side failure
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportFailure {
    /// Status code, when a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body, when a response was received
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

impl From<RawResponse> for TransportFailure {
    fn from(response: RawResponse) -> Self {
        Self::Status {
            status: response.status,
            body: response.body,
        }
    }
}

/// Performs one HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_keeps_base_path() {
        let spec = RequestSpec::get("/menu");
        let url = spec.url("http://localhost:3001/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/menu");

        let url = spec.url("http://localhost:3001/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/menu");
    }

    #[test]
    fn test_url_encodes_segments_and_query() {
        let spec = RequestSpec::get("/order")
            .segment("BK 12/A")
            .query("dietaryRestrictions", "gluten-free,halal & kosher");
        let url = spec.url("http://localhost:3001/api").unwrap();
        assert_eq!(url.path(), "/api/order/BK%2012%2FA");
        assert_eq!(
            url.query(),
            Some("dietaryRestrictions=gluten-free%2Chalal+%26+kosher")
        );
        assert_eq!(spec.path(), "/order/BK 12/A");
    }

    #[test]
    fn test_url_rejects_bad_base() {
        let err = RequestSpec::get("/menu").url("not a url").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_authenticated_by_default() {
        assert!(RequestSpec::get("/menu").authenticated);
        assert!(!RequestSpec::post("/auth/login").public().authenticated);
    }

    #[test]
    fn test_status_failure_from_response() {
        let failure = TransportFailure::from(RawResponse::new(StatusCode::BAD_GATEWAY, "oops"));
        assert_eq!(failure.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(failure.body(), Some("oops"));
        assert_eq!(TransportFailure::Timeout.status(), None);
    }
}
