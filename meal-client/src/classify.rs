//! Failure classification
//!
//! Maps a [`TransportFailure`] to an [`ErrorKind`], a display message and a
//! retry flag. The mapping is an ordered table: the first rule whose
//! predicate matches wins, and a failure no rule matches is `Unknown`.
//!
//! | order | predicate                  | kind          | retryable |
//! |-------|----------------------------|---------------|-----------|
//! | 1     | status 401                 | Unauthorized  | no        |
//! | 2     | status 403                 | Forbidden     | no        |
//! | 3     | status 404                 | NotFound      | no        |
//! | 4     | status >= 500              | ServerError   | yes       |
//! | 5     | timed out                  | Timeout       | yes       |
//! | 6     | no response (connect/send) | NetworkError  | yes       |
//! | -     | anything else              | Unknown       | no        |
//!
//! Classification is pure; it never logs and never touches the session.

use http::StatusCode;
use serde::Deserialize;
use shared::ErrorKind;
use std::fmt;

use crate::transport::TransportFailure;

/// Outcome of classifying one failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    /// Display message (server-provided when available)
    pub message: String,
    pub retryable: bool,
    /// Raw diagnostic for logs and the failure observer, never for display
    pub detail: String,
    pub status: Option<StatusCode>,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClassifiedError {}

type Predicate = fn(&TransportFailure) -> bool;

struct Rule {
    kind: ErrorKind,
    matches: Predicate,
}

fn is_unauthorized(failure: &TransportFailure) -> bool {
    failure.status() == Some(StatusCode::UNAUTHORIZED)
}

fn is_forbidden(failure: &TransportFailure) -> bool {
    failure.status() == Some(StatusCode::FORBIDDEN)
}

fn is_not_found(failure: &TransportFailure) -> bool {
    failure.status() == Some(StatusCode::NOT_FOUND)
}

fn is_server_error(failure: &TransportFailure) -> bool {
    failure.status().is_some_and(|s| s.as_u16() >= 500)
}

fn is_timeout(failure: &TransportFailure) -> bool {
    matches!(failure, TransportFailure::Timeout)
}

fn is_network_error(failure: &TransportFailure) -> bool {
    matches!(failure, TransportFailure::Connect(_))
}

const RULES: &[Rule] = &[
    Rule { kind: ErrorKind::Unauthorized, matches: is_unauthorized },
    Rule { kind: ErrorKind::Forbidden, matches: is_forbidden },
    Rule { kind: ErrorKind::NotFound, matches: is_not_found },
    Rule { kind: ErrorKind::ServerError, matches: is_server_error },
    Rule { kind: ErrorKind::Timeout, matches: is_timeout },
    Rule { kind: ErrorKind::NetworkError, matches: is_network_error },
];

/// Structured fields a failing response body may carry
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Kind for a failure, by the first matching rule
pub fn classify_kind(failure: &TransportFailure) -> ErrorKind {
    RULES
        .iter()
        .find(|rule| (rule.matches)(failure))
        .map(|rule| rule.kind)
        .unwrap_or(ErrorKind::Unknown)
}

/// Message carried by a structured response body: `message` first, then `error`
pub fn body_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    [parsed.message, parsed.error]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

/// Classify a failure
pub fn classify(failure: &TransportFailure) -> ClassifiedError {
    let kind = classify_kind(failure);
    let message = failure
        .body()
        .and_then(body_message)
        .unwrap_or_else(|| kind.default_message().to_string());

    let detail = match failure.body() {
        Some(body) if !body.is_empty() => format!("{failure}: {body}"),
        _ => failure.to_string(),
    };

    ClassifiedError {
        kind,
        message,
        retryable: kind.is_retryable(),
        detail,
        status: failure.status(),
    }
}
