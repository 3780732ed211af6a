//! Error category classification

use serde::{Deserialize, Serialize};

/// Where in the request lifecycle an error originated
///
/// - Transport: the exchange itself failed (status, timeout, connectivity)
/// - Service: the exchange succeeded but the envelope was a failure or unreadable
/// - Local: raised on the client before or instead of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Transport,
    Service,
    Local,
}

impl ErrorCategory {
    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Service => "service",
            Self::Local => "local",
        }
    }
}
