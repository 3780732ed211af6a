//! Error kinds surfaced by the meal ordering client

use super::category::ErrorCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every failure the ordering client can surface to a caller.
///
/// Transport kinds come out of response classification, local kinds are
/// raised by cart and order preconditions before anything touches the
/// network, and service kinds describe an envelope the server sent back
/// but that could not be turned into a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // ==================== Transport ====================
    /// HTTP 401
    Unauthorized,
    /// HTTP 403
    Forbidden,
    /// HTTP 404
    NotFound,
    /// HTTP 5xx
    ServerError,
    /// No response within the request timeout
    Timeout,
    /// No response at all (connect/send failure)
    NetworkError,
    /// Anything the classification table does not recognise
    Unknown,

    // ==================== Service ====================
    /// Envelope came back with `success: false`
    Rejected,
    /// Body could not be decoded as the expected envelope/payload
    InvalidResponse,

    // ==================== Local ====================
    /// Order submitted with no cart lines
    EmptyCart,
    /// Order submitted without a meal slot
    NoSlotSelected,
    /// Selected meal slot is locked, upcoming or unknown
    SlotUnavailable,
    /// Quantity was zero or negative
    InvalidQuantity,
    /// Caller abandoned the request
    Cancelled,
    /// Client misconfiguration (bad base URL, HTTP client build failure)
    Config,
    /// Session storage could not be read or written
    Storage,
}

/// All kinds, in declaration order
pub const ALL_ERROR_KINDS: [ErrorKind; 16] = [
    ErrorKind::Unauthorized,
    ErrorKind::Forbidden,
    ErrorKind::NotFound,
    ErrorKind::ServerError,
    ErrorKind::Timeout,
    ErrorKind::NetworkError,
    ErrorKind::Unknown,
    ErrorKind::Rejected,
    ErrorKind::InvalidResponse,
    ErrorKind::EmptyCart,
    ErrorKind::NoSlotSelected,
    ErrorKind::SlotUnavailable,
    ErrorKind::InvalidQuantity,
    ErrorKind::Cancelled,
    ErrorKind::Config,
    ErrorKind::Storage,
];

impl ErrorKind {
    /// Stable snake_case name, identical to the serde representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::Timeout => "timeout",
            Self::NetworkError => "network_error",
            Self::Unknown => "unknown",
            Self::Rejected => "rejected",
            Self::InvalidResponse => "invalid_response",
            Self::EmptyCart => "empty_cart",
            Self::NoSlotSelected => "no_slot_selected",
            Self::SlotUnavailable => "slot_unavailable",
            Self::InvalidQuantity => "invalid_quantity",
            Self::Cancelled => "cancelled",
            Self::Config => "config",
            Self::Storage => "storage",
        }
    }

    /// Whether an automatic re-attempt is permitted for this kind
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ServerError | Self::Timeout | Self::NetworkError)
    }

    /// Fixed user-facing message, used when the server supplies none
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Authentication required. Please log in again.",
            Self::Forbidden => "You do not have permission to perform this action.",
            Self::NotFound => "The requested resource was not found.",
            Self::ServerError => "Server error. Please try again later.",
            Self::Timeout => "Request timeout. Please check your connection and try again.",
            Self::NetworkError => "Network error. Please check your connection and try again.",
            Self::Unknown => "An unexpected error occurred. Please try again.",
            Self::Rejected => "The request could not be completed.",
            Self::InvalidResponse => "Received an invalid response from the server.",
            Self::EmptyCart => "Please add items to your cart.",
            Self::NoSlotSelected => "Please select a meal slot.",
            Self::SlotUnavailable => "The selected meal slot is not open for orders.",
            Self::InvalidQuantity => "Quantity must be between 1 and 9999.",
            Self::Cancelled => "The request was cancelled.",
            Self::Config => "The client is not configured correctly.",
            Self::Storage => "Could not access the local session.",
        }
    }

    /// Get the category for this kind
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized
            | Self::Forbidden
            | Self::NotFound
            | Self::ServerError
            | Self::Timeout
            | Self::NetworkError
            | Self::Unknown => ErrorCategory::Transport,
            Self::Rejected | Self::InvalidResponse => ErrorCategory::Service,
            Self::EmptyCart
            | Self::NoSlotSelected
            | Self::SlotUnavailable
            | Self::InvalidQuantity
            | Self::Cancelled
            | Self::Config
            | Self::Storage => ErrorCategory::Local,
        }
    }

    /// True for failures detected before any request is sent
    #[inline]
    pub const fn is_local(&self) -> bool {
        matches!(self.category(), ErrorCategory::Local)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown kind name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error kind: {0}")]
pub struct InvalidErrorKind(pub String);

impl FromStr for ErrorKind {
    type Err = InvalidErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ERROR_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| InvalidErrorKind(s.to_string()))
    }
}
