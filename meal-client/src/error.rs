//! Client error types

use rust_decimal::Decimal;
use shared::ErrorKind;
use thiserror::Error;

use crate::classify::ClassifiedError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Classified transport failure (retries, if any, already spent)
    #[error("{0}")]
    Transport(ClassifiedError),

    /// Service answered with `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The caller abandoned the request
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session storage error
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Order submitted with an empty cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Order submitted without a meal slot
    #[error("No meal slot selected")]
    NoSlotSelected,

    /// Meal slot is locked, not yet active, or unknown
    #[error("Meal slot unavailable: {0}")]
    SlotUnavailable(String),

    /// Quantity outside `1..=MAX_QUANTITY`
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Catalog item priced outside the accepted range
    #[error("Invalid price for item {item_id}: {price}")]
    InvalidPrice { item_id: String, price: Decimal },
}

impl ClientError {
    /// The taxonomy kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(classified) => classified.kind,
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::InvalidResponse(_) | Self::Serialization(_) | Self::InvalidPrice { .. } => {
                ErrorKind::InvalidResponse
            }
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config(_) => ErrorKind::Config,
            Self::Storage(_) => ErrorKind::Storage,
            Self::EmptyCart => ErrorKind::EmptyCart,
            Self::NoSlotSelected => ErrorKind::NoSlotSelected,
            Self::SlotUnavailable(_) => ErrorKind::SlotUnavailable,
            Self::InvalidQuantity(_) => ErrorKind::InvalidQuantity,
        }
    }

    /// Message suitable for direct display to a traveler
    ///
    /// Never contains raw transport diagnostics.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(classified) => classified.message.clone(),
            Self::Rejected(message) => message.clone(),
            other => other.kind().default_message().to_string(),
        }
    }

    /// Whether the channel would have retried this error
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(classified) => classified.retryable,
            _ => false,
        }
    }
}

impl From<ClassifiedError> for ClientError {
    fn from(classified: ClassifiedError) -> Self {
        Self::Transport(classified)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
