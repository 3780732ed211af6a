//! Error taxonomy shared by the ordering client and its callers
//!
//! - [`ErrorKind`]: every failure kind the client can surface
//! - [`ErrorCategory`]: transport / service / local grouping of kinds
//!
//! # Example
//!
//! ```
//! use shared::error::{ErrorCategory, ErrorKind};
//!
//! let kind = ErrorKind::ServerError;
//! assert!(kind.is_retryable());
//! assert_eq!(kind.category(), ErrorCategory::Transport);
//! assert_eq!(kind.default_message(), "Server error. Please try again later.");
//! ```

mod category;
mod kind;

pub use category::ErrorCategory;
pub use kind::{ALL_ERROR_KINDS, ErrorKind, InvalidErrorKind};
