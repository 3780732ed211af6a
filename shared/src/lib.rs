//! Shared types for the in-flight meal ordering client
//!
//! Wire models, the service response envelope and the error taxonomy used
//! by `meal-client` and by anything that displays its results.

pub mod client;
pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ErrorCategory, ErrorKind};
pub use response::{ApiResponse, HealthStatus};
