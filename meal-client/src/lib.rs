//! Meal Client - order orchestration for in-flight meal ordering
//!
//! Talks to the meal service through a resilient channel (auth, timeout,
//! classified retries) and keeps the passenger-side state: menu catalog,
//! filtered views, cart and meal slot selection.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod channel;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod logger;
pub mod observer;
pub mod orchestrator;
pub mod retry;
pub mod session;
pub mod slot;
pub mod transport;

pub use api::MealApi;
pub use cart::{Cart, CartLine};
pub use catalog::{CatalogStore, FetchOutcome, FetchTicket, MenuCatalog, MenuQuery};
pub use channel::ResilientChannel;
pub use classify::{ClassifiedError, classify};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use filter::{CategoryFilter, FilterSpec, FilteredItems, apply_filter};
pub use logger::init_logger;
pub use observer::{
    FailureObserver, FailureReport, NoopObserver, RecordingObserver, TracingObserver,
};
pub use orchestrator::OrderOrchestrator;
pub use retry::{Backoff, ConstantBackoff, ExponentialBackoff, NoBackoff, RetryPolicy};
pub use session::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use slot::{MealSlotGate, SlotSelection, SlotState};

// Re-export shared types for convenience
pub use shared::client::{ApiResponse, LoginResponse};
pub use shared::models::{CabinClass, MealSlot, MenuCategory, MenuItem, Order};
pub use shared::{ErrorCategory, ErrorKind};
