//! Data models
//!
//! Wire types of the meal service, shared between the ordering client and
//! anything that renders its results. Field names follow the service's
//! camelCase JSON; money is `rust_decimal::Decimal` serialized as a number.

pub mod admin;
pub mod flight;
pub mod meal_slot;
pub mod menu;
pub mod order;
pub mod passenger;

// Re-exports
pub use admin::*;
pub use flight::*;
pub use meal_slot::*;
pub use menu::*;
pub use order::*;
pub use passenger::*;
