//! Admin Model
//!
//! Analytics, catering export and emergency meal requests.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive date range for analytics queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Item reference inside analytics; the service may send only the name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularItemRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularItem {
    pub item: PopularItemRef,
    pub count: u64,
}

/// Order analytics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub total_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(default)]
    pub popular_items: Vec<PopularItem>,
    /// Orders per dietary tag
    #[serde(default)]
    pub dietary_stats: BTreeMap<String, u64>,
    /// Orders per meal slot id
    #[serde(default)]
    pub time_slot_stats: BTreeMap<String, u64>,
}

/// Catering export payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CateringExport {
    pub flight_number: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyReason {
    Diversion,
    Delay,
    EquipmentFailure,
}

/// Emergency meal request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyMealRequest {
    pub flight_number: String,
    pub reason: EmergencyReason,
    pub meal_type: String,
    pub quantity: u32,
}
