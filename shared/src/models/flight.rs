//! Flight Model

use super::MealSlot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Flight metadata returned with every menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub flight_number: String,
    pub date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub aircraft_type: String,
    #[serde(default)]
    pub meal_slots: Vec<MealSlot>,
    pub route_id: String,
}
