//! Meal Slot Model

use serde::{Deserialize, Serialize};

/// Meal service window (e.g. breakfast 07:00-09:00)
///
/// The server owns both flags; the client only mirrors them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSlot {
    pub id: String,
    pub name: String,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
    #[serde(rename = "isLocked")]
    pub locked: bool,
    #[serde(rename = "isActive")]
    pub active: bool,
    #[serde(default)]
    pub crew_assigned: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_slot_wire_names() {
        let slot: MealSlot = serde_json::from_value(serde_json::json!({
            "id": "breakfast",
            "name": "Breakfast",
            "startTime": "07:00",
            "endTime": "09:00",
            "isLocked": false,
            "isActive": true
        }))
        .unwrap();
        assert!(slot.active);
        assert!(!slot.locked);
        assert!(slot.crew_assigned.is_empty());

        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["startTime"], "07:00");
    }
}
