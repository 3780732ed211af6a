//! Order Model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle as reported by the service
///
/// pending -> confirmed -> preparing -> delivered, or cancelled from any
/// state before delivery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// No further transitions expected
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// Order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Menu item reference (String ID)
    pub menu_item_id: String,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Unit price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Order entity (owned by the service, read-only on the client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub booking_ref: String,
    #[serde(default)]
    pub passenger_id: String,
    pub seat: String,
    pub items: Vec<OrderItem>,
    /// Total amount in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub special_requests: String,
    pub meal_slot: String,
    pub flight_number: String,
    pub flight_date: NaiveDate,
}

/// Create order payload (`POST /order`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub items: Vec<OrderItem>,
    pub dietary_restrictions: Vec<String>,
    pub special_requests: String,
    pub seat: String,
    pub meal_slot: String,
}

/// Update order payload (`PUT /order/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_slot: Option<String>,
}

/// Crew service completion payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceComplete {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_wire_format() {
        let json = serde_json::json!({
            "id": "order_1705312800000",
            "bookingRef": "BK1705312800000",
            "passengerId": "anonymous",
            "seat": "12A",
            "items": [{"menuItemId": "1", "quantity": 2, "price": 15.99}],
            "totalAmount": 31.98,
            "status": "pending",
            "timestamp": "2024-01-15T10:00:00.000Z",
            "dietaryRestrictions": ["gluten-free"],
            "specialRequests": "",
            "mealSlot": "lunch",
            "flightNumber": "AA123",
            "flightDate": "2024-01-15"
        });
        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, Decimal::new(3198, 2));
        assert_eq!(order.items[0].special_instructions, None);
        assert_eq!(order.flight_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_final_status() {
        assert!(OrderStatus::Delivered.is_final());
        assert!(OrderStatus::Cancelled.is_final());
        assert!(!OrderStatus::Preparing.is_final());
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = OrderUpdate {
            seat: Some("14C".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"seat": "14C"})
        );
    }
}
