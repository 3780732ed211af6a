//! Order submission
//!
//! [`OrderOrchestrator`] checks the local preconditions of an order, in this
//! order, before anything is sent:
//!
//! 1. the cart has at least one line (`EmptyCart`)
//! 2. a meal slot is selected (`NoSlotSelected`)
//! 3. the slot exists in the catalog and is active (`SlotUnavailable`)
//!
//! It then posts the order through the channel. The cart is only read; the
//! caller decides when to clear it.

use std::collections::BTreeSet;
use std::sync::Arc;

use shared::models::{DietaryProfile, Order, OrderSubmission};
use tokio_util::sync::CancellationToken;

use crate::cart::Cart;
use crate::catalog::MenuCatalog;
use crate::channel::ResilientChannel;
use crate::error::{ClientError, ClientResult};
use crate::transport::RequestSpec;

/// `POST /order` carrying `submission`
pub(crate) fn create_order_request(submission: &OrderSubmission) -> ClientResult<RequestSpec> {
    RequestSpec::post("/order").json(submission)
}

#[derive(Debug, Clone)]
pub struct OrderOrchestrator {
    channel: Arc<ResilientChannel>,
    profile: Option<DietaryProfile>,
}

impl OrderOrchestrator {
    pub fn new(channel: Arc<ResilientChannel>) -> Self {
        Self {
            channel,
            profile: None,
        }
    }

    /// Merge this profile's restrictions into every submission
    pub fn with_profile(mut self, profile: DietaryProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn set_profile(&mut self, profile: Option<DietaryProfile>) {
        self.profile = profile;
    }

    pub fn profile(&self) -> Option<&DietaryProfile> {
        self.profile.as_ref()
    }

    /// Validate and build the submission payload without sending it
    pub fn prepare(
        &self,
        cart: &Cart,
        selected_slot: Option<&str>,
        catalog: &MenuCatalog,
    ) -> ClientResult<OrderSubmission> {
        if cart.is_empty() {
            return Err(ClientError::EmptyCart);
        }
        let slot_id = selected_slot.ok_or(ClientError::NoSlotSelected)?;
        let gate = catalog
            .gate(slot_id)
            .ok_or_else(|| ClientError::SlotUnavailable(format!("unknown meal slot {slot_id}")))?;
        gate.ensure_submittable()?;

        let mut dietary: BTreeSet<String> = cart.dietary_restrictions().clone();
        if let Some(profile) = &self.profile {
            dietary.extend(profile.restrictions.iter().cloned());
        }

        Ok(OrderSubmission {
            items: cart.order_items(),
            dietary_restrictions: dietary.into_iter().collect(),
            special_requests: cart.special_request().to_string(),
            seat: cart.seat().to_string(),
            meal_slot: gate.slot_id,
        })
    }

    /// Submit the cart as an order
    pub async fn submit(
        &self,
        cart: &Cart,
        selected_slot: Option<&str>,
        catalog: &MenuCatalog,
    ) -> ClientResult<Order> {
        let submission = self.prepare(cart, selected_slot, catalog)?;
        let order: Order = self.channel.execute(create_order_request(&submission)?).await?;
        Self::log_created(&order);
        Ok(order)
    }

    /// [`submit`](Self::submit), abandoned with `Cancelled` when `cancel` fires
    pub async fn submit_cancellable(
        &self,
        cart: &Cart,
        selected_slot: Option<&str>,
        catalog: &MenuCatalog,
        cancel: &CancellationToken,
    ) -> ClientResult<Order> {
        let submission = self.prepare(cart, selected_slot, catalog)?;
        let order: Order = self
            .channel
            .execute_cancellable(create_order_request(&submission)?, cancel)
            .await?;
        Self::log_created(&order);
        Ok(order)
    }

    fn log_created(order: &Order) {
        tracing::info!(
            order_id = %order.id,
            booking_ref = %order.booking_ref,
            meal_slot = %order.meal_slot,
            items = order.items.len(),
            total = %order.total_amount,
            "Order placed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::ScriptedTransport;
    use rust_decimal::Decimal;
    use shared::models::{CabinClass, MealSlot, MenuCategory, MenuItem};

    fn slot(id: &str, locked: bool, active: bool) -> MealSlot {
        MealSlot {
            id: id.into(),
            name: id.into(),
            start_time: "12:00".into(),
            end_time: "14:00".into(),
            locked,
            active,
            crew_assigned: Vec::new(),
        }
    }

    fn item(id: &str) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: "Grilled Chicken Breast".into(),
            description: String::new(),
            price: Decimal::new(1599, 2),
            category: MenuCategory::Main,
            cabin_class: CabinClass::Economy,
            allergens: BTreeSet::new(),
            dietary_categories: ["gluten-free".to_string()].into(),
            nutritional_info: None,
            image_url: None,
            available: true,
            stock_quantity: 50,
        }
    }

    fn catalog() -> MenuCatalog {
        let flight = serde_json::from_value(serde_json::json!({
            "flightNumber": "AA123", "date": "2024-01-15", "origin": "JFK",
            "destination": "LAX", "departureTime": "08:00", "arrivalTime": "11:30",
            "aircraftType": "Boeing 737", "routeId": "JFK-LAX"
        }))
        .unwrap();
        MenuCatalog::new(
            vec![item("1")],
            vec![
                slot("breakfast", true, true),
                slot("lunch", false, true),
                slot("dinner", false, false),
            ],
            flight,
        )
    }

    fn orchestrator() -> (OrderOrchestrator, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new());
        let channel =
            ResilientChannel::with_transport(&ClientConfig::default(), transport.clone()).unwrap();
        (OrderOrchestrator::new(Arc::new(channel)), transport)
    }

    fn filled_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&item("1"), 2).unwrap();
        cart
    }

    #[test]
    fn test_precondition_order() {
        let (orchestrator, _) = orchestrator();
        let catalog = catalog();

        // empty cart wins over a missing slot
        let err = orchestrator.prepare(&Cart::new(), None, &catalog).unwrap_err();
        assert!(matches!(err, ClientError::EmptyCart));

        let err = orchestrator.prepare(&filled_cart(), None, &catalog).unwrap_err();
        assert!(matches!(err, ClientError::NoSlotSelected));

        for slot_id in ["breakfast", "dinner", "snack"] {
            let err = orchestrator
                .prepare(&filled_cart(), Some(slot_id), &catalog)
                .unwrap_err();
            assert!(matches!(err, ClientError::SlotUnavailable(_)), "{slot_id}");
        }
    }

    #[test]
    fn test_payload() {
        let (orchestrator, _) = orchestrator();
        let orchestrator = orchestrator.with_profile(DietaryProfile {
            passenger_id: "p1".into(),
            restrictions: vec!["halal".into(), "gluten-free".into()],
            ..DietaryProfile::default()
        });

        let mut cart = filled_cart();
        cart.set_seat("12A");
        cart.set_special_request("Serve after takeoff");
        cart.set_instructions("1", Some("no lemon".into()));
        cart.add_dietary_restriction("gluten-free");

        let submission = orchestrator.prepare(&cart, Some("lunch"), &catalog()).unwrap();
        assert_eq!(submission.meal_slot, "lunch");
        assert_eq!(submission.seat, "12A");
        assert_eq!(submission.special_requests, "Serve after takeoff");
        assert_eq!(submission.dietary_restrictions, vec!["gluten-free", "halal"]);
        assert_eq!(submission.items.len(), 1);
        assert_eq!(submission.items[0].quantity, 2);
        assert_eq!(submission.items[0].special_instructions.as_deref(), Some("no lemon"));

        let body = serde_json::to_value(&submission).unwrap();
        assert_eq!(body["mealSlot"], "lunch");
        assert_eq!(body["items"][0]["menuItemId"], "1");
        assert_eq!(body["items"][0]["price"], serde_json::json!(15.99));
    }

    #[tokio::test]
    async fn test_local_failures_never_reach_transport() {
        let (orchestrator, transport) = orchestrator();
        let catalog = catalog();

        assert!(orchestrator.submit(&Cart::new(), Some("lunch"), &catalog).await.is_err());
        assert!(orchestrator.submit(&filled_cart(), Some("breakfast"), &catalog).await.is_err());
        assert_eq!(transport.calls(), 0);
    }
}
