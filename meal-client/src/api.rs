// meal-client/src/api.rs
// Typed facade over the meal service REST endpoints

use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use shared::HealthStatus;
use shared::client::{LoginRequest, LoginResponse};
use shared::models::{
    AnalyticsData, CateringExport, DateRange, DietaryProfile, DietaryProfileUpdate,
    EmergencyMealRequest, Flight, MenuResponse, Order, OrderSubmission, OrderUpdate,
    ServiceComplete, User,
};
use tokio_util::sync::CancellationToken;

use crate::catalog::{MenuCatalog, MenuQuery};
use crate::channel::ResilientChannel;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::orchestrator::{OrderOrchestrator, create_order_request};
use crate::transport::RequestSpec;

/// Meal service API
///
/// Every call goes through the shared [`ResilientChannel`], so retries,
/// classification and failure reporting behave the same for all endpoints.
#[derive(Debug, Clone)]
pub struct MealApi {
    channel: Arc<ResilientChannel>,
}

impl MealApi {
    pub fn new(channel: Arc<ResilientChannel>) -> Self {
        Self { channel }
    }

    /// Build a network-backed API from configuration
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(Arc::new(config.build_channel()?)))
    }

    pub fn channel(&self) -> &Arc<ResilientChannel> {
        &self.channel
    }

    /// Orchestrator sharing this API's channel
    pub fn orchestrator(&self) -> OrderOrchestrator {
        OrderOrchestrator::new(self.channel.clone())
    }

    // ========== Auth ==========

    /// Log in and store the session token
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let spec = RequestSpec::post("/auth/login").public().json(&request)?;
        let response: LoginResponse = self.channel.execute(spec).await?;
        self.channel.tokens().set_token(&response.token)?;
        tracing::info!(user_id = %response.user.id, role = ?response.user.role, "Logged in");
        Ok(response)
    }

    /// Log out; the local token is cleared even if the server call fails
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.send(RequestSpec::post("/auth/logout")).await;
        self.channel.tokens().clear_token()?;
        tracing::info!("Logged out");
        result
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.channel.execute(RequestSpec::get("/auth/me")).await
    }

    pub fn is_logged_in(&self) -> bool {
        self.channel.tokens().token().is_some()
    }

    // ========== Menu ==========

    pub async fn menu(&self, query: &MenuQuery) -> ClientResult<MenuCatalog> {
        MenuCatalog::fetch(&self.channel, query).await
    }

    pub async fn menu_cancellable(
        &self,
        query: &MenuQuery,
        cancel: &CancellationToken,
    ) -> ClientResult<MenuCatalog> {
        let response: MenuResponse = self
            .channel
            .execute_cancellable(query.to_request(), cancel)
            .await?;
        Ok(response.into())
    }

    // ========== Orders ==========

    /// Post a prepared submission as is (no local precondition checks)
    pub async fn create_order(&self, submission: &OrderSubmission) -> ClientResult<Order> {
        self.channel.execute(create_order_request(submission)?).await
    }

    pub async fn orders_by_booking(&self, booking_ref: &str) -> ClientResult<Vec<Order>> {
        self.channel
            .execute(RequestSpec::get("/order").segment(booking_ref))
            .await
    }

    pub async fn update_order(&self, order_id: &str, update: &OrderUpdate) -> ClientResult<Order> {
        let spec = RequestSpec::put("/order").segment(order_id).json(update)?;
        self.channel.execute(spec).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> ClientResult<()> {
        self.send(RequestSpec::delete("/order").segment(order_id))
            .await
    }

    // ========== Dietary profile ==========

    pub async fn dietary_profile(&self, passenger_id: &str) -> ClientResult<DietaryProfile> {
        self.channel
            .execute(RequestSpec::get("/dietary-profile").segment(passenger_id))
            .await
    }

    pub async fn update_dietary_profile(
        &self,
        passenger_id: &str,
        update: &DietaryProfileUpdate,
    ) -> ClientResult<DietaryProfile> {
        let spec = RequestSpec::put("/dietary-profile")
            .segment(passenger_id)
            .json(update)?;
        self.channel.execute(spec).await
    }

    // ========== Flight ==========

    pub async fn flight(&self, flight_number: &str, date: NaiveDate) -> ClientResult<Flight> {
        let spec = RequestSpec::get("/flight")
            .segment(flight_number)
            .segment(date.format("%Y-%m-%d").to_string());
        self.channel.execute(spec).await
    }

    // ========== Admin ==========

    pub async fn analytics(&self, range: DateRange) -> ClientResult<AnalyticsData> {
        let spec = RequestSpec::get("/admin/analytics")
            .query("start", range.start.format("%Y-%m-%d").to_string())
            .query("end", range.end.format("%Y-%m-%d").to_string());
        self.channel.execute(spec).await
    }

    /// Hand a flight's orders over to catering
    pub async fn export_to_catering(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> ClientResult<()> {
        let body = CateringExport {
            flight_number: flight_number.to_string(),
            date,
        };
        self.send(RequestSpec::post("/admin/export").json(&body)?)
            .await
    }

    pub async fn request_emergency_meal(
        &self,
        request: &EmergencyMealRequest,
    ) -> ClientResult<()> {
        self.send(RequestSpec::post("/admin/emergency-meal").json(request)?)
            .await?;
        tracing::warn!(
            flight = %request.flight_number,
            reason = ?request.reason,
            quantity = request.quantity,
            "Emergency meals requested"
        );
        Ok(())
    }

    pub async fn lock_slot(&self, slot_id: &str) -> ClientResult<()> {
        self.send(RequestSpec::post("/admin/slots").segment(slot_id).segment("lock"))
            .await
    }

    pub async fn unlock_slot(&self, slot_id: &str) -> ClientResult<()> {
        self.send(RequestSpec::post("/admin/slots").segment(slot_id).segment("unlock"))
            .await
    }

    // ========== Crew ==========

    pub async fn flight_passengers(&self, flight_number: &str) -> ClientResult<Vec<Order>> {
        self.channel
            .execute(RequestSpec::get("/crew/passengers").segment(flight_number))
            .await
    }

    pub async fn complete_service(
        &self,
        order_id: &str,
        notes: Option<String>,
    ) -> ClientResult<()> {
        let body = ServiceComplete {
            order_id: order_id.to_string(),
            notes,
        };
        self.send(RequestSpec::post("/crew/service-complete").json(&body)?)
            .await
    }

    // ========== Health ==========

    pub async fn health(&self) -> ClientResult<HealthStatus> {
        self.channel
            .execute(RequestSpec::get("/health").public())
            .await
    }

    /// Call an endpoint whose payload, if any, is of no interest
    async fn send(&self, spec: RequestSpec) -> ClientResult<()> {
        self.channel.execute::<IgnoredAny>(spec).await.map(|_| ())
    }
}
