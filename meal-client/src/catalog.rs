//! Menu catalog
//!
//! A [`MenuCatalog`] is one immutable snapshot of `GET /menu`: items, meal
//! slots and flight metadata for a flight, date and cabin. [`CatalogStore`]
//! keeps the snapshot currently on display and decides which fetch result
//! may replace it.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{CabinClass, Flight, MealSlot, MenuItem, MenuResponse};

use crate::channel::ResilientChannel;
use crate::error::ClientResult;
use crate::filter::{FilterSpec, FilteredItems, apply_filter};
use crate::slot::MealSlotGate;
use crate::transport::RequestSpec;

/// Parameters of a menu fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuQuery {
    pub flight_number: String,
    pub date: NaiveDate,
    pub cabin_class: CabinClass,
    /// Sent comma-joined; omitted when `None`
    pub dietary_restrictions: Option<Vec<String>>,
}

impl MenuQuery {
    pub fn new(flight_number: impl Into<String>, date: NaiveDate, cabin_class: CabinClass) -> Self {
        Self {
            flight_number: flight_number.into(),
            date,
            cabin_class,
            dietary_restrictions: None,
        }
    }

    pub fn with_dietary<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dietary_restrictions = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn to_request(&self) -> RequestSpec {
        let mut spec = RequestSpec::get("/menu")
            .query("flightNumber", self.flight_number.as_str())
            .query("date", self.date.format("%Y-%m-%d").to_string())
            .query("cabinClass", self.cabin_class.as_str());
        if let Some(tags) = &self.dietary_restrictions {
            spec = spec.query("dietaryRestrictions", tags.join(","));
        }
        spec
    }
}

/// Snapshot of one menu fetch
#[derive(Debug, Clone, PartialEq)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
    slots: Vec<MealSlot>,
    flight: Flight,
}

impl MenuCatalog {
    pub fn new(items: Vec<MenuItem>, slots: Vec<MealSlot>, flight: Flight) -> Self {
        Self { items, slots, flight }
    }

    /// Fetch a fresh snapshot through the channel
    pub async fn fetch(channel: &ResilientChannel, query: &MenuQuery) -> ClientResult<Self> {
        let response: MenuResponse = channel.execute(query.to_request()).await?;
        tracing::debug!(
            flight = %query.flight_number,
            cabin = %query.cabin_class,
            items = response.menu.len(),
            slots = response.meal_slots.len(),
            "Menu fetched"
        );
        Ok(response.into())
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn slots(&self) -> &[MealSlot] {
        &self.slots
    }

    pub fn flight(&self) -> &Flight {
        &self.flight
    }

    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn slot(&self, id: &str) -> Option<&MealSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// Gate for the slot with this id, if the catalog has one
    pub fn gate(&self, slot_id: &str) -> Option<MealSlotGate> {
        self.slot(slot_id).map(MealSlotGate::new)
    }

    pub fn gates(&self) -> impl Iterator<Item = MealSlotGate> + '_ {
        self.slots.iter().map(MealSlotGate::new)
    }

    pub fn filter<'a>(&'a self, spec: &'a FilterSpec) -> FilteredItems<'a> {
        apply_filter(&self.items, spec)
    }
}

impl From<MenuResponse> for MenuCatalog {
    fn from(response: MenuResponse) -> Self {
        Self::new(response.menu, response.meal_slots, response.flight)
    }
}

/// Proof that a fetch was started; only the newest ticket may install a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket(u64);

/// What [`CatalogStore::complete`] did with a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result became the current snapshot
    Applied,
    /// A newer fetch was started since; the result was dropped
    Stale,
}

/// Current catalog snapshot plus fetch sequencing ("last started fetch wins")
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    current: Option<Arc<MenuCatalog>>,
    generation: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<MenuCatalog>> {
        self.current.clone()
    }

    /// Start a fetch, superseding every earlier ticket
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Offer the result of the fetch `ticket` was issued for
    ///
    /// Stale results are dropped whatever they contain. A failed newest fetch
    /// keeps the previous snapshot and returns the error.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: ClientResult<MenuCatalog>,
    ) -> ClientResult<FetchOutcome> {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                newest = self.generation,
                "Dropping stale menu fetch"
            );
            return Ok(FetchOutcome::Stale);
        }
        let catalog = result?;
        self.current = Some(Arc::new(catalog));
        Ok(FetchOutcome::Applied)
    }

    /// Fetch and install in one step
    pub async fn refresh(
        &mut self,
        channel: &ResilientChannel,
        query: &MenuQuery,
    ) -> ClientResult<FetchOutcome> {
        let ticket = self.begin_fetch();
        let result = MenuCatalog::fetch(channel, query).await;
        self.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ClientError;

    fn flight() -> Flight {
        serde_json::from_value(serde_json::json!({
            "flightNumber": "AA123",
            "date": "2024-01-15",
            "origin": "JFK",
            "destination": "LAX",
            "departureTime": "08:00",
            "arrivalTime": "11:30",
            "aircraftType": "Boeing 737",
            "mealSlots": [],
            "routeId": "JFK-LAX"
        }))
        .unwrap()
    }

    fn catalog(items: Vec<MenuItem>) -> MenuCatalog {
        MenuCatalog::new(items, Vec::new(), flight())
    }

    #[test]
    fn test_query_parameters() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let query = MenuQuery::new("AA123", date, CabinClass::PremiumEconomy);
        let url = query.to_request().url(ClientConfig::default().base_url.as_str()).unwrap();
        assert_eq!(
            url.query(),
            Some("flightNumber=AA123&date=2024-01-15&cabinClass=premium_economy")
        );

        let query = query.with_dietary(["vegan", "gluten-free"]);
        let url = query.to_request().url("http://localhost:3001/api").unwrap();
        assert!(url.query().unwrap().ends_with("&dietaryRestrictions=vegan%2Cgluten-free"));
    }

    #[test]
    fn test_last_started_fetch_wins() {
        let mut store = CatalogStore::new();
        let first = store.begin_fetch();
        let second = store.begin_fetch();

        assert_eq!(store.complete(second, Ok(catalog(Vec::new()))).unwrap(), FetchOutcome::Applied);
        let installed = store.current().unwrap();

        let late = store.complete(first, Ok(catalog(Vec::new()))).unwrap();
        assert_eq!(late, FetchOutcome::Stale);
        assert!(Arc::ptr_eq(&installed, &store.current().unwrap()));
    }

    #[test]
    fn test_failed_fetch_keeps_snapshot() {
        let mut store = CatalogStore::new();
        let ticket = store.begin_fetch();
        store.complete(ticket, Ok(catalog(Vec::new()))).unwrap();

        let ticket = store.begin_fetch();
        let err = store
            .complete(ticket, Err(ClientError::InvalidResponse("bad".into())))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
        assert!(store.current().is_some());
    }

    #[test]
    fn test_stale_error_is_dropped() {
        let mut store = CatalogStore::new();
        let stale = store.begin_fetch();
        let _newest = store.begin_fetch();
        let outcome = store.complete(stale, Err(ClientError::Cancelled)).unwrap();
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(store.current().is_none());
    }
}
