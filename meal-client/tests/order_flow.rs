// meal-client/tests/order_flow.rs
// Menu fetch -> filter -> cart -> slot -> order, over a scripted service

use std::sync::Arc;

use chrono::NaiveDate;
use http::StatusCode;
use meal_client::transport::ScriptedTransport;
use meal_client::{
    CabinClass, Cart, CatalogStore, CategoryFilter, ClientConfig, ClientError, ErrorKind,
    FetchOutcome, FilterSpec, MealApi, MenuCatalog, MenuQuery, RecordingObserver,
    ResilientChannel, SlotSelection, SlotState, apply_filter,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn menu_payload() -> Value {
    json!({
        "menu": [
            {
                "id": "1",
                "name": "Grilled Chicken Breast",
                "description": "Tender grilled chicken breast with herbs and lemon",
                "price": 15.99,
                "category": "main",
                "cabinClass": "economy",
                "allergens": ["none"],
                "dietaryCategories": ["gluten-free"],
                "available": true,
                "stockQuantity": 50
            },
            {
                "id": "2",
                "name": "Vegetarian Pasta",
                "description": "Penne pasta with seasonal vegetables",
                "price": 12.99,
                "category": "main",
                "cabinClass": "economy",
                "allergens": ["gluten"],
                "dietaryCategories": ["vegetarian"],
                "available": true,
                "stockQuantity": 30
            },
            {
                "id": "3",
                "name": "Beef Tenderloin",
                "price": 45.99,
                "category": "main",
                "cabinClass": "business",
                "dietaryCategories": ["gluten-free"],
                "available": true,
                "stockQuantity": 10
            }
        ],
        "mealSlots": [
            {
                "id": "breakfast", "name": "Breakfast", "startTime": "07:00", "endTime": "09:00",
                "isLocked": true, "isActive": false
            },
            {
                "id": "lunch", "name": "Lunch", "startTime": "12:00", "endTime": "14:00",
                "isLocked": false, "isActive": true
            },
            {
                "id": "dinner", "name": "Dinner", "startTime": "18:00", "endTime": "20:00",
                "isLocked": false, "isActive": false
            }
        ],
        "flight": {
            "flightNumber": "AA123",
            "date": "2024-01-15",
            "origin": "JFK",
            "destination": "LAX",
            "departureTime": "08:00",
            "arrivalTime": "11:30",
            "aircraftType": "Boeing 737",
            "routeId": "JFK-LAX"
        }
    })
}

fn order_payload() -> Value {
    json!({
        "id": "order_1705312800000",
        "bookingRef": "BK1705312800000",
        "passengerId": "anonymous",
        "seat": "12A",
        "items": [{"menuItemId": "1", "quantity": 2, "price": 15.99}],
        "totalAmount": 31.98,
        "status": "pending",
        "timestamp": "2024-01-15T12:05:00.000Z",
        "dietaryRestrictions": ["gluten-free"],
        "specialRequests": "",
        "mealSlot": "lunch",
        "flightNumber": "AA123",
        "flightDate": "2024-01-15"
    })
}

fn query() -> MenuQuery {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    MenuQuery::new("AA123", date, CabinClass::Economy)
}

fn setup() -> (MealApi, Arc<ScriptedTransport>, Arc<RecordingObserver>) {
    let transport = Arc::new(ScriptedTransport::new());
    let observer = Arc::new(RecordingObserver::new());
    let channel = ResilientChannel::with_transport(&ClientConfig::default(), transport.clone())
        .unwrap()
        .with_observer(observer.clone());
    (MealApi::new(Arc::new(channel)), transport, observer)
}

#[tokio::test]
async fn test_menu_fetch_and_filter() {
    let (api, transport, _) = setup();
    transport.push_ok(menu_payload());

    let catalog = api.menu(&query().with_dietary(["gluten-free"])).await.unwrap();
    let request = transport.last_request().unwrap();
    assert_eq!(request.url.path(), "/api/menu");
    assert_eq!(
        request.url.query(),
        Some("flightNumber=AA123&date=2024-01-15&cabinClass=economy&dietaryRestrictions=gluten-free")
    );

    assert_eq!(catalog.items().len(), 3);
    assert_eq!(catalog.flight().route_id, "JFK-LAX");

    let spec = FilterSpec {
        cabin_class: CabinClass::Economy,
        dietary_restrictions: ["gluten-free".to_string()].into(),
        price_range: (Decimal::ZERO, Decimal::ONE_HUNDRED),
        category: CategoryFilter::All,
    };
    let ids: Vec<&str> = apply_filter(catalog.items(), &spec).map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1"]);
    assert_eq!(catalog.filter(&spec).count(), 1);
}

#[tokio::test]
async fn test_menu_fetch_survives_two_unavailable_responses() {
    let (api, transport, observer) = setup();
    transport.push_status(StatusCode::SERVICE_UNAVAILABLE);
    transport.push_status(StatusCode::SERVICE_UNAVAILABLE);
    transport.push_ok(menu_payload());

    let catalog = MenuCatalog::fetch(api.channel(), &query()).await.unwrap();
    assert_eq!(catalog.items().len(), 3);
    assert_eq!(catalog.slots().len(), 3);
    assert_eq!(transport.calls(), 3);
    assert!(observer.is_empty());
}

#[tokio::test]
async fn test_menu_fetch_unauthorized_fails_fast() {
    let (api, transport, observer) = setup();
    transport.push_json(
        StatusCode::UNAUTHORIZED,
        json!({"success": false, "error": "Invalid or expired token"}),
    );
    transport.push_ok(menu_payload());

    let err = api.menu(&query()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.user_message(), "Invalid or expired token");
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.remaining(), 1);
    assert_eq!(observer.len(), 1);
}

#[tokio::test]
async fn test_place_order() {
    let (api, transport, observer) = setup();
    transport.push_ok(menu_payload());
    transport.push_ok(order_payload());

    let mut store = CatalogStore::new();
    let outcome = store.refresh(api.channel(), &query()).await.unwrap();
    assert_eq!(outcome, FetchOutcome::Applied);
    let catalog = store.current().unwrap();

    let mut cart = Cart::new();
    cart.add(catalog.item("1").unwrap(), 2).unwrap();
    cart.set_seat("12A");
    cart.add_dietary_restriction("gluten-free");

    let mut selection = SlotSelection::new();
    assert_eq!(selection.select("lunch", catalog.slots()).unwrap(), SlotState::Active);

    let order = api
        .orchestrator()
        .submit(&cart, selection.selected(), &catalog)
        .await
        .unwrap();
    assert_eq!(order.booking_ref, "BK1705312800000");
    assert_eq!(order.total_amount, Decimal::new(3198, 2));

    // the cart is the caller's to clear
    assert_eq!(cart.count(), 2);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, http::Method::POST);
    assert_eq!(request.url.path(), "/api/order");
    let body = request.body.unwrap();
    assert_eq!(body["mealSlot"], "lunch");
    assert_eq!(body["seat"], "12A");
    assert_eq!(body["dietaryRestrictions"], json!(["gluten-free"]));
    assert_eq!(body["items"][0]["quantity"], 2);
    assert!(observer.is_empty());
}

#[tokio::test]
async fn test_locked_slot_never_reaches_transport() {
    let (api, transport, _) = setup();
    transport.push_ok(menu_payload());
    let catalog = api.menu(&query()).await.unwrap();
    assert_eq!(transport.calls(), 1);

    let mut selection = SlotSelection::new();
    let err = selection.select("breakfast", catalog.slots()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SlotUnavailable);

    let mut cart = Cart::new();
    cart.add(catalog.item("2").unwrap(), 1).unwrap();

    let orchestrator = api.orchestrator();
    let err = orchestrator
        .submit(&cart, Some("breakfast"), &catalog)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::SlotUnavailable(_)));

    // upcoming slots may be chosen but not ordered against
    assert_eq!(selection.select("dinner", catalog.slots()).unwrap(), SlotState::Upcoming);
    let err = orchestrator
        .submit(&cart, selection.selected(), &catalog)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::SlotUnavailable(_)));

    let err = orchestrator.submit(&Cart::new(), Some("lunch"), &catalog).await.unwrap_err();
    assert!(matches!(err, ClientError::EmptyCart));

    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_server_rejection_leaves_cart_untouched() {
    let (api, transport, observer) = setup();
    transport.push_ok(menu_payload());
    transport.push_json(
        StatusCode::BAD_REQUEST,
        json!({"success": false, "error": "Meal slot is locked for ordering"}),
    );

    let catalog = api.menu(&query()).await.unwrap();
    let mut cart = Cart::new();
    cart.add(catalog.item("1").unwrap(), 1).unwrap();
    let before = cart.clone();

    let err = api
        .orchestrator()
        .submit(&cart, Some("lunch"), &catalog)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Meal slot is locked for ordering");
    assert_eq!(cart, before);
    assert_eq!(transport.calls(), 2);
    assert_eq!(observer.len(), 1);
}

#[tokio::test]
async fn test_failed_refresh_keeps_snapshot() {
    let (api, transport, _) = setup();
    transport.push_ok(menu_payload());
    for _ in 0..3 {
        transport.push_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    let mut store = CatalogStore::new();
    store.refresh(api.channel(), &query()).await.unwrap();
    let before = store.current().unwrap();

    let err = store.refresh(api.channel(), &query()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert!(Arc::ptr_eq(&before, &store.current().unwrap()));
    assert_eq!(transport.calls(), 4);
}

#[tokio::test]
async fn test_reconcile_after_refresh() {
    let (api, transport, _) = setup();
    transport.push_ok(menu_payload());
    let mut refreshed = menu_payload();
    refreshed["menu"].as_array_mut().unwrap().remove(0);
    transport.push_ok(refreshed);

    let first = api.menu(&query()).await.unwrap();
    let mut cart = Cart::new();
    cart.add(first.item("1").unwrap(), 1).unwrap();
    cart.add(first.item("2").unwrap(), 1).unwrap();

    let second = api.menu(&query()).await.unwrap();
    assert_eq!(cart.reconcile(&second), vec!["1"]);
    assert_eq!(cart.lines().len(), 2);
}
