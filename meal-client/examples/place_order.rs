// meal-client/examples/place_order.rs
// Fetch a menu, fill a cart and place an order against a running meal service
//
// MEAL_API_URL=http://localhost:3001/api cargo run -p meal-client --example place_order -- AA123 2024-01-15 economy

use chrono::NaiveDate;
use meal_client::{
    CabinClass, Cart, CatalogStore, ClientConfig, FilterSpec, MealApi, MenuQuery, SlotSelection,
    init_logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("info", false)?;

    let mut args = std::env::args().skip(1);
    let flight_number = args.next().unwrap_or_else(|| "AA123".into());
    let date: NaiveDate = args
        .next()
        .unwrap_or_else(|| "2024-01-15".into())
        .parse()?;
    let cabin: CabinClass = args.next().unwrap_or_else(|| "economy".into()).parse()?;

    let config = ClientConfig::from_env();
    let api = MealApi::from_config(&config)?;

    if let (Ok(email), Ok(password)) = (
        std::env::var("MEAL_DEMO_EMAIL"),
        std::env::var("MEAL_DEMO_PASSWORD"),
    ) {
        let login = api.login(&email, &password).await?;
        tracing::info!(name = %login.user.name, "Signed in");
    }

    let mut store = CatalogStore::new();
    store
        .refresh(api.channel(), &MenuQuery::new(&flight_number, date, cabin))
        .await?;
    let catalog = store
        .current()
        .ok_or_else(|| anyhow::anyhow!("no menu loaded"))?;

    let spec = FilterSpec::for_cabin(cabin);
    let Some(first) = catalog.filter(&spec).find(|item| item.is_in_stock()) else {
        anyhow::bail!("nothing available in {cabin}");
    };

    let mut cart = Cart::new();
    cart.add(first, 1)?;
    cart.set_seat(std::env::var("MEAL_DEMO_SEAT").unwrap_or_else(|_| "12A".into()));

    let mut selection = SlotSelection::new();
    let Some(slot) = catalog.gates().find(|gate| gate.is_submittable()) else {
        anyhow::bail!("no meal slot is open for ordering");
    };
    selection.select(&slot.slot_id, catalog.slots())?;

    match api
        .orchestrator()
        .submit(&cart, selection.selected(), &catalog)
        .await
    {
        Ok(order) => {
            tracing::info!(
                booking_ref = %order.booking_ref,
                total = %order.total_amount,
                "Order confirmed"
            );
            cart.clear();
        }
        Err(e) => tracing::error!(kind = %e.kind(), "{}", e.user_message()),
    }

    Ok(())
}
