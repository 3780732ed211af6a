//! Cart model
//!
//! Purely local state. Each line captures the unit price at the moment the
//! item was first added; later catalog refreshes never reprice the cart.
//!
//! Prices and quantities are bounded on the way in, so subtotals and totals
//! stay far below `Decimal::MAX` and the derived reads cannot overflow.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use shared::models::{MenuItem, OrderItem};

use crate::catalog::MenuCatalog;
use crate::error::{ClientError, ClientResult};

/// Maximum accepted unit price
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// One cart line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: i32,
    /// Unit price captured when the line was created
    pub unit_price: Decimal,
    pub special_instructions: Option<String>,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn to_order_item(&self) -> OrderItem {
        OrderItem {
            menu_item_id: self.menu_item_id.clone(),
            quantity: self.quantity,
            special_instructions: self.special_instructions.clone(),
            price: self.unit_price,
        }
    }
}

fn valid_quantity(quantity: i64) -> ClientResult<i32> {
    if (1..=i64::from(MAX_QUANTITY)).contains(&quantity) {
        Ok(quantity as i32)
    } else {
        Err(ClientError::InvalidQuantity(quantity))
    }
}

fn valid_price(item: &MenuItem) -> ClientResult<Decimal> {
    if item.price.is_sign_negative() || item.price > MAX_PRICE {
        return Err(ClientError::InvalidPrice {
            item_id: item.id.clone(),
            price: item.price,
        });
    }
    Ok(item.price)
}

/// Passenger cart
///
/// Lines are unique per menu item id and keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    special_request: String,
    seat: String,
    dietary_restrictions: BTreeSet<String>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `item`, merging into an existing line
    ///
    /// A merged line may not grow past [`MAX_QUANTITY`]; an item priced
    /// outside `0..=MAX_PRICE` is refused. Either way the cart is unchanged.
    pub fn add(&mut self, item: &MenuItem, quantity: i32) -> ClientResult<()> {
        let quantity = valid_quantity(i64::from(quantity))?;

        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = valid_quantity(i64::from(line.quantity) + i64::from(quantity))?;
            return Ok(());
        }

        let unit_price = valid_price(item)?;
        self.lines.push(CartLine {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            quantity,
            unit_price,
            special_instructions: None,
        });
        Ok(())
    }

    /// Add a single unit of `item`
    pub fn add_one(&mut self, item: &MenuItem) -> ClientResult<()> {
        self.add(item, 1)
    }

    /// Remove the line for `menu_item_id`; `false` if there was none
    pub fn remove(&mut self, menu_item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.menu_item_id != menu_item_id);
        self.lines.len() != before
    }

    /// Set the quantity of an existing line; `Ok(false)` if there is no such line
    pub fn set_quantity(&mut self, menu_item_id: &str, quantity: i32) -> ClientResult<bool> {
        let quantity = valid_quantity(i64::from(quantity))?;
        match self.line_mut(menu_item_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Set or clear per-line instructions; `false` if there is no such line
    pub fn set_instructions(&mut self, menu_item_id: &str, text: Option<String>) -> bool {
        match self.line_mut(menu_item_id) {
            Some(line) => {
                line.special_instructions = text.filter(|t| !t.trim().is_empty());
                true
            }
            None => false,
        }
    }

    pub fn set_special_request(&mut self, text: impl Into<String>) {
        self.special_request = text.into();
    }

    pub fn special_request(&self) -> &str {
        &self.special_request
    }

    pub fn set_seat(&mut self, seat: impl Into<String>) {
        self.seat = seat.into();
    }

    pub fn seat(&self) -> &str {
        &self.seat
    }

    /// `true` if the tag was not already present
    pub fn add_dietary_restriction(&mut self, tag: impl Into<String>) -> bool {
        self.dietary_restrictions.insert(tag.into())
    }

    pub fn remove_dietary_restriction(&mut self, tag: &str) -> bool {
        self.dietary_restrictions.remove(tag)
    }

    pub fn dietary_restrictions(&self) -> &BTreeSet<String> {
        &self.dietary_restrictions
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, menu_item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.menu_item_id == menu_item_id)
    }

    fn line_mut(&mut self, menu_item_id: &str) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.menu_item_id == menu_item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of unit price times quantity over all lines
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Total number of units
    pub fn count(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.quantity)).sum()
    }

    /// Empty the cart after a completed order
    ///
    /// Lines, special request and dietary tags go; the seat stays.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.special_request.clear();
        self.dietary_restrictions.clear();
    }

    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lines.iter().map(CartLine::to_order_item).collect()
    }

    /// Ids of lines whose item is absent from `items`
    pub fn missing_from<'a>(&'a self, items: &[MenuItem]) -> Vec<&'a str> {
        self.lines
            .iter()
            .filter(|line| !items.iter().any(|item| item.id == line.menu_item_id))
            .map(|line| line.menu_item_id.as_str())
            .collect()
    }

    /// Ids of lines that a refreshed catalog no longer offers
    ///
    /// Informational only; the cart is left as it is.
    pub fn reconcile<'a>(&'a self, catalog: &MenuCatalog) -> Vec<&'a str> {
        self.missing_from(catalog.items())
    }
}
