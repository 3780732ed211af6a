//! Menu Model

use super::{Flight, MealSlot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Cabin class a menu item is served in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::PremiumEconomy => "premium_economy",
            Self::Business => "business",
            Self::First => "first",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a cabin class or menu category name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field}: {value}")]
pub struct ParseMenuFieldError {
    pub field: &'static str,
    pub value: String,
}

impl FromStr for CabinClass {
    type Err = ParseMenuFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(Self::Economy),
            "premium_economy" => Ok(Self::PremiumEconomy),
            "business" => Ok(Self::Business),
            "first" => Ok(Self::First),
            other => Err(ParseMenuFieldError {
                field: "cabin class",
                value: other.to_string(),
            }),
        }
    }
}

/// Course a menu item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    Main,
    Side,
    Dessert,
    Beverage,
}

impl MenuCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Side => "side",
            Self::Dessert => "dessert",
            Self::Beverage => "beverage",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuCategory {
    type Err = ParseMenuFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Self::Main),
            "side" => Ok(Self::Side),
            "dessert" => Ok(Self::Dessert),
            "beverage" => Ok(Self::Beverage),
            other => Err(ParseMenuFieldError {
                field: "menu category",
                value: other.to_string(),
            }),
        }
    }
}

/// Nutrition facts per serving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NutritionalInfo {
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Menu item entity
///
/// Immutable once fetched; a refetch replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: MenuCategory,
    pub cabin_class: CabinClass,
    #[serde(default)]
    pub allergens: BTreeSet<String>,
    #[serde(default)]
    pub dietary_categories: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<NutritionalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub available: bool,
    #[serde(default)]
    pub stock_quantity: u32,
}

impl MenuItem {
    /// Whether the item carries at least one of the given dietary tags
    pub fn has_any_dietary_category<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter()
            .any(|tag| self.dietary_categories.contains(tag))
    }

    /// Orderable right now according to the last fetch
    pub fn is_in_stock(&self) -> bool {
        self.available && self.stock_quantity > 0
    }
}

/// Payload of `GET /menu`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub menu: Vec<MenuItem>,
    pub meal_slots: Vec<MealSlot>,
    pub flight: Flight,
}
