//! Menu filtering
//!
//! Pure and lazy: [`apply_filter`] borrows the catalog items and yields the
//! matching ones in catalog order. The iterator is `Clone`, so a view can be
//! re-walked without refiltering from scratch.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use shared::models::{CabinClass, MenuCategory, MenuItem};

/// Category selector; `All` disables the category check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MenuCategory),
}

impl CategoryFilter {
    pub fn admits(&self, category: MenuCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }
}

/// Filter criteria for a menu view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub cabin_class: CabinClass,
    /// Tags of which an item must carry at least one; empty admits everything
    pub dietary_restrictions: BTreeSet<String>,
    /// Inclusive `(low, high)` unit price bounds
    pub price_range: (Decimal, Decimal),
    pub category: CategoryFilter,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            cabin_class: CabinClass::Economy,
            dietary_restrictions: BTreeSet::new(),
            price_range: (Decimal::ZERO, Decimal::ONE_HUNDRED),
            category: CategoryFilter::All,
        }
    }
}

impl FilterSpec {
    pub fn for_cabin(cabin_class: CabinClass) -> Self {
        Self {
            cabin_class,
            ..Self::default()
        }
    }

    pub fn with_dietary<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dietary_restrictions = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_range(mut self, low: Decimal, high: Decimal) -> Self {
        self.price_range = (low, high);
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Whether `item` passes every criterion
    pub fn matches(&self, item: &MenuItem) -> bool {
        let (low, high) = self.price_range;
        item.cabin_class == self.cabin_class
            && self.category.admits(item.category)
            && item.price >= low
            && item.price <= high
            && (self.dietary_restrictions.is_empty()
                || item.has_any_dietary_category(&self.dietary_restrictions))
    }
}

/// Lazy filtered view over menu items
#[derive(Debug, Clone)]
pub struct FilteredItems<'a> {
    items: std::slice::Iter<'a, MenuItem>,
    spec: &'a FilterSpec,
}

impl<'a> Iterator for FilteredItems<'a> {
    type Item = &'a MenuItem;

    fn next(&mut self) -> Option<Self::Item> {
        let spec = self.spec;
        self.items.find(|item| spec.matches(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

impl std::iter::FusedIterator for FilteredItems<'_> {}

/// Items from `items` that satisfy `spec`, in catalog order
pub fn apply_filter<'a>(items: &'a [MenuItem], spec: &'a FilterSpec) -> FilteredItems<'a> {
    FilteredItems {
        items: items.iter(),
        spec,
    }
}
