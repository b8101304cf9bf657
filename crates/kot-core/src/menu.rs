//! # Menu Catalog
//!
//! The static, read-only list of orderable items.
//!
//! The catalog is built once at process start (from the house defaults or
//! from the station configuration) and never mutated afterwards. Every
//! OrderLine keeps its own frozen copy of the item it was created from.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_category, validate_item_id, validate_item_name, validate_price};

// =============================================================================
// Menu Item
// =============================================================================

/// An orderable menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Unique positive identifier.
    pub id: u32,

    /// Display name printed on the ticket.
    pub name: String,

    /// Unit price (non-negative).
    pub price: Money,

    /// Category label used to group the menu on screen.
    pub category: String,
}

impl MenuItem {
    /// Creates a menu item. Call [`MenuItem::validate`] (or build a
    /// [`MenuCatalog`]) before trusting externally supplied values.
    pub fn new(id: u32, name: impl Into<String>, price: Money, category: impl Into<String>) -> Self {
        MenuItem {
            id,
            name: name.into(),
            price,
            category: category.into(),
        }
    }

    /// Checks id, name, price and category.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_item_id(self.id)?;
        validate_item_name(&self.name)?;
        validate_price(self.price)?;
        validate_category(&self.category)?;
        Ok(())
    }
}

// =============================================================================
// Menu Catalog
// =============================================================================

/// The full menu offered by a station.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    /// Builds a catalog, rejecting invalid entries and duplicate ids.
    pub fn new(items: Vec<MenuItem>) -> Result<Self, ValidationError> {
        let mut ids = HashSet::with_capacity(items.len());

        for item in &items {
            item.validate()?;
            if !ids.insert(item.id) {
                return Err(ValidationError::Duplicate {
                    field: "menu item id".to_string(),
                    value: item.id.to_string(),
                });
            }
        }

        Ok(MenuCatalog { items })
    }

    /// Looks up an item by id.
    pub fn get(&self, id: u32) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items in menu order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct categories in the order they first appear on the menu.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Items belonging to one category, in menu order.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.items.iter().filter(move |item| item.category == category)
    }
}

/// The house menu.
impl Default for MenuCatalog {
    fn default() -> Self {
        MenuCatalog {
            items: vec![
                MenuItem::new(1, "Burger", Money::from_major(5), "Fast Food"),
                MenuItem::new(2, "Fries", Money::from_major(3), "Sides"),
                MenuItem::new(3, "Coke", Money::from_major(2), "Beverages"),
                MenuItem::new(4, "Pizza", Money::from_major(12), "Fast Food"),
            ],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
