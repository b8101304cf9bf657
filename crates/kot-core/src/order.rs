//! # Order Aggregate
//!
//! The in-progress order a waiter builds from the menu.
//!
//! ## Merge Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Operations                                     │
//! │                                                                         │
//! │  Tap menu entry ─────────► add_item(item)                               │
//! │                              ├── id already present → quantity += 1     │
//! │                              └── new id            → push(qty = 1)      │
//! │                                                                         │
//! │  Tap order entry ────────► remove_item(id)                              │
//! │                              ├── present → whole line removed           │
//! │                              └── absent  → no-op                        │
//! │                                                                         │
//! │  Print completed ────────► reset(new_order_no)                          │
//! │                              └── items cleared, new number + timestamp  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per menu item id
//! - Every line has quantity >= 1 (a line is removed, never kept at zero)
//! - Lines keep first-add order

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::menu::MenuItem;
use crate::money::Money;
use crate::validation::{validate_table_no, validate_waiter};
use crate::{DEFAULT_ORDER_NO_PREFIX, DEFAULT_ORDER_NO_RANGE, DEFAULT_TABLE_NO, DEFAULT_WAITER};

// =============================================================================
// Order Line
// =============================================================================

/// One distinct menu item within an order, with its aggregated quantity.
///
/// Item data is frozen at the moment the line is created, so the ticket
/// shows what the waiter saw when tapping the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Menu item id (unique within an order).
    pub id: u32,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Category at time of adding (frozen).
    pub category: String,

    /// Number of units ordered (>= 1).
    pub quantity: u32,
}

impl OrderLine {
    /// Creates a single-unit line from a menu item.
    pub fn from_item(item: &MenuItem) -> Self {
        OrderLine {
            id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            category: item.category.clone(),
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// The mutable order aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Lines in first-add order.
    pub items: Vec<OrderLine>,

    /// Serving table.
    pub table_no: String,

    /// Serving staff member.
    pub waiter: String,

    /// Ticket number, e.g. "KOT417".
    pub order_no: String,

    /// When the order was opened.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// Bumped by every change, so a print cycle can tell whether the order
    /// was edited after its snapshot was taken.
    pub revision: u64,

    /// Revision at which each item's line was last removed.
    #[serde(skip)]
    #[ts(skip)]
    removed_at: HashMap<u32, u64>,
}

impl Order {
    /// Opens a new empty order.
    pub fn new(table_no: impl Into<String>, waiter: impl Into<String>, order_no: impl Into<String>) -> Self {
        Order {
            items: Vec::new(),
            table_no: table_no.into(),
            waiter: waiter.into(),
            order_no: order_no.into(),
            timestamp: Utc::now(),
            revision: 0,
            removed_at: HashMap::new(),
        }
    }

    /// Adds one unit of a menu item.
    ///
    /// ## Behavior
    /// - If the item is already on the order: its quantity goes up by one
    /// - Otherwise: a new line with quantity 1 is appended
    pub fn add_item(&mut self, item: &MenuItem) {
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.items.push(OrderLine::from_item(item)),
        }
        self.revision += 1;
    }

    /// Removes the whole line for `item_id`, whatever its quantity.
    ///
    /// Returns `false` (and leaves the order untouched) when no such line
    /// exists.
    pub fn remove_item(&mut self, item_id: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.id != item_id);

        let removed = self.items.len() != before;
        if removed {
            self.revision += 1;
            self.removed_at.insert(item_id, self.revision);
        }
        removed
    }

    /// Clears all lines and starts a new ticket.
    ///
    /// Table and waiter are kept: the next ticket is usually for the same
    /// table.
    pub fn reset(&mut self, order_no: impl Into<String>) {
        self.items.clear();
        self.removed_at.clear();
        self.order_no = order_no.into();
        self.timestamp = Utc::now();
        self.revision += 1;
    }

    /// Changes the serving table.
    pub fn set_table(&mut self, table_no: &str) -> Result<(), ValidationError> {
        validate_table_no(table_no)?;
        self.table_no = table_no.trim().to_string();
        self.revision += 1;
        Ok(())
    }

    /// Changes the serving waiter.
    pub fn set_waiter(&mut self, waiter: &str) -> Result<(), ValidationError> {
        validate_waiter(waiter)?;
        self.waiter = waiter.trim().to_string();
        self.revision += 1;
        Ok(())
    }

    /// Checks if the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the line for a menu item, if present.
    pub fn line(&self, item_id: u32) -> Option<&OrderLine> {
        self.items.iter().find(|line| line.id == item_id)
    }

    /// Sum of all quantities (what the ticket prints as "Total Items").
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(OrderLine::line_total).sum()
    }

    /// Units added after `snapshot` was taken, as fresh lines.
    ///
    /// A line untouched by removals keeps the snapshot quantity on the
    /// printed ticket and only the surplus carries over. Once a line has
    /// been removed after the snapshot, its printed units are used up and
    /// every unit added back counts in full.
    pub fn carry_over_since(&self, snapshot: &Order) -> Vec<OrderLine> {
        self.items
            .iter()
            .filter_map(|line| {
                let removed_since = self
                    .removed_at
                    .get(&line.id)
                    .is_some_and(|&rev| rev > snapshot.revision);
                let printed = if removed_since {
                    0
                } else {
                    snapshot.line(line.id).map_or(0, |l| l.quantity)
                };
                let extra = line.quantity.saturating_sub(printed);
                (extra > 0).then(|| OrderLine {
                    quantity: extra,
                    ..line.clone()
                })
            })
            .collect()
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::new(DEFAULT_TABLE_NO, DEFAULT_WAITER, generate_order_no())
    }
}

// =============================================================================
// Ticket Numbers
// =============================================================================

/// How ticket numbers are formed: a fixed prefix plus a pseudo-random
/// suffix in `0..range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNumbering {
    pub prefix: String,
    pub range: u32,
}

impl OrderNumbering {
    pub fn new(prefix: impl Into<String>, range: u32) -> Self {
        OrderNumbering {
            prefix: prefix.into(),
            range,
        }
    }

    /// Draws a ticket number from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let suffix = rng.gen_range(0..self.range.max(1));
        format!("{}{}", self.prefix, suffix)
    }

    /// Draws a ticket number guaranteed to differ from `previous` whenever
    /// the range holds at least two values.
    pub fn next_after_with<R: Rng + ?Sized>(&self, previous: &str, rng: &mut R) -> String {
        let range = self.range.max(1);
        let suffix = rng.gen_range(0..range);
        let candidate = format!("{}{}", self.prefix, suffix);
        if candidate != previous {
            return candidate;
        }
        format!("{}{}", self.prefix, (suffix + 1) % range)
    }

    /// Draws a ticket number from the thread-local generator.
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Draws a ticket number different from `previous`.
    pub fn next_after(&self, previous: &str) -> String {
        self.next_after_with(previous, &mut rand::thread_rng())
    }
}

impl Default for OrderNumbering {
    fn default() -> Self {
        OrderNumbering::new(DEFAULT_ORDER_NO_PREFIX, DEFAULT_ORDER_NO_RANGE)
    }
}

/// Generates a ticket number with the default prefix and range.
///
/// Uniqueness is best-effort: collisions only affect what is shown on the
/// ticket, never how lines are merged.
pub fn generate_order_no() -> String {
    OrderNumbering::default().generate()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuCatalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_order() -> Order {
        Order::new("1", "John", "KOT1")
    }

    #[test]
    fn test_add_item_merges_by_id() {
        let menu = MenuCatalog::default();
        let mut order = test_order();

        let burger = menu.get(1).unwrap();
        let fries = menu.get(2).unwrap();
        order.add_item(burger);
        order.add_item(fries);
        order.add_item(burger);
        order.add_item(burger);

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.line(1).map(|l| l.quantity), Some(3));
        assert_eq!(order.line(2).map(|l| l.quantity), Some(1));
        // First-add order is kept
        assert_eq!(order.items[0].id, 1);
        assert_eq!(order.items[1].id, 2);
    }

    #[test]
    fn test_quantity_equals_number_of_adds() {
        let menu = MenuCatalog::default();
        let mut order = test_order();
        let taps = [3, 1, 3, 4, 1, 3, 2, 4, 3];

        for id in taps {
            order.add_item(menu.get(id).unwrap());
        }

        for line in &order.items {
            let expected = taps.iter().filter(|&&id| id == line.id).count() as u32;
            assert_eq!(line.quantity, expected, "line {}", line.name);
        }
        let mut ids: Vec<_> = order.items.iter().map(|l| l.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), order.items.len());
        assert_eq!(order.total_items(), taps.len() as u32);
    }

    #[test]
    fn test_remove_item_drops_whole_line() {
        let menu = MenuCatalog::default();
        let mut order = test_order();
        order.add_item(menu.get(1).unwrap());
        order.add_item(menu.get(1).unwrap());
        order.add_item(menu.get(3).unwrap());

        assert!(order.remove_item(1));
        assert!(order.line(1).is_none());
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_remove_absent_item_is_noop() {
        let menu = MenuCatalog::default();
        let mut order = test_order();
        order.add_item(menu.get(2).unwrap());
        let before = order.clone();

        assert!(!order.remove_item(4));
        assert_eq!(order, before);
    }

    #[test]
    fn test_reset_clears_items_and_renumbers() {
        let menu = MenuCatalog::default();
        let mut order = test_order();
        order.add_item(menu.get(1).unwrap());
        let opened = order.timestamp;

        order.reset("KOT2");

        assert!(order.is_empty());
        assert_eq!(order.order_no, "KOT2");
        assert!(order.timestamp >= opened);
        assert_eq!(order.table_no, "1");
        assert_eq!(order.waiter, "John");
    }

    #[test]
    fn test_totals() {
        let menu = MenuCatalog::default();
        let mut order = test_order();
        order.add_item(menu.get(1).unwrap()); // 5.00
        order.add_item(menu.get(1).unwrap()); // 5.00
        order.add_item(menu.get(4).unwrap()); // 12.00

        assert_eq!(order.total_items(), 3);
        assert_eq!(order.subtotal().cents(), 2200);
        assert_eq!(order.line(1).map(|l| l.line_total().cents()), Some(1000));
    }

    #[test]
    fn test_set_table_and_waiter() {
        let mut order = test_order();
        order.set_table(" 7 ").unwrap();
        order.set_waiter("Maria").unwrap();
        assert_eq!(order.table_no, "7");
        assert_eq!(order.waiter, "Maria");

        assert!(order.set_table("").is_err());
        assert_eq!(order.table_no, "7");
    }

    #[test]
    fn test_carry_over_since_snapshot() {
        let menu = MenuCatalog::default();
        let mut order = test_order();
        order.add_item(menu.get(1).unwrap());
        order.add_item(menu.get(2).unwrap());
        let snapshot = order.clone();

        // Edits made while the snapshot is being printed
        order.add_item(menu.get(1).unwrap());
        order.add_item(menu.get(3).unwrap());
        order.remove_item(2);

        let carried = order.carry_over_since(&snapshot);
        assert_eq!(carried.len(), 2);
        assert_eq!((carried[0].id, carried[0].quantity), (1, 1));
        assert_eq!((carried[1].id, carried[1].quantity), (3, 1));
        assert!(snapshot.carry_over_since(&snapshot).is_empty());
    }

    #[test]
    fn test_carry_over_counts_re_added_line_in_full() {
        let menu = MenuCatalog::default();
        let mut order = test_order();
        order.add_item(menu.get(1).unwrap());
        order.add_item(menu.get(1).unwrap());
        let snapshot = order.clone();

        order.remove_item(1);
        order.add_item(menu.get(1).unwrap());

        let carried = order.carry_over_since(&snapshot);
        assert_eq!(carried.len(), 1);
        assert_eq!((carried[0].id, carried[0].quantity), (1, 1));
    }

    #[test]
    fn test_reset_forgets_removals() {
        let menu = MenuCatalog::default();
        let mut order = test_order();
        order.add_item(menu.get(2).unwrap());
        order.remove_item(2);
        order.reset("KOT9");

        order.add_item(menu.get(2).unwrap());
        order.add_item(menu.get(2).unwrap());
        let snapshot = order.clone();
        order.add_item(menu.get(2).unwrap());

        let carried = order.carry_over_since(&snapshot);
        assert_eq!((carried[0].id, carried[0].quantity), (2, 1));
    }

    #[test]
    fn test_order_numbering_format() {
        let numbering = OrderNumbering::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let no = numbering.generate_with(&mut rng);
            let suffix: u32 = no.strip_prefix("KOT").unwrap().parse().unwrap();
            assert!(suffix < 1000);
        }
    }

    #[test]
    fn test_next_after_always_differs() {
        let numbering = OrderNumbering::new("KOT", 2);
        let mut rng = StdRng::seed_from_u64(11);
        let mut previous = numbering.generate_with(&mut rng);

        for _ in 0..50 {
            let next = numbering.next_after_with(&previous, &mut rng);
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_default_order() {
        let order = Order::default();
        assert!(order.is_empty());
        assert_eq!(order.table_no, DEFAULT_TABLE_NO);
        assert_eq!(order.waiter, DEFAULT_WAITER);
        assert!(order.order_no.starts_with(DEFAULT_ORDER_NO_PREFIX));
    }
}
