//! # Order Aggregator
//!
//! Single owner of the live [`Order`]. Every mutation goes through one
//! mutex, so adds and removes from any task are applied one at a time.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Aggregator                                   │
//! │                                                                         │
//! │  add_item / remove_item / set_table / set_waiter ──┐                    │
//! │                                                    ▼                    │
//! │                                          Mutex<Order> (short hold)      │
//! │                                                    │                    │
//! │  snapshot() ─────► owned copy for a print cycle ◄──┘                    │
//! │                                                                         │
//! │  complete_cycle(snapshot):                                              │
//! │    new ticket number, clear lines, re-add units added since snapshot    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is never held across an `.await`; a print cycle that is stuck
//! on a printer never blocks the waiter from adding items.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kot_core::{CoreError, CoreResult, MenuCatalog, MenuItem, Order, OrderLine, OrderNumbering, ValidationError};
use tracing::debug;

/// Live order plus the menu it is built from.
#[derive(Debug)]
pub struct OrderAggregator {
    order: Mutex<Order>,
    menu: Arc<MenuCatalog>,
    numbering: OrderNumbering,
}

impl OrderAggregator {
    /// Opens the first order for the given table and waiter.
    pub fn new(
        menu: Arc<MenuCatalog>,
        numbering: OrderNumbering,
        table_no: impl Into<String>,
        waiter: impl Into<String>,
    ) -> Self {
        let order = Order::new(table_no, waiter, numbering.generate());
        debug!(order_no = %order.order_no, "Order opened");
        OrderAggregator {
            order: Mutex::new(order),
            menu,
            numbering,
        }
    }

    pub fn menu(&self) -> &MenuCatalog {
        &self.menu
    }

    fn lock(&self) -> MutexGuard<'_, Order> {
        // A panic mid-mutation cannot leave an Order half-updated in a way
        // that breaks its invariants, so the poisoned value is still usable.
        self.order.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the order.
    pub fn with_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Order) -> R,
    {
        f(&self.lock())
    }

    /// Adds one unit of `item`, merging with an existing line.
    pub fn add_item(&self, item: &MenuItem) -> OrderLine {
        let mut order = self.lock();
        order.add_item(item);
        let line = order
            .line(item.id)
            .cloned()
            .unwrap_or_else(|| OrderLine::from_item(item));
        debug!(item_id = item.id, quantity = line.quantity, "Item added");
        line
    }

    /// Adds one unit of the menu item with `item_id`.
    pub fn add_item_by_id(&self, item_id: u32) -> CoreResult<OrderLine> {
        let item = self
            .menu
            .get(item_id)
            .ok_or(CoreError::MenuItemNotFound(item_id))?;
        Ok(self.add_item(item))
    }

    /// Removes the whole line for `item_id`. Returns `false` when absent.
    pub fn remove_item(&self, item_id: u32) -> bool {
        let removed = self.lock().remove_item(item_id);
        debug!(item_id, removed, "Item removed");
        removed
    }

    /// Clears the order and assigns a fresh ticket number, which is
    /// returned.
    pub fn reset(&self) -> String {
        let mut order = self.lock();
        let order_no = self.numbering.next_after(&order.order_no);
        order.reset(order_no.clone());
        debug!(%order_no, "Order reset");
        order_no
    }

    pub fn set_table(&self, table_no: &str) -> Result<(), ValidationError> {
        self.lock().set_table(table_no)
    }

    pub fn set_waiter(&self, waiter: &str) -> Result<(), ValidationError> {
        self.lock().set_waiter(waiter)
    }

    /// Owned copy of the order as it is right now.
    pub fn snapshot(&self) -> Order {
        self.lock().clone()
    }

    /// Starts the next ticket after `printed` went out.
    ///
    /// Units added while the cycle was in flight are carried over to the
    /// new ticket instead of being lost with the reset. Returns the new
    /// ticket number.
    pub fn complete_cycle(&self, printed: &Order) -> String {
        let mut order = self.lock();
        let carried = if order.revision == printed.revision {
            Vec::new()
        } else {
            order.carry_over_since(printed)
        };

        let order_no = self.numbering.next_after(&printed.order_no);
        order.reset(order_no.clone());
        let carried_units: u32 = carried.iter().map(|line| line.quantity).sum();
        order.items = carried;

        debug!(%order_no, carried_units, "Print cycle completed");
        order_no
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator() -> OrderAggregator {
        OrderAggregator::new(
            Arc::new(MenuCatalog::default()),
            OrderNumbering::default(),
            "1",
            "John",
        )
    }

    #[test]
    fn test_add_merges_lines() {
        let agg = aggregator();
        agg.add_item_by_id(1).unwrap();
        let line = agg.add_item_by_id(1).unwrap();
        agg.add_item_by_id(2).unwrap();

        assert_eq!(line.quantity, 2);
        agg.with_order(|order| {
            assert_eq!(order.items.len(), 2);
            assert_eq!(order.items[0].name, "Burger");
            assert_eq!(order.total_items(), 3);
        });
    }

    #[test]
    fn test_add_unknown_item() {
        let agg = aggregator();
        assert!(matches!(
            agg.add_item_by_id(99),
            Err(CoreError::MenuItemNotFound(99))
        ));
        assert!(agg.snapshot().is_empty());
    }

    #[test]
    fn test_remove_whole_line() {
        let agg = aggregator();
        agg.add_item_by_id(1).unwrap();
        agg.add_item_by_id(1).unwrap();

        assert!(agg.remove_item(1));
        assert!(agg.snapshot().line(1).is_none());
        assert!(!agg.remove_item(1));
    }

    #[test]
    fn test_reset_keeps_table_and_changes_number() {
        let agg = aggregator();
        agg.set_table("12").unwrap();
        agg.add_item_by_id(3).unwrap();
        let before = agg.snapshot().order_no;

        let after = agg.reset();

        let order = agg.snapshot();
        assert!(order.is_empty());
        assert_eq!(order.table_no, "12");
        assert_eq!(order.order_no, after);
        assert_ne!(before, after);
        assert!(after.starts_with("KOT"));
    }

    #[test]
    fn test_set_waiter_rejects_blank() {
        let agg = aggregator();
        assert!(agg.set_waiter("   ").is_err());
        assert_eq!(agg.snapshot().waiter, "John");
    }

    #[test]
    fn test_complete_cycle_without_edits() {
        let agg = aggregator();
        agg.add_item_by_id(1).unwrap();
        let printed = agg.snapshot();

        let next = agg.complete_cycle(&printed);

        let order = agg.snapshot();
        assert!(order.is_empty());
        assert_eq!(order.order_no, next);
        assert_ne!(next, printed.order_no);
    }

    #[test]
    fn test_complete_cycle_carries_late_additions() {
        let agg = aggregator();
        agg.add_item_by_id(1).unwrap();
        let printed = agg.snapshot();

        agg.add_item_by_id(1).unwrap();
        agg.add_item_by_id(4).unwrap();
        agg.complete_cycle(&printed);

        let order = agg.snapshot();
        assert_eq!(order.line(1).map(|l| l.quantity), Some(1));
        assert_eq!(order.line(4).map(|l| l.quantity), Some(1));
        assert_eq!(order.total_items(), 2);
    }

    #[test]
    fn test_complete_cycle_keeps_line_re_added_mid_print() {
        let agg = aggregator();
        agg.add_item_by_id(1).unwrap();
        agg.add_item_by_id(1).unwrap();
        let printed = agg.snapshot();

        agg.remove_item(1);
        agg.add_item_by_id(1).unwrap();
        agg.complete_cycle(&printed);

        let order = agg.snapshot();
        assert_eq!(order.line(1).map(|l| l.quantity), Some(1));
        assert_eq!(order.total_items(), 1);
    }

    #[test]
    fn test_concurrent_adds_are_all_applied() {
        let agg = Arc::new(aggregator());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let agg = agg.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        agg.add_item_by_id(2).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(agg.snapshot().line(2).map(|l| l.quantity), Some(200));
    }
}
