//! # Order Commands
//!
//! Commands that read or edit the live order.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐   add / remove   ┌──────────┐   print   ┌──────────────┐  │
//! │  │  Empty   │ ───────────────► │ In Order │ ────────► │ New ticket   │  │
//! │  │  order   │ ◄─────────────── │          │           │ (new number) │  │
//! │  └──────────┘   remove last    └──────────┘           └──────────────┘  │
//! │                                     │ ▲                                 │
//! │                                     └─┘ table / waiter / preview        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use kot_core::{MenuItem, Money, Order, OrderLine};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ErrorCode};
use crate::state::StationState;

/// The live order as the console shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_no: String,
    pub table_no: String,
    pub waiter: String,
    pub opened_at: DateTime<Utc>,
    pub items: Vec<OrderLine>,
    pub total_items: u32,
    pub subtotal: Money,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        OrderResponse {
            order_no: order.order_no.clone(),
            table_no: order.table_no.clone(),
            waiter: order.waiter.clone(),
            opened_at: order.timestamp,
            items: order.items.clone(),
            total_items: order.total_items(),
            subtotal: order.subtotal(),
        }
    }
}

/// Lists the menu in catalog order.
pub fn get_menu(state: &StationState) -> Vec<MenuItem> {
    state.aggregator().menu().items().to_vec()
}

/// Gets the current order.
pub fn get_order(state: &StationState) -> OrderResponse {
    state.aggregator().with_order(|order| OrderResponse::from(order))
}

/// Adds one unit of a menu item.
///
/// ## Behavior
/// - If the item is already on the order: its quantity increases
/// - Otherwise: it is appended as a new line
pub fn add_item(state: &StationState, item_id: u32) -> Result<OrderResponse, ApiError> {
    debug!(item_id, "add_item command");
    state.aggregator().add_item_by_id(item_id)?;
    Ok(get_order(state))
}

/// Removes the whole line for a menu item.
pub fn remove_item(state: &StationState, item_id: u32) -> Result<OrderResponse, ApiError> {
    debug!(item_id, "remove_item command");
    if !state.aggregator().remove_item(item_id) {
        return Err(ApiError::new(
            ErrorCode::NotFound,
            format!("Item {} is not on the order", item_id),
        ));
    }
    Ok(get_order(state))
}

pub fn set_table(state: &StationState, table_no: &str) -> Result<OrderResponse, ApiError> {
    state.aggregator().set_table(table_no)?;
    Ok(get_order(state))
}

pub fn set_waiter(state: &StationState, waiter: &str) -> Result<OrderResponse, ApiError> {
    state.aggregator().set_waiter(waiter)?;
    Ok(get_order(state))
}
