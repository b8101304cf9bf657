//! # kot-core: Pure Business Logic for KOT Station
//!
//! This crate is the **heart** of KOT Station. It contains the order
//! aggregation rules and the ticket renderer as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KOT Station Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Station (console / frontend)                 │   │
//! │  │      Menu ──► Current Order ──► Preview KOT / Print KOT        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kot-service                                  │   │
//! │  │    OrderAggregator, DocumentPipeline, TicketLifecycle          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kot-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   menu    │  │   order   │  │  ticket   │  │ validation│  │   │
//! │  │   │ MenuItem  │  │   Order   │  │  render   │  │   rules   │  │   │
//! │  │   │ Catalog   │  │ OrderLine │  │ Document  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO PRINTERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`menu`] - Static menu catalog (MenuItem, MenuCatalog)
//! - [`order`] - Order aggregate with the one-line-per-item merge rule
//! - [`ticket`] - Kitchen Order Ticket renderer (TicketDocument)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use kot_core::{render, MenuCatalog, Order};
//!
//! let menu = MenuCatalog::default();
//! let mut order = Order::new("1", "John", "KOT42");
//!
//! let burger = menu.get(1).unwrap();
//! order.add_item(burger);
//! order.add_item(burger);
//! order.add_item(menu.get(2).unwrap());
//!
//! let ticket = render(&order, Utc::now()).unwrap();
//! assert_eq!(ticket.total_items, 3);
//! assert_eq!(ticket.lines[0].label(), "2x Burger");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod menu;
pub mod money;
pub mod order;
pub mod ticket;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use menu::{MenuCatalog, MenuItem};
pub use money::Money;
pub use order::{generate_order_no, Order, OrderLine, OrderNumbering};
pub use ticket::{render, render_now, TicketDocument, TicketLine};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every ticket number ("KOT" + numeric suffix).
pub const DEFAULT_ORDER_NO_PREFIX: &str = "KOT";

/// Exclusive upper bound of the random ticket number suffix.
///
/// Collisions only affect what is shown on the slip, never how lines are
/// merged, so a small range is acceptable.
pub const DEFAULT_ORDER_NO_RANGE: u32 = 1000;

/// Table a fresh station serves until told otherwise.
pub const DEFAULT_TABLE_NO: &str = "1";

/// Waiter a fresh station is signed in as until told otherwise.
pub const DEFAULT_WAITER: &str = "John";

/// Heading printed at the top of every ticket.
pub const TICKET_TITLE: &str = "KITCHEN ORDER TICKET";
