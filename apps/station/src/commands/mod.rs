//! # Commands Module
//!
//! All operations the console front end can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── order.rs    ◄─── Menu listing and live-order edits
//! └── ticket.rs   ◄─── Preview, print and share
//! ```
//!
//! Every command takes `&StationState` and returns `Result<Dto, ApiError>`,
//! so the console only formats results and never touches the order itself.

pub mod order;
pub mod ticket;

pub use order::{add_item, get_menu, get_order, remove_item, set_table, set_waiter, OrderResponse};
pub use ticket::{preview_ticket, print_ticket, share_ticket, PreviewResponse, PrintResponse};
