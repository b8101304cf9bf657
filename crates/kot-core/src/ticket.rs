//! # Ticket Renderer
//!
//! Turns an [`Order`] snapshot into a [`TicketDocument`], the immutable
//! Kitchen Order Ticket handed to the document pipeline.
//!
//! ## Ticket Layout
//! ```text
//! ┌────────────────────────────────┐
//! │      KITCHEN ORDER TICKET      │
//! │Order #: KOT417       Table #: 1│
//! │Waiter: John      Time: 12:30:05│
//! │--------------------------------│
//! │2x Burger                       │
//! │1x Fries                        │
//! │--------------------------------│
//! │Total Items                    3│
//! │  Printed: 2026-10-19 12:31:40  │
//! └────────────────────────────────┘
//! ```
//!
//! Rendering is pure: the same order and print time always produce the same
//! document. The print time is supplied by the caller and is distinct from
//! the order's opening time.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::order::Order;
use crate::validation::validate_order_lines;
use crate::TICKET_TITLE;

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Ticket Document
// =============================================================================

/// One itemized ticket row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketLine {
    pub quantity: u32,
    pub name: String,
}

impl TicketLine {
    /// The row as printed, e.g. `2x Burger`.
    pub fn label(&self) -> String {
        format!("{}x {}", self.quantity, self.name)
    }
}

/// The rendered, immutable Kitchen Order Ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TicketDocument {
    pub title: String,
    pub order_no: String,
    pub table_no: String,
    pub waiter: String,

    /// When the order was opened.
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    /// Rows in the order's first-add order.
    pub lines: Vec<TicketLine>,

    /// Sum of all quantities.
    pub total_items: u32,

    /// When this document was rendered.
    #[ts(as = "String")]
    pub printed_at: DateTime<Utc>,
}

/// Renders an order into a ticket document.
///
/// ## Errors
/// - [`CoreError::EmptyOrder`] if the order has no lines
/// - [`CoreError::Validation`] if the order breaks the merge invariants
///   (duplicate ids, zero quantities); the aggregator never produces such an
///   order, so this indicates a bug upstream
pub fn render(order: &Order, printed_at: DateTime<Utc>) -> CoreResult<TicketDocument> {
    if order.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    validate_order_lines(&order.items)?;

    let lines = order
        .items
        .iter()
        .map(|line| TicketLine {
            quantity: line.quantity,
            name: line.name.clone(),
        })
        .collect();

    Ok(TicketDocument {
        title: TICKET_TITLE.to_string(),
        order_no: order.order_no.clone(),
        table_no: order.table_no.clone(),
        waiter: order.waiter.clone(),
        opened_at: order.timestamp,
        lines,
        total_items: order.total_items(),
        printed_at,
    })
}

/// Renders an order stamped with the current time.
pub fn render_now(order: &Order) -> CoreResult<TicketDocument> {
    render(order, Utc::now())
}

impl TicketDocument {
    /// Opening time as printed in the header (local wall clock).
    pub fn opened_time_display(&self) -> String {
        self.opened_at.with_timezone(&Local).format(TIME_FORMAT).to_string()
    }

    /// Print time as printed in the footer (local wall clock).
    pub fn printed_at_display(&self) -> String {
        self.printed_at
            .with_timezone(&Local)
            .format(DATE_TIME_FORMAT)
            .to_string()
    }

    /// HTML markup handed to the document render service.
    ///
    /// Every interpolated value is escaped; item names and staff names come
    /// from configuration and operator input.
    pub fn to_markup(&self) -> String {
        let items: String = self
            .lines
            .iter()
            .map(|line| {
                format!(
                    "      <div class=\"item\"><strong>{}x</strong> {}</div>\n",
                    line.quantity,
                    escape_html(&line.name)
                )
            })
            .collect();

        format!(
            r#"<html>
  <head>
    <style>
      body {{ font-family: 'Courier New', Courier, monospace; padding: 20px; }}
      .header {{ text-align: center; margin-bottom: 10px; }}
      .divider {{ border-top: 1px dashed black; margin: 10px 0; }}
      .item {{ margin: 5px 0; font-size: 14px; }}
      .footer {{ text-align: center; margin-top: 10px; font-size: 12px; }}
    </style>
  </head>
  <body>
    <div class="header">
      <h2>{title}</h2>
      <p>Order #: {order_no}</p>
      <p>Table #: {table_no}</p>
      <p>Waiter: {waiter}</p>
      <p>Time: {opened}</p>
    </div>
    <div class="divider"></div>
{items}    <div class="divider"></div>
    <div class="footer">
      <p>Total Items: {total}</p>
      <p>Printed: {printed}</p>
    </div>
  </body>
</html>
"#,
            title = escape_html(&self.title),
            order_no = escape_html(&self.order_no),
            table_no = escape_html(&self.table_no),
            waiter = escape_html(&self.waiter),
            opened = self.opened_time_display(),
            items = items,
            total = self.total_items,
            printed = self.printed_at_display(),
        )
    }

    /// Plain-text slip for console previews and narrow thermal paper.
    pub fn to_text(&self, width: usize) -> String {
        let mut slip = TextSlip::new(width);

        slip.center(&self.title);
        slip.left_right(
            &format!("Order #: {}", self.order_no),
            &format!("Table #: {}", self.table_no),
        );
        slip.left_right(
            &format!("Waiter: {}", self.waiter),
            &format!("Time: {}", self.opened_time_display()),
        );
        slip.divider();
        for line in &self.lines {
            slip.left(&line.label());
        }
        slip.divider();
        slip.left_right("Total Items", &self.total_items.to_string());
        slip.center(&format!("Printed: {}", self.printed_at_display()));

        slip.finish()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Fixed-width line builder.
struct TextSlip {
    width: usize,
    out: String,
}

impl TextSlip {
    fn new(width: usize) -> Self {
        TextSlip {
            width: width.max(16),
            out: String::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        self.out.push_str(line.trim_end());
        self.out.push('\n');
    }

    fn left(&mut self, text: &str) {
        let line: String = text.chars().take(self.width).collect();
        self.push_line(&line);
    }

    fn center(&mut self, text: &str) {
        let len = text.chars().count();
        if len >= self.width {
            self.left(text);
            return;
        }
        let pad = (self.width - len) / 2;
        self.push_line(&format!("{}{}", " ".repeat(pad), text));
    }

    fn left_right(&mut self, left: &str, right: &str) {
        let used = left.chars().count() + right.chars().count();
        if used >= self.width {
            // No room on one line: stack them
            self.left(left);
            self.left(right);
            return;
        }
        self.push_line(&format!("{}{}{}", left, " ".repeat(self.width - used), right));
    }

    fn divider(&mut self) {
        let rule = "-".repeat(self.width);
        self.push_line(&rule);
    }

    fn finish(self) -> String {
        self.out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
