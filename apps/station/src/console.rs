//! # Console Front End
//!
//! Line-oriented command loop over any async reader/writer pair.
//!
//! ```text
//! kot> add 1
//! KOT417  table 1  waiter John
//!     1x Burger                      $5.00
//!   1 items, subtotal $5.00
//! kot> print
//!       KITCHEN ORDER TICKET
//! Order #: KOT417       Table #: 1
//! ...
//! [Success] KOT printed successfully! Would you like to share the PDF?
//! share? [y/N] y
//! shared: /…/shared/KOT_KOT417_1760000000123.html
//! ```

use std::io;
use std::str::FromStr;

use kot_service::{NoticeLevel, ShareOffer};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, info};

use crate::commands::{self, OrderResponse};
use crate::error::{ApiError, ErrorCode};
use crate::state::StationState;

const PROMPT: &str = "kot> ";

const HELP: &str = "\
commands:
  menu             list the menu
  order [json]     show the current order
  add <id>         add one unit of a menu item
  remove <id>      remove an item's whole line
  table <no>       set the table
  waiter <name>    set the waiter
  preview          preview the ticket (order is kept)
  print            print the ticket and start a new order
  help             show this help
  quit             leave the station
";

// =============================================================================
// Command Parsing
// =============================================================================

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Menu,
    Order { json: bool },
    Add(u32),
    Remove(u32),
    Table(String),
    Waiter(String),
    Preview,
    Print,
    Help,
    Quit,
}

fn parse_item_id(arg: &str) -> Result<u32, ApiError> {
    arg.parse()
        .map_err(|_| ApiError::validation(format!("'{}' is not a menu item id", arg)))
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str, ApiError> {
    if arg.is_empty() {
        return Err(ApiError::validation(format!("usage: {}", usage)));
    }
    Ok(arg)
}

impl FromStr for Command {
    type Err = ApiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_lowercase().as_str() {
            "menu" | "m" => Ok(Command::Menu),
            "order" | "o" => Ok(Command::Order {
                json: rest.eq_ignore_ascii_case("json"),
            }),
            "add" | "a" => parse_item_id(required(rest, "add <id>")?).map(Command::Add),
            "remove" | "rm" => parse_item_id(required(rest, "remove <id>")?).map(Command::Remove),
            "table" => Ok(Command::Table(required(rest, "table <no>")?.to_string())),
            "waiter" => Ok(Command::Waiter(required(rest, "waiter <name>")?.to_string())),
            "preview" => Ok(Command::Preview),
            "print" | "p" => Ok(Command::Print),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ApiError::new(
                ErrorCode::UnknownCommand,
                format!("unknown command '{}' (try 'help')", other),
            )),
        }
    }
}

// =============================================================================
// Console Loop
// =============================================================================

/// Reads commands from `R`, writes results to `W`.
pub struct Console<R, W> {
    lines: Lines<R>,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Console {
            lines: input.lines(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `quit` or end of input.
    pub async fn run(&mut self, state: &StationState) -> io::Result<()> {
        self.write(&format!(
            "KOT station - table {}, waiter {}. Type 'help' for commands.\n",
            state.config().station.table_no,
            state.config().station.waiter
        ))
        .await?;

        loop {
            self.write(PROMPT).await?;
            let Some(line) = self.lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let keep_going = match line.parse::<Command>() {
                Ok(command) => {
                    debug!(?command, "Console command");
                    let result = self.execute(state, command).await;
                    self.report(state, result).await?
                }
                Err(e) => self.report(state, Err(e)).await?,
            };
            if !keep_going {
                break;
            }
        }

        info!("Station closed");
        Ok(())
    }

    /// Runs one command. `Ok(false)` ends the loop.
    async fn execute(&mut self, state: &StationState, command: Command) -> Result<bool, ApiError> {
        match command {
            Command::Menu => {
                let text = menu_text(state);
                self.write(&text).await.map_err(io_error)?;
            }
            Command::Order { json } => {
                let order = commands::get_order(state);
                let text = if json {
                    serde_json::to_string_pretty(&order)
                        .map(|s| s + "\n")
                        .map_err(|e| ApiError::internal(e.to_string()))?
                } else {
                    order_text(&order, &state.config().ticket.currency_symbol)
                };
                self.write(&text).await.map_err(io_error)?;
            }
            Command::Add(id) => {
                let order = commands::add_item(state, id)?;
                self.write_order(&order, state).await?;
            }
            Command::Remove(id) => {
                let order = commands::remove_item(state, id)?;
                self.write_order(&order, state).await?;
            }
            Command::Table(table_no) => {
                let order = commands::set_table(state, &table_no)?;
                self.write(&format!("table set to {}\n", order.table_no))
                    .await
                    .map_err(io_error)?;
            }
            Command::Waiter(waiter) => {
                let order = commands::set_waiter(state, &waiter)?;
                self.write(&format!("waiter set to {}\n", order.waiter))
                    .await
                    .map_err(io_error)?;
            }
            Command::Preview => {
                let preview = commands::preview_ticket(state).await?;
                self.write(&format!(
                    "{}document: {}\n",
                    preview.slip,
                    preview.document_path.display()
                ))
                .await
                .map_err(io_error)?;
            }
            Command::Print => {
                let printed = commands::print_ticket(state).await?;
                self.write(&format!(
                    "{}printed {} ({} items), next ticket {}\n",
                    printed.slip, printed.printed_order_no, printed.total_items, printed.next_order_no
                ))
                .await
                .map_err(io_error)?;
                self.flush_notices(state).await.map_err(io_error)?;
                self.offer_share(printed.share_offer).await?;
            }
            Command::Help => self.write(HELP).await.map_err(io_error)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Asks whether to share; anything but `y`/`yes` declines.
    async fn offer_share(&mut self, offer: ShareOffer) -> Result<(), ApiError> {
        self.write("share? [y/N] ").await.map_err(io_error)?;
        let answer = self.lines.next_line().await.map_err(io_error)?;
        let accepted = answer
            .map(|a| matches!(a.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false);

        if !accepted {
            offer.decline();
            return Ok(());
        }

        let path = commands::share_ticket(offer).await?;
        self.write(&format!("shared: {}\n", path.display()))
            .await
            .map_err(io_error)
    }

    /// Prints notices and the error (if any). Returns whether to continue.
    async fn report(&mut self, state: &StationState, result: Result<bool, ApiError>) -> io::Result<bool> {
        let notices = self.flush_notices(state).await?;
        match result {
            Ok(keep_going) => Ok(keep_going),
            Err(e) => {
                if !notices.iter().any(|message| *message == e.message) {
                    self.write(&format!("error: {}\n", e.message)).await?;
                }
                Ok(true)
            }
        }
    }

    async fn flush_notices(&mut self, state: &StationState) -> io::Result<Vec<String>> {
        let notices = state.notices().drain();
        for notice in &notices {
            let line = match notice.level {
                NoticeLevel::Info => format!("[{}] {}\n", notice.title, notice.message),
                NoticeLevel::Error => format!("[{}] {}\n", notice.title.to_uppercase(), notice.message),
            };
            self.write(&line).await?;
        }
        Ok(notices.into_iter().map(|n| n.message).collect())
    }

    async fn write_order(&mut self, order: &OrderResponse, state: &StationState) -> Result<(), ApiError> {
        let text = order_text(order, &state.config().ticket.currency_symbol);
        self.write(&text).await.map_err(io_error)
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }
}

fn io_error(e: io::Error) -> ApiError {
    ApiError::internal(format!("console output failed: {}", e))
}

// =============================================================================
// Formatting
// =============================================================================

fn menu_text(state: &StationState) -> String {
    let symbol = &state.config().ticket.currency_symbol;
    let menu = state.aggregator().menu();
    let mut text = String::new();

    for category in menu.categories() {
        text.push_str(&format!("{}\n", category));
        for item in menu.by_category(category) {
            text.push_str(&format!(
                "  {:>3}  {:<24} {:>8}\n",
                item.id,
                item.name,
                item.price.format_with_symbol(symbol)
            ));
        }
    }
    text
}

fn order_text(order: &OrderResponse, symbol: &str) -> String {
    let mut text = format!(
        "{}  table {}  waiter {}\n",
        order.order_no, order.table_no, order.waiter
    );

    if order.items.is_empty() {
        text.push_str("  (no items)\n");
        return text;
    }

    for line in &order.items {
        text.push_str(&format!(
            "  {:>3}x {:<24} {:>8}\n",
            line.quantity,
            line.name,
            line.line_total().format_with_symbol(symbol)
        ));
    }
    text.push_str(&format!(
        "  {} items, subtotal {}\n",
        order.total_items,
        order.subtotal.format_with_symbol(symbol)
    ));
    text
}
