//! # Ticket Commands
//!
//! Preview, print and share.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  preview ──► slip shown, document saved, order kept                     │
//! │                                                                         │
//! │  print ────► document saved and spooled, order reset                    │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            "share? [y/N]"                                               │
//! │               y ──► share_ticket(offer)   (failure: notice only)        │
//! │               n ──► offer declined                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use kot_service::ShareOffer;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::StationState;

/// A previewed ticket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub document_path: PathBuf,
    pub order_no: String,
    pub total_items: u32,

    /// Plain-text slip for the console.
    pub slip: String,
}

/// A printed ticket plus the pending share offer.
#[derive(Debug)]
pub struct PrintResponse {
    pub document_path: PathBuf,
    pub printed_order_no: String,
    pub next_order_no: String,
    pub total_items: u32,
    pub slip: String,
    pub share_offer: ShareOffer,
}

/// Previews the current order. The order is left as it is.
pub async fn preview_ticket(state: &StationState) -> Result<PreviewResponse, ApiError> {
    debug!("preview_ticket command");
    let preview = state.lifecycle().preview().await?;

    Ok(PreviewResponse {
        document_path: preview.artifact.path().to_path_buf(),
        order_no: preview.document.order_no.clone(),
        total_items: preview.document.total_items,
        slip: preview.document.to_text(state.config().ticket.text_width),
    })
}

/// Prints the current order and starts a new one.
pub async fn print_ticket(state: &StationState) -> Result<PrintResponse, ApiError> {
    debug!("print_ticket command");
    let outcome = state.lifecycle().print().await?;

    Ok(PrintResponse {
        document_path: outcome.artifact.path().to_path_buf(),
        total_items: outcome.document.total_items,
        slip: outcome.document.to_text(state.config().ticket.text_width),
        printed_order_no: outcome.printed_order_no,
        next_order_no: outcome.next_order_no,
        share_offer: outcome.share_offer,
    })
}

/// Shares a printed ticket.
pub async fn share_ticket(offer: ShareOffer) -> Result<PathBuf, ApiError> {
    let path = offer.artifact().path().to_path_buf();
    offer.accept().await?;
    Ok(path)
}
