//! # kot-service: Ticket Pipeline & Lifecycle
//!
//! Owns the live order and turns it into printed, shareable tickets.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ordering Station                                 │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 TicketLifecycle (cycle orchestrator)             │  │
//! │  │                                                                  │  │
//! │  │  preview() / print() ── one cycle at a time, order snapshot      │  │
//! │  └────────────┬──────────────────────┬──────────────────┬───────────┘  │
//! │               ▼                      ▼                  ▼              │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌──────────────────┐  │
//! │  │  OrderAggregator   │  │  DocumentPipeline  │  │  PrintService    │  │
//! │  │                    │  │                    │  │  ShareService    │  │
//! │  │  Mutex<Order>      │  │  render_to_file    │  │                  │  │
//! │  │  add / remove      │  │  FileStore::copy   │  │  print / preview │  │
//! │  │  reset / carry     │  │  KOT_<no>_<ms>.pdf │  │  share offer     │  │
//! │  └────────────────────┘  └────────────────────┘  └──────────────────┘  │
//! │                                                                         │
//! │  EVENTS (to the front end via TicketEventEmitter):                     │
//! │  • state changes: idle → rendering → materializing → presenting → …    │
//! │  • notices: "Please add items to the order first", "Failed to …"       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`aggregator`] - Single-writer owner of the live order
//! - [`capability`] - Render/store/print/share contracts and [`Artifact`]
//! - [`config`] - Station configuration (`station.toml` + environment)
//! - [`error`] - Service error types
//! - [`events`] - Lifecycle states, notices and the event emitter trait
//! - [`lifecycle`] - Preview/print controller
//! - [`local`] - File-system implementations of the capabilities
//! - [`pipeline`] - Render-then-persist document pipeline

pub mod aggregator;
pub mod capability;
pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod local;
pub mod pipeline;

pub use aggregator::OrderAggregator;
pub use capability::{Artifact, DocumentRenderService, FileStore, PrintOptions, PrintService, ShareService};
pub use config::KotConfig;
pub use error::{
    ConfigError, ConfigResult, LifecycleError, LifecycleResult, PipelineError, PipelineResult, PrintError,
    ShareError,
};
pub use events::{LifecycleState, NoOpEmitter, Notice, NoticeLevel, TicketEventEmitter};
pub use lifecycle::{PreviewOutcome, PrintOutcome, ShareOffer, TicketLifecycle};
pub use local::{DirectoryShareService, LocalFileStore, MarkupFileRenderer, SpoolPrintService};
pub use pipeline::{artifact_file_name, DocumentPipeline};
