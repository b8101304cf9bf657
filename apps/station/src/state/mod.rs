//! # State Module
//!
//! Application state for the station.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌────────────────────────────┐   ┌────────────────────────────────┐   │
//! │  │       StationState         │   │        ConsoleEmitter          │   │
//! │  │                            │   │                                │   │
//! │  │  KotConfig (read-only)     │   │  queued notices, drained by    │   │
//! │  │  Arc<TicketLifecycle>      │──►│  the console after every       │   │
//! │  │    └ Arc<OrderAggregator>  │   │  command                       │   │
//! │  └────────────────────────────┘   └────────────────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • OrderAggregator: Mutex<Order>, never held across an await           │
//! │  • TicketLifecycle: one preview/print cycle at a time                  │
//! │  • ConsoleEmitter: Mutex<Vec<Notice>>                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod notify;
mod station;

pub use notify::ConsoleEmitter;
pub use station::StationState;
