//! # Lifecycle Events
//!
//! States a preview/print cycle moves through, plus the user-facing notices
//! it raises along the way.
//!
//! ```text
//!        preview()/print()
//!  Idle ──────────────────► Rendering ──► Materializing ──► Presenting
//!   ▲                           │               │               │
//!   │                           └───────┬───────┴───────┬───────┘
//!   │                                   ▼               ▼
//!   └──────── next cycle ─────────── Failed         Completed
//! ```

use std::fmt;

use serde::Serialize;

// =============================================================================
// Lifecycle State
// =============================================================================

/// Where the current (or last) cycle stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    #[default]
    Idle,
    Rendering,
    Materializing,
    Presenting,
    Completed,
    Failed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Rendering => "rendering",
            LifecycleState::Materializing => "materializing",
            LifecycleState::Presenting => "presenting",
            LifecycleState::Completed => "completed",
            LifecycleState::Failed => "failed",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Notices
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the person at the station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Receives lifecycle events (implemented by the station front end).
pub trait TicketEventEmitter: Send + Sync {
    /// Called on every state transition.
    fn emit_state(&self, state: LifecycleState);

    /// Called when the user should be told something.
    fn emit_notice(&self, notice: &Notice);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl TicketEventEmitter for NoOpEmitter {
    fn emit_state(&self, _state: LifecycleState) {}
    fn emit_notice(&self, _notice: &Notice) {}
}
