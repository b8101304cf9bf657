//! Notice queue between the lifecycle controller and the console.

use std::mem;
use std::sync::{Mutex, PoisonError};

use kot_service::{LifecycleState, Notice, TicketEventEmitter};
use tracing::debug;

/// Collects notices so the console can print them in order with the
/// command output.
#[derive(Debug, Default)]
pub struct ConsoleEmitter {
    notices: Mutex<Vec<Notice>>,
}

impl ConsoleEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every notice raised since the last call.
    pub fn drain(&self) -> Vec<Notice> {
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        mem::take(&mut *notices)
    }
}

impl TicketEventEmitter for ConsoleEmitter {
    fn emit_state(&self, state: LifecycleState) {
        debug!(%state, "Ticket lifecycle");
    }

    fn emit_notice(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
