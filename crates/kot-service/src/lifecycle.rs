//! # Ticket Lifecycle Controller
//!
//! Drives preview and print cycles for the live order.
//!
//! ## Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Preview / Print Cycle                             │
//! │                                                                         │
//! │  1. Lock cycle ─────────► one cycle at a time per station               │
//! │  2. Snapshot ───────────► owned copy of the order (empty → EmptyOrder)  │
//! │  3. Rendering ──────────► kot_core::render_now(snapshot)                │
//! │  4. Materializing ──────► DocumentPipeline::materialize                 │
//! │  5. Presenting ─────────► PrintService::print(artifact, {preview})      │
//! │  6. Completed                                                           │
//! │       preview: order untouched                                          │
//! │       print:   order reset (late additions carried over),               │
//! │                ShareOffer handed back to the caller                     │
//! │                                                                         │
//! │  Any failure in 3-5 ──► Failed, error notice, order untouched           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sharing happens after the cycle is over. A share failure only raises a
//! notice; it never changes the printed ticket or the new order.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::aggregator::OrderAggregator;
use crate::capability::{Artifact, PrintOptions, PrintService, ShareService};
use crate::error::{LifecycleError, LifecycleResult, ShareError};
use crate::events::{LifecycleState, NoOpEmitter, Notice, TicketEventEmitter};
use crate::pipeline::DocumentPipeline;
use kot_core::{Order, TicketDocument};

const EMPTY_ORDER_MESSAGE: &str = "Please add items to the order first";

// =============================================================================
// Outcomes
// =============================================================================

/// Result of a successful preview.
#[derive(Debug, Clone)]
pub struct PreviewOutcome {
    /// The document that was previewed.
    pub artifact: Artifact,

    /// The ticket it was rendered from.
    pub document: TicketDocument,
}

/// Result of a successful print.
#[derive(Debug)]
pub struct PrintOutcome {
    /// The document that was printed.
    pub artifact: Artifact,

    /// The ticket it was rendered from.
    pub document: TicketDocument,

    /// Ticket number that went to the kitchen.
    pub printed_order_no: String,

    /// Ticket number of the order that replaced it.
    pub next_order_no: String,

    /// Optional follow-up: share the printed document.
    pub share_offer: ShareOffer,
}

/// A one-shot offer to share a printed ticket.
///
/// Consumed by [`ShareOffer::accept`] or [`ShareOffer::decline`]; dropping
/// it is the same as declining.
pub struct ShareOffer {
    artifact: Artifact,
    sharer: Arc<dyn ShareService>,
    emitter: Arc<dyn TicketEventEmitter>,
}

impl ShareOffer {
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// Shares the printed document.
    ///
    /// On failure an error notice is raised and the error returned; the
    /// order is not affected either way.
    pub async fn accept(self) -> Result<(), ShareError> {
        match self.sharer.share(&self.artifact).await {
            Ok(()) => {
                info!(order_no = %self.artifact.order_no(), "Ticket shared");
                Ok(())
            }
            Err(e) => {
                warn!(order_no = %self.artifact.order_no(), error = %e, "Sharing ticket failed");
                self.emitter
                    .emit_notice(&Notice::error("Error", "Failed to share PDF"));
                Err(e)
            }
        }
    }

    pub fn decline(self) {
        info!(order_no = %self.artifact.order_no(), "Share declined");
    }
}

impl fmt::Debug for ShareOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareOffer")
            .field("artifact", &self.artifact)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Lifecycle Controller
// =============================================================================

/// Preview/print controller for one station.
pub struct TicketLifecycle {
    aggregator: Arc<OrderAggregator>,
    pipeline: DocumentPipeline,
    printer: Arc<dyn PrintService>,
    sharer: Arc<dyn ShareService>,
    emitter: Arc<dyn TicketEventEmitter>,
    state: watch::Sender<LifecycleState>,
    cycle: tokio::sync::Mutex<()>,
    last_artifact: Mutex<Option<Artifact>>,
}

impl TicketLifecycle {
    /// Creates a controller that reports nothing.
    pub fn new(
        aggregator: Arc<OrderAggregator>,
        pipeline: DocumentPipeline,
        printer: Arc<dyn PrintService>,
        sharer: Arc<dyn ShareService>,
    ) -> Self {
        Self::with_emitter(aggregator, pipeline, printer, sharer, Arc::new(NoOpEmitter))
    }

    /// Creates a controller with a custom event emitter.
    pub fn with_emitter(
        aggregator: Arc<OrderAggregator>,
        pipeline: DocumentPipeline,
        printer: Arc<dyn PrintService>,
        sharer: Arc<dyn ShareService>,
        emitter: Arc<dyn TicketEventEmitter>,
    ) -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        TicketLifecycle {
            aggregator,
            pipeline,
            printer,
            sharer,
            emitter,
            state,
            cycle: tokio::sync::Mutex::new(()),
            last_artifact: Mutex::new(None),
        }
    }

    pub fn aggregator(&self) -> &Arc<OrderAggregator> {
        &self.aggregator
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// The document produced by the most recent successful materialization.
    pub fn last_artifact(&self) -> Option<Artifact> {
        self.last_artifact
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Renders, materializes and previews the current order.
    ///
    /// The order is never modified by a preview.
    pub async fn preview(&self) -> LifecycleResult<PreviewOutcome> {
        let _cycle = self.cycle.lock().await;
        let snapshot = self.begin()?;

        match self.present(&snapshot, PrintOptions::PREVIEW).await {
            Ok((artifact, document)) => {
                self.transition(LifecycleState::Completed);
                info!(order_no = %snapshot.order_no, "Ticket previewed");
                Ok(PreviewOutcome { artifact, document })
            }
            Err(e) => Err(self.fail(e, "Failed to preview KOT")),
        }
    }

    /// Renders, materializes and prints the current order, then starts a
    /// new one.
    ///
    /// ## Behavior
    /// - Empty order: [`LifecycleError::EmptyOrder`], nothing else happens
    /// - Any failure: state `Failed`, order untouched
    /// - Success: order reset to a new ticket number and a [`ShareOffer`]
    ///   returned; whether it is accepted has no effect on the reset
    pub async fn print(&self) -> LifecycleResult<PrintOutcome> {
        let _cycle = self.cycle.lock().await;
        let snapshot = self.begin()?;

        let (artifact, document) = match self.present(&snapshot, PrintOptions::PRINT).await {
            Ok(presented) => presented,
            Err(e) => return Err(self.fail(e, "Failed to print KOT")),
        };

        let next_order_no = self.aggregator.complete_cycle(&snapshot);
        self.transition(LifecycleState::Completed);
        info!(
            printed = %snapshot.order_no,
            next = %next_order_no,
            "Ticket printed, new order started"
        );
        self.emitter.emit_notice(&Notice::info(
            "Success",
            "KOT printed successfully! Would you like to share the PDF?",
        ));

        Ok(PrintOutcome {
            share_offer: ShareOffer {
                artifact: artifact.clone(),
                sharer: self.sharer.clone(),
                emitter: self.emitter.clone(),
            },
            artifact,
            document,
            printed_order_no: snapshot.order_no,
            next_order_no,
        })
    }

    // =========================================================================
    // Cycle Steps
    // =========================================================================

    fn begin(&self) -> LifecycleResult<Order> {
        self.transition(LifecycleState::Idle);

        let snapshot = self.aggregator.snapshot();
        if snapshot.is_empty() {
            self.emitter
                .emit_notice(&Notice::error("Error", EMPTY_ORDER_MESSAGE));
            return Err(LifecycleError::EmptyOrder);
        }
        Ok(snapshot)
    }

    async fn present(
        &self,
        snapshot: &Order,
        options: PrintOptions,
    ) -> LifecycleResult<(Artifact, TicketDocument)> {
        self.transition(LifecycleState::Rendering);
        let document = kot_core::render_now(snapshot)?;

        self.transition(LifecycleState::Materializing);
        let artifact = self.pipeline.materialize(&document).await?;
        *self
            .last_artifact
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(artifact.clone());

        self.transition(LifecycleState::Presenting);
        self.printer.print(&artifact, options).await?;

        Ok((artifact, document))
    }

    fn fail(&self, error: LifecycleError, message: &str) -> LifecycleError {
        warn!(error = %error, "{}", message);
        self.transition(LifecycleState::Failed);
        self.emitter.emit_notice(&Notice::error("Error", message));
        error
    }

    fn transition(&self, next: LifecycleState) {
        self.state.send_replace(next);
        self.emitter.emit_state(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{DocumentRenderService, FileStore};
    use crate::error::PrintError;
    use async_trait::async_trait;
    use kot_core::{MenuCatalog, OrderNumbering};
    use std::io;
    use std::path::{Path, PathBuf};
    use tokio::sync::Notify;

    // =========================================================================
    // Fakes
    // =========================================================================

    #[derive(Default)]
    struct FakeRenderer {
        fail: bool,
    }

    #[async_trait]
    impl DocumentRenderService for FakeRenderer {
        async fn render_to_file(&self, _markup: &str) -> io::Result<PathBuf> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "renderer unavailable"));
            }
            Ok(PathBuf::from("/tmp/ticket.pdf"))
        }
    }

    #[derive(Default)]
    struct FakeStore {
        fail: bool,
        copies: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl FileStore for FakeStore {
        async fn copy(&self, _from: &Path, to: &Path) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "insufficient storage"));
            }
            self.copies.lock().unwrap().push(to.to_path_buf());
            Ok(())
        }

        async fn remove(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakePrinter {
        fail: bool,
        gate: Option<(Notify, Notify)>,
        jobs: Mutex<Vec<(PathBuf, bool)>>,
    }

    impl FakePrinter {
        fn gated() -> Self {
            FakePrinter {
                gate: Some((Notify::new(), Notify::new())),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PrintService for FakePrinter {
        async fn print(&self, artifact: &Artifact, options: PrintOptions) -> Result<(), PrintError> {
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            if self.fail {
                return Err(PrintError::new("printer offline"));
            }
            self.jobs
                .lock()
                .unwrap()
                .push((artifact.path().to_path_buf(), options.preview));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeSharer {
        fail: bool,
        shared: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ShareService for FakeSharer {
        async fn share(&self, artifact: &Artifact) -> Result<(), ShareError> {
            if self.fail {
                return Err(ShareError::new("no share target"));
            }
            self.shared
                .lock()
                .unwrap()
                .push(artifact.order_no().to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingEmitter {
        states: Mutex<Vec<LifecycleState>>,
        notices: Mutex<Vec<Notice>>,
    }

    impl TicketEventEmitter for RecordingEmitter {
        fn emit_state(&self, state: LifecycleState) {
            self.states.lock().unwrap().push(state);
        }

        fn emit_notice(&self, notice: &Notice) {
            self.notices.lock().unwrap().push(notice.clone());
        }
    }

    struct Harness {
        lifecycle: Arc<TicketLifecycle>,
        store: Arc<FakeStore>,
        printer: Arc<FakePrinter>,
        sharer: Arc<FakeSharer>,
        emitter: Arc<RecordingEmitter>,
    }

    fn harness(renderer: FakeRenderer, store: FakeStore, printer: FakePrinter, sharer: FakeSharer) -> Harness {
        let aggregator = Arc::new(OrderAggregator::new(
            Arc::new(MenuCatalog::default()),
            OrderNumbering::default(),
            "1",
            "John",
        ));
        let store = Arc::new(store);
        let printer = Arc::new(printer);
        let sharer = Arc::new(sharer);
        let emitter = Arc::new(RecordingEmitter::default());
        let pipeline = DocumentPipeline::new(Arc::new(renderer), store.clone(), "/docs");
        let lifecycle = Arc::new(TicketLifecycle::with_emitter(
            aggregator,
            pipeline,
            printer.clone(),
            sharer.clone(),
            emitter.clone(),
        ));
        Harness {
            lifecycle,
            store,
            printer,
            sharer,
            emitter,
        }
    }

    fn default_harness() -> Harness {
        harness(
            FakeRenderer::default(),
            FakeStore::default(),
            FakePrinter::default(),
            FakeSharer::default(),
        )
    }

    // =========================================================================
    // Tests
    // =========================================================================

    #[tokio::test]
    async fn test_empty_order_is_rejected_without_side_effects() {
        let h = default_harness();
        let before = h.lifecycle.aggregator().snapshot();

        let result = h.lifecycle.print().await;

        assert!(matches!(result, Err(LifecycleError::EmptyOrder)));
        assert!(matches!(h.lifecycle.preview().await, Err(LifecycleError::EmptyOrder)));
        let after = h.lifecycle.aggregator().snapshot();
        assert_eq!(after.order_no, before.order_no);
        assert_eq!(after.timestamp, before.timestamp);
        assert_eq!(h.lifecycle.state(), LifecycleState::Idle);
        assert!(h.store.copies.lock().unwrap().is_empty());
        assert!(h.printer.jobs.lock().unwrap().is_empty());
        assert_eq!(h.emitter.notices.lock().unwrap()[0].message, EMPTY_ORDER_MESSAGE);
    }

    #[tokio::test]
    async fn test_print_resets_order_and_offers_share() {
        let h = default_harness();
        let agg = h.lifecycle.aggregator().clone();
        agg.add_item_by_id(1).unwrap();
        agg.add_item_by_id(1).unwrap();
        agg.add_item_by_id(2).unwrap();
        let printed_no = agg.snapshot().order_no;

        let outcome = h.lifecycle.print().await.unwrap();
        outcome.share_offer.decline();

        assert_eq!(outcome.printed_order_no, printed_no);
        assert_eq!(outcome.artifact.order_no(), printed_no);
        assert_eq!(outcome.document.total_items, 3);
        assert_eq!(outcome.document.lines[0].label(), "2x Burger");
        assert!(outcome
            .artifact
            .file_name()
            .unwrap()
            .starts_with(&format!("KOT_{}_", printed_no)));

        let order = agg.snapshot();
        assert!(order.is_empty());
        assert_eq!(order.order_no, outcome.next_order_no);
        assert_ne!(order.order_no, printed_no);

        assert_eq!(h.store.copies.lock().unwrap().len(), 1);
        let jobs = h.printer.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(!jobs[0].1);
        assert!(h.sharer.shared.lock().unwrap().is_empty());
        assert_eq!(h.lifecycle.state(), LifecycleState::Completed);
        assert_eq!(h.lifecycle.last_artifact(), Some(outcome.artifact.clone()));

        assert_eq!(
            *h.emitter.states.lock().unwrap(),
            vec![
                LifecycleState::Idle,
                LifecycleState::Rendering,
                LifecycleState::Materializing,
                LifecycleState::Presenting,
                LifecycleState::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn test_accepted_share_uses_printed_artifact() {
        let h = default_harness();
        h.lifecycle.aggregator().add_item_by_id(4).unwrap();

        let outcome = h.lifecycle.print().await.unwrap();
        outcome.share_offer.accept().await.unwrap();

        assert_eq!(*h.sharer.shared.lock().unwrap(), vec![outcome.printed_order_no]);
    }

    #[tokio::test]
    async fn test_preview_leaves_order_untouched() {
        let h = default_harness();
        let agg = h.lifecycle.aggregator().clone();
        agg.add_item_by_id(3).unwrap();
        let before = agg.snapshot();

        let preview = h.lifecycle.preview().await.unwrap();

        assert_eq!(agg.snapshot(), before);
        assert_eq!(preview.artifact.order_no(), before.order_no);
        assert_eq!(preview.document.total_items, 1);
        assert!(h.printer.jobs.lock().unwrap()[0].1);
        assert_eq!(h.lifecycle.state(), LifecycleState::Completed);

        let second = h.lifecycle.preview().await.unwrap();
        assert_eq!(second.artifact.order_no(), before.order_no);
        assert_ne!(second.artifact, preview.artifact);
        assert_eq!(h.store.copies.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_materialize_failure_keeps_order() {
        let h = harness(
            FakeRenderer::default(),
            FakeStore {
                fail: true,
                ..Default::default()
            },
            FakePrinter::default(),
            FakeSharer::default(),
        );
        let agg = h.lifecycle.aggregator().clone();
        agg.add_item_by_id(1).unwrap();
        agg.add_item_by_id(2).unwrap();
        let before = agg.snapshot();

        let result = h.lifecycle.print().await;

        assert!(matches!(result, Err(LifecycleError::Pipeline(_))));
        assert_eq!(agg.snapshot(), before);
        assert_eq!(h.lifecycle.state(), LifecycleState::Failed);
        assert!(h.printer.jobs.lock().unwrap().is_empty());
        assert!(h.lifecycle.last_artifact().is_none());
        let notices = h.emitter.notices.lock().unwrap();
        assert_eq!(notices.last().map(|n| n.message.as_str()), Some("Failed to print KOT"));
    }

    #[tokio::test]
    async fn test_render_failure_on_preview() {
        let h = harness(
            FakeRenderer { fail: true },
            FakeStore::default(),
            FakePrinter::default(),
            FakeSharer::default(),
        );
        h.lifecycle.aggregator().add_item_by_id(1).unwrap();

        let result = h.lifecycle.preview().await;

        assert!(matches!(result, Err(LifecycleError::Pipeline(_))));
        assert_eq!(h.lifecycle.state(), LifecycleState::Failed);
        let notices = h.emitter.notices.lock().unwrap();
        assert_eq!(notices.last().map(|n| n.message.as_str()), Some("Failed to preview KOT"));
    }

    #[tokio::test]
    async fn test_print_failure_keeps_order() {
        let h = harness(
            FakeRenderer::default(),
            FakeStore::default(),
            FakePrinter {
                fail: true,
                ..Default::default()
            },
            FakeSharer::default(),
        );
        let agg = h.lifecycle.aggregator().clone();
        agg.add_item_by_id(1).unwrap();
        let before = agg.snapshot();

        assert!(matches!(h.lifecycle.print().await, Err(LifecycleError::Print(_))));
        assert_eq!(agg.snapshot(), before);
        assert!(h.lifecycle.last_artifact().is_some());
    }

    #[tokio::test]
    async fn test_share_failure_does_not_undo_reset() {
        let h = harness(
            FakeRenderer::default(),
            FakeStore::default(),
            FakePrinter::default(),
            FakeSharer {
                fail: true,
                ..Default::default()
            },
        );
        let agg = h.lifecycle.aggregator().clone();
        agg.add_item_by_id(1).unwrap();

        let outcome = h.lifecycle.print().await.unwrap();
        let shared = outcome.share_offer.accept().await;

        assert!(shared.is_err());
        let order = agg.snapshot();
        assert!(order.is_empty());
        assert_eq!(order.order_no, outcome.next_order_no);
        assert_eq!(h.lifecycle.state(), LifecycleState::Completed);
        let notices = h.emitter.notices.lock().unwrap();
        assert_eq!(notices.last().map(|n| n.message.as_str()), Some("Failed to share PDF"));
    }

    #[tokio::test]
    async fn test_slow_printer_does_not_block_order_edits() {
        let h = harness(
            FakeRenderer::default(),
            FakeStore::default(),
            FakePrinter::gated(),
            FakeSharer::default(),
        );
        let agg = h.lifecycle.aggregator().clone();
        agg.add_item_by_id(1).unwrap();

        let lifecycle = h.lifecycle.clone();
        let task = tokio::spawn(async move { lifecycle.print().await });

        let (entered, release) = h.printer.gate.as_ref().unwrap();
        entered.notified().await;
        assert_eq!(h.lifecycle.state(), LifecycleState::Presenting);

        agg.add_item_by_id(2).unwrap();
        agg.add_item_by_id(1).unwrap();
        release.notify_one();

        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome.artifact.order_no(), outcome.printed_order_no);
        assert_eq!(outcome.document.total_items, 1);

        let order = agg.snapshot();
        assert_eq!(order.order_no, outcome.next_order_no);
        assert_eq!(order.line(1).map(|l| l.quantity), Some(1));
        assert_eq!(order.line(2).map(|l| l.quantity), Some(1));
    }

    #[tokio::test]
    async fn test_subscribers_see_final_state() {
        let h = default_harness();
        let rx = h.lifecycle.subscribe();
        h.lifecycle.aggregator().add_item_by_id(1).unwrap();

        h.lifecycle.preview().await.unwrap();

        assert_eq!(*rx.borrow(), LifecycleState::Completed);
    }
}
