//! # Document Pipeline
//!
//! Materializes a rendered [`TicketDocument`] into a durable [`Artifact`].
//!
//! ```text
//! TicketDocument
//!      │ to_markup()
//!      ▼
//! DocumentRenderService::render_to_file ──► /tmp/…/<uuid>.html
//!      │                                        │
//!      │            PipelineError::Render ◄─────┤ (io failure)
//!      ▼                                        │
//! FileStore::copy ──► <documents_root>/KOT_<orderNo>_<epochMillis>.<ext>
//!      │                                        │
//!      │            PipelineError::Persist ◄────┘ (io failure)
//!      ▼
//! FileStore::remove(temp)   (also after a failed copy; failures only logged)
//!      │
//!      ▼
//! Artifact
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kot_core::TicketDocument;
use tracing::{debug, info, warn};

use crate::capability::{Artifact, DocumentRenderService, FileStore};
use crate::error::{PipelineError, PipelineResult};

/// Extension used when the render service returns a file without one.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "pdf";

/// Render-then-persist pipeline.
pub struct DocumentPipeline {
    renderer: Arc<dyn DocumentRenderService>,
    store: Arc<dyn FileStore>,
    documents_root: PathBuf,
}

impl DocumentPipeline {
    pub fn new(
        renderer: Arc<dyn DocumentRenderService>,
        store: Arc<dyn FileStore>,
        documents_root: impl Into<PathBuf>,
    ) -> Self {
        DocumentPipeline {
            renderer,
            store,
            documents_root: documents_root.into(),
        }
    }

    /// Folder artifacts are persisted into.
    pub fn documents_root(&self) -> &Path {
        &self.documents_root
    }

    /// Renders the document to a temporary file and copies it to durable
    /// storage.
    ///
    /// ## Errors
    /// Any failure is returned as a [`PipelineError`]; no artifact is
    /// produced in that case.
    pub async fn materialize(&self, document: &TicketDocument) -> PipelineResult<Artifact> {
        let markup = document.to_markup();

        let temp = self
            .renderer
            .render_to_file(&markup)
            .await
            .map_err(|source| {
                warn!(order_no = %document.order_no, error = %source, "Render to file failed");
                PipelineError::Render { source }
            })?;
        debug!(?temp, order_no = %document.order_no, "Ticket rendered to temporary file");

        let created_at = Utc::now();
        let extension = temp
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or(DEFAULT_ARTIFACT_EXTENSION);
        let destination = self
            .documents_root
            .join(artifact_file_name(&document.order_no, created_at, extension));

        let persisted = self.store.copy(&temp, &destination).await;
        self.discard_temp(&temp).await;

        if let Err(source) = persisted {
            warn!(?destination, error = %source, "Persisting ticket failed");
            return Err(PipelineError::Persist {
                to: destination,
                source,
            });
        }

        info!(path = ?destination, order_no = %document.order_no, "Ticket materialized");
        Ok(Artifact::new(destination, document.order_no.clone(), created_at))
    }

    async fn discard_temp(&self, temp: &Path) {
        if let Err(e) = self.store.remove(temp).await {
            warn!(?temp, error = %e, "Failed to delete temporary ticket file");
        }
    }
}

/// Durable file name for a ticket: `KOT_<orderNo>_<epochMillis>.<ext>`.
///
/// Characters outside `[A-Za-z0-9_-]` in the ticket number are replaced so a
/// configured prefix can never escape the documents folder.
pub fn artifact_file_name(order_no: &str, created_at: DateTime<Utc>, extension: &str) -> String {
    let safe: String = order_no
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("KOT_{}_{}.{}", safe, created_at.timestamp_millis(), extension)
}
