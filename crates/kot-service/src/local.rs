//! # Local Capabilities
//!
//! File-system backed implementations of the capability traits, used by the
//! station when no platform print/share services are wired in.
//!
//! ```text
//! MarkupFileRenderer     <temp_dir>/<uuid>.html
//! LocalFileStore         tokio::fs::copy (parent folders created), remove_file
//! SpoolPrintService      print   → copy into <spool_dir>
//!                        preview → log the document location
//! DirectoryShareService  copy into <share_dir>
//! ```

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::capability::{Artifact, DocumentRenderService, FileStore, PrintOptions, PrintService, ShareService};
use crate::error::{PrintError, ShareError};

// =============================================================================
// Render
// =============================================================================

/// Writes ticket markup to a uniquely named temporary file.
#[derive(Debug, Clone)]
pub struct MarkupFileRenderer {
    temp_dir: PathBuf,
}

impl MarkupFileRenderer {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        MarkupFileRenderer {
            temp_dir: temp_dir.into(),
        }
    }
}

impl Default for MarkupFileRenderer {
    fn default() -> Self {
        MarkupFileRenderer::new(std::env::temp_dir().join("kot-station"))
    }
}

#[async_trait]
impl DocumentRenderService for MarkupFileRenderer {
    async fn render_to_file(&self, markup: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.temp_dir).await?;

        let path = self.temp_dir.join(format!("{}.html", Uuid::new_v4()));
        fs::write(&path, markup).await?;

        debug!(?path, bytes = markup.len(), "Ticket markup written");
        Ok(path)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Copies files on the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

#[async_trait]
impl FileStore for LocalFileStore {
    async fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(from, to).await?;
        Ok(())
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}

// =============================================================================
// Print
// =============================================================================

/// Drops print jobs into a spool folder watched by the kitchen printer.
#[derive(Debug, Clone)]
pub struct SpoolPrintService {
    spool_dir: PathBuf,
}

impl SpoolPrintService {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        SpoolPrintService {
            spool_dir: spool_dir.into(),
        }
    }
}

#[async_trait]
impl PrintService for SpoolPrintService {
    async fn print(&self, artifact: &Artifact, options: PrintOptions) -> Result<(), PrintError> {
        if options.preview {
            fs::metadata(artifact.path())
                .await
                .map_err(|e| PrintError::new(format!("{}: {}", artifact.path().display(), e)))?;
            info!(path = ?artifact.path(), order_no = %artifact.order_no(), "Ticket ready for preview");
            return Ok(());
        }

        let file_name = artifact
            .file_name()
            .ok_or_else(|| PrintError::new("artifact has no file name"))?;
        let job = self.spool_dir.join(file_name);

        LocalFileStore
            .copy(artifact.path(), &job)
            .await
            .map_err(|e| PrintError::new(format!("spool {}: {}", job.display(), e)))?;

        info!(?job, order_no = %artifact.order_no(), "Ticket spooled for printing");
        Ok(())
    }
}

// =============================================================================
// Share
// =============================================================================

/// Shares tickets by copying them into an outbox folder.
#[derive(Debug, Clone)]
pub struct DirectoryShareService {
    share_dir: PathBuf,
}

impl DirectoryShareService {
    pub fn new(share_dir: impl Into<PathBuf>) -> Self {
        DirectoryShareService {
            share_dir: share_dir.into(),
        }
    }
}

#[async_trait]
impl ShareService for DirectoryShareService {
    async fn share(&self, artifact: &Artifact) -> Result<(), ShareError> {
        let file_name = artifact
            .file_name()
            .ok_or_else(|| ShareError::new("artifact has no file name"))?;
        let target = self.share_dir.join(file_name);

        LocalFileStore
            .copy(artifact.path(), &target)
            .await
            .map_err(|e| ShareError::new(format!("{}: {}", target.display(), e)))?;

        info!(?target, order_no = %artifact.order_no(), "Ticket shared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("kot-local-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_renderer_writes_markup() {
        let dir = scratch_dir();
        let renderer = MarkupFileRenderer::new(&dir);

        let path = renderer.render_to_file("<html></html>").await.unwrap();

        assert!(path.starts_with(&dir));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("html"));
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "<html></html>");
        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_store_creates_parent_dirs() {
        let dir = scratch_dir();
        let from = dir.join("src.html");
        let to = dir.join("nested/docs/KOT_KOT1_1.html");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(&from, "ticket").await.unwrap();

        LocalFileStore.copy(&from, &to).await.unwrap();

        assert_eq!(fs::read_to_string(&to).await.unwrap(), "ticket");
        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_store_removes_file() {
        let dir = scratch_dir();
        let path = dir.join("ticket.html");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(&path, "ticket").await.unwrap();

        LocalFileStore.remove(&path).await.unwrap();

        assert!(fs::metadata(&path).await.is_err());
        assert!(LocalFileStore.remove(&path).await.is_err());
        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_store_missing_source_fails() {
        let dir = scratch_dir();
        let result = LocalFileStore
            .copy(&dir.join("missing.html"), &dir.join("out.html"))
            .await;
        assert!(result.is_err());
        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_spool_print_and_preview() {
        let dir = scratch_dir();
        let doc = dir.join("docs/KOT_KOT7_1000.html");
        fs::create_dir_all(doc.parent().unwrap()).await.unwrap();
        fs::write(&doc, "ticket").await.unwrap();
        let artifact = Artifact::new(doc, "KOT7", Utc::now());
        let printer = SpoolPrintService::new(dir.join("spool"));

        printer.print(&artifact, PrintOptions::PREVIEW).await.unwrap();
        assert!(fs::metadata(dir.join("spool")).await.is_err());

        printer.print(&artifact, PrintOptions::PRINT).await.unwrap();
        assert!(fs::metadata(dir.join("spool/KOT_KOT7_1000.html")).await.is_ok());
        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_preview_of_missing_document_fails() {
        let dir = scratch_dir();
        let artifact = Artifact::new(dir.join("gone.html"), "KOT7", Utc::now());
        let printer = SpoolPrintService::new(dir.join("spool"));

        assert!(printer.print(&artifact, PrintOptions::PREVIEW).await.is_err());
    }

    #[tokio::test]
    async fn test_directory_share() {
        let dir = scratch_dir();
        let doc = dir.join("KOT_KOT3_5.html");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(&doc, "ticket").await.unwrap();
        let artifact = Artifact::new(doc, "KOT3", Utc::now());

        DirectoryShareService::new(dir.join("shared"))
            .share(&artifact)
            .await
            .unwrap();

        assert!(fs::metadata(dir.join("shared/KOT_KOT3_5.html")).await.is_ok());
        let _ = fs::remove_dir_all(dir).await;
    }
}
