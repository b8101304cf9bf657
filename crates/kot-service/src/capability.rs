//! # External Capabilities
//!
//! The four services a ticket needs from the outside world, expressed as
//! async traits so the station can plug in real implementations and tests
//! can plug in fakes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Capability Contracts                               │
//! │                                                                         │
//! │  DocumentRenderService   render_to_file(markup) -> temp path   io::Error│
//! │  FileStore               copy(from, to) / remove(path)         io::Error│
//! │  PrintService            print(artifact, {preview})           PrintError│
//! │  ShareService            share(artifact)                      ShareError│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{PrintError, ShareError};

// =============================================================================
// Artifact
// =============================================================================

/// A durable, materialized ticket document.
///
/// A fresh artifact is produced for every preview or print; artifacts are
/// never pooled or reused across tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    path: PathBuf,
    order_no: String,
    created_at: DateTime<Utc>,
}

impl Artifact {
    pub fn new(path: PathBuf, order_no: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Artifact {
            path,
            order_no: order_no.into(),
            created_at,
        }
    }

    /// Location of the persisted document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ticket number the document was rendered for.
    pub fn order_no(&self) -> &str {
        &self.order_no
    }

    /// When the document was materialized.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// File name component of [`Artifact::path`].
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// How the print capability should present an artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Show the document instead of sending it to a printer.
    pub preview: bool,
}

impl PrintOptions {
    pub const PRINT: PrintOptions = PrintOptions { preview: false };
    pub const PREVIEW: PrintOptions = PrintOptions { preview: true };
}

// =============================================================================
// Capability Traits
// =============================================================================

/// Turns ticket markup into a temporary document file.
#[async_trait]
pub trait DocumentRenderService: Send + Sync {
    async fn render_to_file(&self, markup: &str) -> io::Result<PathBuf>;
}

/// Copies files into durable storage.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Deletes a file that is no longer needed.
    async fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Prints or previews a materialized ticket.
#[async_trait]
pub trait PrintService: Send + Sync {
    async fn print(&self, artifact: &Artifact, options: PrintOptions) -> Result<(), PrintError>;
}

/// Hands a materialized ticket to another app or person.
#[async_trait]
pub trait ShareService: Send + Sync {
    async fn share(&self, artifact: &Artifact) -> Result<(), ShareError>;
}
