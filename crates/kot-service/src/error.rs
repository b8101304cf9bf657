//! # Service Error Types
//!
//! Error types for the ticket pipeline, the external capabilities and the
//! lifecycle controller.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Service Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Pipeline       │  │  Presentation   │  │  Configuration          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Render (io)    │  │  PrintError     │  │  Load (io)              │ │
//! │  │  Persist (io)   │  │  ShareError     │  │  Parse / Serialize      │ │
//! │  └─────────────────┘  └─────────────────┘  │  Invalid                │ │
//! │                                            └─────────────────────────┘ │
//! │  LifecycleError wraps everything a preview/print cycle can hit.        │
//! │  ShareError is never part of it: a failed share never undoes a print.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::PathBuf;

use kot_core::CoreError;
use thiserror::Error;

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Failure while materializing a ticket document into a file.
///
/// When this is returned, no artifact exists for the caller to reference.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The document render service could not produce a temporary file.
    #[error("Failed to render ticket to file: {source}")]
    Render { source: io::Error },

    /// The temporary file could not be copied to durable storage.
    #[error("Failed to persist ticket to {}: {source}", to.display())]
    Persist { to: PathBuf, source: io::Error },
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

// =============================================================================
// Capability Errors
// =============================================================================

/// The print capability failed (print or preview).
#[derive(Debug, Error)]
#[error("Print failed: {0}")]
pub struct PrintError(pub String);

impl PrintError {
    pub fn new(message: impl Into<String>) -> Self {
        PrintError(message.into())
    }
}

/// The share capability failed.
#[derive(Debug, Error)]
#[error("Share failed: {0}")]
pub struct ShareError(pub String);

impl ShareError {
    pub fn new(message: impl Into<String>) -> Self {
        ShareError(message.into())
    }
}

// =============================================================================
// Lifecycle Errors
// =============================================================================

/// Everything that can stop a preview or print cycle.
///
/// The order held by the aggregator is never modified when one of these is
/// returned.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Preview/print was requested with nothing on the order.
    #[error("Please add items to the order first")]
    EmptyOrder,

    /// The order snapshot could not be rendered.
    #[error("Ticket could not be rendered: {0}")]
    Render(#[from] CoreError),

    /// Render-to-file or persistence failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The print capability failed.
    #[error(transparent)]
    Print(#[from] PrintError),
}

/// Result type alias for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Failure while loading, validating or saving `station.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written.
    #[error("Config file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Config file is not valid TOML for [`crate::KotConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Config parsed but holds unusable values.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
