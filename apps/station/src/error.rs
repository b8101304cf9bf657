//! # API Error Type
//!
//! Unified error type for station commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Station                            │
//! │                                                                         │
//! │  Console line ──► Command Function ──► Result<T, ApiError>              │
//! │                         │                                               │
//! │                         ├── CoreError (unknown item, bad table) ──┐     │
//! │                         ├── LifecycleError (empty, pipeline, print)┤    │
//! │                         └── ShareError ───────────────────────────┤     │
//! │                                                                   ▼     │
//! │                                                       ApiError { code,  │
//! │                                                         message }       │
//! │                                                                         │
//! │  Internal details (io errors, malformed snapshots) are logged, the      │
//! │  person at the station only sees the short message.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;

use kot_core::{CoreError, ValidationError};
use kot_service::{ConfigError, LifecycleError, ShareError};
use serde::Serialize;
use thiserror::Error;

/// Error returned from station commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Menu item not found: 42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Menu item not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Preview/print requested with nothing on the order
    EmptyOrder,

    /// Rendering or persisting the ticket failed
    DocumentError,

    /// Printer rejected the ticket
    PrintError,

    /// Sharing the ticket failed
    ShareError,

    /// Unrecognized console input
    UnknownCommand,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MenuItemNotFound(id) => {
                ApiError::new(ErrorCode::NotFound, format!("Menu item not found: {}", id))
            }
            CoreError::EmptyOrder => ApiError::new(ErrorCode::EmptyOrder, err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts lifecycle errors to API errors.
impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::EmptyOrder => ApiError::new(ErrorCode::EmptyOrder, err.to_string()),
            LifecycleError::Render(e) => {
                tracing::error!("Ticket render failed: {}", e);
                ApiError::internal("Ticket could not be rendered")
            }
            LifecycleError::Pipeline(e) => {
                tracing::error!("Ticket document failed: {}", e);
                ApiError::new(ErrorCode::DocumentError, "Ticket document could not be saved")
            }
            LifecycleError::Print(e) => ApiError::new(ErrorCode::PrintError, e.to_string()),
        }
    }
}

impl From<ShareError> for ApiError {
    fn from(err: ShareError) -> Self {
        ApiError::new(ErrorCode::ShareError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Failure that stops the station from starting or running.
#[derive(Debug, Error)]
pub enum StationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_service::{PipelineError, PrintError};

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::MenuItemNotFound(42).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Menu item not found: 42");

        let err: ApiError = ValidationError::Required {
            field: "table".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_lifecycle_error_mapping() {
        let err: ApiError = LifecycleError::EmptyOrder.into();
        assert_eq!(err.code, ErrorCode::EmptyOrder);
        assert_eq!(err.message, "Please add items to the order first");

        let err: ApiError = LifecycleError::Pipeline(PipelineError::Render {
            source: io::Error::new(io::ErrorKind::Other, "/tmp is read-only"),
        })
        .into();
        assert_eq!(err.code, ErrorCode::DocumentError);
        assert!(!err.message.contains("/tmp"));

        let err: ApiError = LifecycleError::Print(PrintError::new("offline")).into();
        assert_eq!(err.code, ErrorCode::PrintError);
    }

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::new(ErrorCode::EmptyOrder, "Please add items to the order first");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":\"EMPTY_ORDER\""));
    }
}
