//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for the document store,
//! upload intake, and the crate-level wrapper used by callers that mix
//! pipeline, settings and storage operations.

use panelcam_settings::SettingsError;
use std::io;
use thiserror::Error;

/// Errors that can occur during CAM tool operations.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// A per-document pipeline error occurred.
    #[error(transparent)]
    Pipeline(#[from] panelcam_core::Error),

    /// Machining parameters could not be loaded or applied.
    #[error("Parameter error: {0}")]
    Settings(#[from] SettingsError),

    /// A document store or upload error occurred.
    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Errors related to accepting, listing and removing stored documents.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The file name does not carry a CAD extension.
    #[error("Unsupported file extension: {0} (only .dxf files are accepted)")]
    UnsupportedExtension(String),

    /// The name is not a plain file name inside the store.
    #[error("Invalid document name: {0}")]
    InvalidName(String),

    /// The uploaded payload is empty.
    #[error("Empty file: {0}")]
    EmptyUpload(String),

    /// No stored document has this name.
    #[error("File not found: {0}")]
    NotFound(String),

    /// I/O error while touching the store.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for intake operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use panelcam_core::{DocumentError, ExtractionError};

    #[test]
    fn test_intake_error_display() {
        let err = IntakeError::UnsupportedExtension("panel.svg".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported file extension: panel.svg (only .dxf files are accepted)"
        );

        let err = IntakeError::NotFound("missing.dxf".to_string());
        assert_eq!(err.to_string(), "File not found: missing.dxf");
    }

    #[test]
    fn test_pipeline_errors_pass_through() {
        let err: CamToolError = panelcam_core::Error::from(DocumentError::open(
            "bad.dxf",
            "unexpected end of file",
        ))
        .into();
        assert_eq!(
            err.to_string(),
            "Failed to open document 'bad.dxf': unexpected end of file"
        );

        let err: CamToolError =
            panelcam_core::Error::from(ExtractionError::EmptyPolyline { entity_index: 2 }).into();
        assert!(matches!(err, CamToolError::Pipeline(_)));
    }

    #[test]
    fn test_error_conversion() {
        let intake = IntakeError::EmptyUpload("a.dxf".to_string());
        let err: CamToolError = intake.into();
        assert!(matches!(err, CamToolError::Intake(_)));

        let settings = SettingsError::invalid("feed_rate", "must be > 0");
        let err: CamToolError = settings.into();
        assert!(matches!(err, CamToolError::Settings(_)));

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let intake: IntakeError = io_err.into();
        assert!(matches!(intake, IntakeError::IoError(_)));
    }
}
