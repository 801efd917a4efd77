//! Error handling for PanelCAM
//!
//! Provides the error types reported for a single document as it moves
//! through the pipeline:
//! - Document errors (the CAD file could not be opened)
//! - Extraction errors (the opened document is internally corrupt)
//! - Persist errors (the generated program could not be written)
//! - Duplicate program ids (two documents of one batch map to the same output)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Document error type
///
/// Raised by the CAD-document reader before the pipeline starts.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    /// The document could not be read or parsed
    #[error("Failed to open document '{source_id}': {reason}")]
    Open {
        /// Identifier of the document that failed to open.
        source_id: String,
        /// The reader's description of the failure.
        reason: String,
    },

    /// The document is not a supported CAD format
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

impl DocumentError {
    /// Build an `Open` error from any displayable reader failure
    pub fn open(source_id: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        DocumentError::Open {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Extraction error type
///
/// Represents corruption discovered while walking the entities of a
/// successfully opened document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// An entity carries a NaN or infinite coordinate or radius
    #[error("Entity {entity_index} ({kind}) has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the entity in the document.
        entity_index: usize,
        /// DXF kind of the entity.
        kind: String,
    },

    /// A polyline entity has no vertices at all
    #[error("Entity {entity_index} is a polyline without vertices")]
    EmptyPolyline {
        /// Position of the entity in the document.
        entity_index: usize,
    },
}

/// Persist error type
///
/// The generated program could not be written to its destination.
/// No partial destination file is left behind when this is returned.
#[derive(Error, Debug)]
#[error("Failed to write program to {}: {source}", .path.display())]
pub struct PersistError {
    /// Destination that was being written.
    pub path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

impl PersistError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Main error type for PanelCAM
///
/// A unified error type that can represent any per-document failure.
#[derive(Error, Debug)]
pub enum Error {
    /// Document open error
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Extraction error
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Program persistence error
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// Another document in the same batch already claimed this program id
    #[error("Program id '{program_id}' already produced by '{first_source}'")]
    DuplicateProgram {
        /// The contested program identifier.
        program_id: String,
        /// Document that claimed it first, in input order.
        first_source: String,
    },
}

impl Error {
    /// Check if this is a document open error
    pub fn is_document_error(&self) -> bool {
        matches!(self, Error::Document(_))
    }

    /// Check if this is an extraction error
    pub fn is_extraction_error(&self) -> bool {
        matches!(self, Error::Extraction(_))
    }

    /// Check if this error came from writing output
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Persist(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
