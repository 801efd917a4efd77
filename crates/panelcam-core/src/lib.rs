//! # PanelCAM Core
//!
//! Core types shared by every PanelCAM crate.
//! Provides the plain geometry values that flow through the
//! extract → filter → sequence pipeline, and the error taxonomy
//! reported per document.

pub mod error;
pub mod geometry;

pub use error::{DocumentError, Error, ExtractionError, PersistError, Result};

pub use geometry::{
    BoundingBox, Circle, GeometricRecord, Point2, Polyline, RecordKind, TextLabel, WorkEnvelope,
    MACHINE_ENVELOPE,
};
