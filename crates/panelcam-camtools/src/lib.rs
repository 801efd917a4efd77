//! # PanelCAM CAM Tools
//!
//! This crate turns DXF panel drawings into G-code programs for a two-tool
//! (drill + contour cutter) panel router.
//!
//! ## Pipeline
//!
//! - **Document**: Opens DXF drawings and exposes model-space entities
//! - **Extractor**: Converts polylines, circles and text into plain records
//! - **Filter**: Selects at most 2 outlines and 4 drill holes inside the work envelope
//! - **Sequencer**: Emits the header, drill and cut blocks and the footer
//! - **Program**: Holds the emitted lines and writes them atomically
//!
//! ## Supporting Infrastructure
//!
//! - **Batch**: Parallel, failure-isolated generation over many documents
//! - **Storage**: Input document store and program output directory
//! - **Intake**: Upload name sanitising and extension checks

pub mod batch;
pub mod document;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod intake;
pub mod pipeline;
pub mod program;
pub mod sequencer;
pub mod storage;

// Re-export commonly used items
pub use batch::{
    BatchProcessor, BatchReport, DocumentResult, DocumentSource, GenerationOutcome, ProgramSink,
};
pub use document::CadDocument;
pub use error::{CamToolError, CamToolResult, IntakeError, IntakeResult};
pub use extractor::extract;
pub use filter::{filter, GeometryFilter, MachiningSet};
pub use pipeline::{convert, ConversionOutput, GeometrySummary};
pub use program::InstructionProgram;
pub use sequencer::{sequence, ToolpathSequencer};
pub use storage::{InputStore, ProgramStore, StoredDocument, UploadReceipt};
