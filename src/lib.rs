//! # PanelCAM
//!
//! Converts 2-D panel drawings (DXF) into G-code programs for a two-tool
//! panel-cutting router.
//!
//! ## Architecture
//!
//! PanelCAM is organized as a workspace with multiple crates:
//!
//! 1. **panelcam-core** - Geometry records, work envelope, pipeline error types
//! 2. **panelcam-settings** - Machining parameters, overlays, parameter files
//! 3. **panelcam-camtools** - Extraction, filtering, sequencing, batch and storage
//! 4. **panelcam** - Command-line front end that integrates all crates
//!
//! ## Features
//!
//! - **Deterministic output**: equal drawings and parameters give byte-identical programs
//! - **Bounded programs**: at most 2 outlines and 4 drill holes per panel
//! - **Batch generation**: documents run in parallel and fail independently
//! - **Atomic writes**: a program file is either complete or absent

pub mod cli;

pub use panelcam_core::{
    BoundingBox, Circle, DocumentError, Error, ExtractionError, GeometricRecord, PersistError,
    Point2, Polyline, RecordKind, Result, TextLabel, WorkEnvelope, MACHINE_ENVELOPE,
};

pub use panelcam_settings::{
    MachiningParameters, ParameterOverlay, ProcessOrder, SettingsError, SettingsResult,
};

pub use panelcam_camtools::{
    BatchProcessor, BatchReport, CadDocument, CamToolError, CamToolResult, ConversionOutput,
    DocumentResult, DocumentSource, GenerationOutcome, GeometryFilter, GeometrySummary,
    InputStore, InstructionProgram, IntakeError, MachiningSet, ProgramSink, ProgramStore,
    StoredDocument, ToolpathSequencer, UploadReceipt,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging
///
/// Log records go to stderr so that command output on stdout stays clean.
/// `RUST_LOG` takes precedence over `verbosity` (0 = info, 1 = debug,
/// 2+ = trace). With `json` set, records are emitted as JSON
/// lines.
pub fn init_logging(verbosity: u8, json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .try_init()?;
    }

    Ok(())
}
