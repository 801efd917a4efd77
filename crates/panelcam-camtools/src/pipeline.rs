//! Single-document pipeline: extract → filter → sequence

use crate::document::CadDocument;
use crate::extractor;
use crate::filter::{GeometryFilter, MachiningSet};
use crate::program::InstructionProgram;
use crate::sequencer::ToolpathSequencer;
use panelcam_core::geometry::{GeometricRecord, RecordKind, WorkEnvelope, MACHINE_ENVELOPE};
use panelcam_core::ExtractionError;
use panelcam_settings::MachiningParameters;
use serde::{Deserialize, Serialize};

/// Counts reported for one converted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeometrySummary {
    /// Drawable records extracted from the document
    pub total_records: usize,
    /// Polylines accepted into the machining set
    pub polylines: usize,
    /// Circles accepted into the machining set
    pub circles: usize,
    /// Text labels whose insertion point lies in the envelope
    pub texts: usize,
}

impl GeometrySummary {
    pub fn new(records: &[GeometricRecord], set: &MachiningSet, envelope: &WorkEnvelope) -> Self {
        let texts = records
            .iter()
            .filter(|record| match &record.kind {
                RecordKind::TextLabel(label) => envelope.contains(label.insertion),
                _ => false,
            })
            .count();

        Self {
            total_records: records.len(),
            polylines: set.polylines().len(),
            circles: set.circles().len(),
            texts,
        }
    }
}

/// Everything produced for one document
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub summary: GeometrySummary,
    pub machining_set: MachiningSet,
    pub program: InstructionProgram,
}

/// Run the full pipeline on an opened document
///
/// Extraction completes before filtering starts, and filtering before
/// sequencing. Only extraction can fail.
pub fn convert(
    document: &CadDocument,
    params: &MachiningParameters,
) -> Result<ConversionOutput, ExtractionError> {
    let records = extractor::extract(document)?;
    let machining_set = GeometryFilter::with_envelope(MACHINE_ENVELOPE).apply(&records);
    let summary = GeometrySummary::new(&records, &machining_set, &MACHINE_ENVELOPE);
    let program = ToolpathSequencer::new(params.clone()).sequence(&machining_set);

    Ok(ConversionOutput {
        summary,
        machining_set,
        program,
    })
}
