//! Batch generation
//!
//! Runs the pipeline over an explicit list of document identifiers. Every
//! document is opened, converted and persisted on its own, in parallel
//! through `rayon`. A failure is recorded in that document's result and
//! never reaches the others. Results keep the order of the input list.

use crate::document::CadDocument;
use crate::intake::program_file_name;
use crate::pipeline::{self, GeometrySummary};
use crate::program::InstructionProgram;
use panelcam_core::{DocumentError, PersistError};
use panelcam_settings::MachiningParameters;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{Entry, HashMap};
use std::path::PathBuf;
use tracing::{info, warn};

/// Where documents come from
pub trait DocumentSource: Sync {
    fn open(&self, id: &str) -> Result<CadDocument, DocumentError>;
}

/// Where generated programs go
pub trait ProgramSink: Sync {
    /// Persist `program` under `program_id`, returning the written location
    fn persist(
        &self,
        program_id: &str,
        program: &InstructionProgram,
    ) -> Result<PathBuf, PersistError>;
}

/// Outcome of generating one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Generated {
        program_id: String,
        line_count: usize,
        path: PathBuf,
    },
    Failed {
        error: String,
    },
}

/// Per-document entry of a batch report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub source: String,
    /// Present once extraction succeeded
    pub summary: Option<GeometrySummary>,
    pub outcome: GenerationOutcome,
}

impl DocumentResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Generated { .. })
    }

    fn failed(source: &str, summary: Option<GeometrySummary>, error: impl ToString) -> Self {
        Self {
            source: source.to_string(),
            summary,
            outcome: GenerationOutcome::Failed {
                error: error.to_string(),
            },
        }
    }
}

/// Results of a batch, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<DocumentResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs independent per-document pipelines with shared parameters
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    params: MachiningParameters,
}

impl BatchProcessor {
    pub fn new(params: MachiningParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MachiningParameters {
        &self.params
    }

    /// Process `ids` in parallel; results keep the order of `ids`
    ///
    /// Program ids are claimed in input order before any work starts. A
    /// document whose program id (compared case-insensitively) was already
    /// claimed by an earlier one fails without being opened, so no two
    /// documents ever write the same program.
    pub fn run<S, K>(&self, source: &S, sink: &K, ids: &[String]) -> BatchReport
    where
        S: DocumentSource + ?Sized,
        K: ProgramSink + ?Sized,
    {
        let claims = claim_program_ids(ids);
        let results: Vec<DocumentResult> = ids
            .par_iter()
            .zip(claims.par_iter())
            .map(|(id, claim)| match claim {
                Ok(program_id) => self.process_as(source, sink, id, program_id),
                Err(e) => {
                    warn!(source = %id, error = %e, "Document skipped");
                    DocumentResult::failed(id, None, e)
                }
            })
            .collect();

        let report = BatchReport { results };
        info!(
            documents = report.results.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        report
    }

    /// Open, convert and persist a single document
    pub fn process_one<S, K>(&self, source: &S, sink: &K, id: &str) -> DocumentResult
    where
        S: DocumentSource + ?Sized,
        K: ProgramSink + ?Sized,
    {
        self.process_as(source, sink, id, &program_file_name(id))
    }

    fn process_as<S, K>(&self, source: &S, sink: &K, id: &str, program_id: &str) -> DocumentResult
    where
        S: DocumentSource + ?Sized,
        K: ProgramSink + ?Sized,
    {
        let mut summary = None;
        match self.generate(source, sink, id, program_id, &mut summary) {
            Ok((line_count, path)) => {
                info!(source = %id, program = %program_id, lines = line_count, "Generated program");
                DocumentResult {
                    source: id.to_string(),
                    summary,
                    outcome: GenerationOutcome::Generated {
                        program_id: program_id.to_string(),
                        line_count,
                        path,
                    },
                }
            }
            Err(e) => {
                warn!(source = %id, error = %e, "Document failed");
                DocumentResult::failed(id, summary, e)
            }
        }
    }

    fn generate<S, K>(
        &self,
        source: &S,
        sink: &K,
        id: &str,
        program_id: &str,
        summary: &mut Option<GeometrySummary>,
    ) -> panelcam_core::Result<(usize, PathBuf)>
    where
        S: DocumentSource + ?Sized,
        K: ProgramSink + ?Sized,
    {
        let document = source.open(id)?;
        let output = pipeline::convert(&document, &self.params)?;
        *summary = Some(output.summary);

        let path = sink.persist(program_id, &output.program)?;
        Ok((output.program.line_count(), path))
    }
}

/// Program id for every document, or the error for a later duplicate
fn claim_program_ids(ids: &[String]) -> Vec<panelcam_core::Result<String>> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    ids.iter()
        .map(|id| {
            let program_id = program_file_name(id);
            match owners.entry(program_id.to_lowercase()) {
                Entry::Occupied(first) => Err(panelcam_core::Error::DuplicateProgram {
                    program_id,
                    first_source: first.get().to_string(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(id.as_str());
                    Ok(program_id)
                }
            }
        })
        .collect()
}
