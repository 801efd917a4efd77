mod common;

use common::{circle, drawing, rectangle, save_drawing, text};
use dxf::entities::Entity;
use panelcam_camtools::batch::{BatchProcessor, DocumentSource, GenerationOutcome, ProgramSink};
use panelcam_camtools::{CadDocument, InputStore, InstructionProgram, ProgramStore};
use panelcam_core::{DocumentError, PersistError};
use panelcam_settings::MachiningParameters;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

fn store_with_panels() -> (TempDir, InputStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = InputStore::open(dir.path().join("input")).unwrap();

    save_drawing(
        &store.root().join("door.dxf"),
        vec![
            text(50.0, 50.0, "DOOR"),
            circle(100.0, 200.0, 10.0),
            rectangle(0.0, 0.0, 100.0, 100.0),
        ],
    );
    save_drawing(&store.root().join("shelf.dxf"), vec![rectangle(0.0, 0.0, 600.0, 300.0)]);
    std::fs::write(store.root().join("broken.dxf"), "this is not a drawing").unwrap();

    (dir, store)
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_batch_generates_programs() {
    let (dir, store) = store_with_panels();
    let sink = ProgramStore::new(dir.path().join("output"));
    let processor = BatchProcessor::new(MachiningParameters::default());

    let report = processor.run(&store, &sink, &ids(&["door.dxf", "shelf.dxf"]));

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 0);

    let door = &report.results[0];
    assert_eq!(door.source, "door.dxf");
    let summary = door.summary.unwrap();
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.polylines, 1);
    assert_eq!(summary.circles, 1);
    assert_eq!(summary.texts, 1);

    match &door.outcome {
        GenerationOutcome::Generated {
            program_id,
            line_count,
            path,
        } => {
            assert_eq!(program_id, "door.nc");
            assert_eq!(*line_count, 22);
            let text = std::fs::read_to_string(path).unwrap();
            assert_eq!(text.lines().count(), 22);
            assert!(text.starts_with("G54\n"));
            assert!(text.ends_with("M30\n"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_failures_are_isolated_and_ordered() {
    let (dir, store) = store_with_panels();
    let sink = ProgramStore::new(dir.path().join("output"));
    let processor = BatchProcessor::new(MachiningParameters::default());

    let report = processor.run(
        &store,
        &sink,
        &ids(&["broken.dxf", "door.dxf", "missing.dxf", "notes.txt", "shelf.dxf"]),
    );

    let sources: Vec<&str> = report.results.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(
        sources,
        ["broken.dxf", "door.dxf", "missing.dxf", "notes.txt", "shelf.dxf"]
    );

    let ok: Vec<bool> = report.results.iter().map(|r| r.is_success()).collect();
    assert_eq!(ok, [false, true, false, false, true]);
    assert!(report.results[0].summary.is_none());

    assert!(dir.path().join("output").join("door.nc").exists());
    assert!(!dir.path().join("output").join("broken.nc").exists());
}

#[test]
fn test_empty_document_still_gets_a_program() {
    let dir = tempfile::tempdir().unwrap();
    let store = InputStore::open(dir.path()).unwrap();
    save_drawing(&store.root().join("blank.dxf"), vec![]);
    let sink = ProgramStore::new(dir.path().join("out"));

    let report = BatchProcessor::new(MachiningParameters::default()).run(
        &store,
        &sink,
        &ids(&["blank.dxf"]),
    );

    match &report.results[0].outcome {
        GenerationOutcome::Generated { line_count, .. } => assert_eq!(*line_count, 4),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

struct FailingSink;

impl ProgramSink for FailingSink {
    fn persist(
        &self,
        program_id: &str,
        _program: &InstructionProgram,
    ) -> Result<PathBuf, PersistError> {
        Err(PersistError::new(
            program_id,
            io::Error::new(io::ErrorKind::StorageFull, "disk full"),
        ))
    }
}

#[test]
fn test_persist_failure_keeps_summary() {
    let (_dir, store) = store_with_panels();
    let report = BatchProcessor::new(MachiningParameters::default()).run(
        &store,
        &FailingSink,
        &ids(&["door.dxf"]),
    );

    let result = &report.results[0];
    assert!(!result.is_success());
    assert!(result.summary.is_some());
    match &result.outcome {
        GenerationOutcome::Failed { error } => assert!(error.contains("disk full")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_report_serializes_to_json() {
    let (dir, store) = store_with_panels();
    let sink = ProgramStore::new(dir.path().join("output"));
    let report = BatchProcessor::new(MachiningParameters::default()).run(
        &store,
        &sink,
        &ids(&["door.dxf", "broken.dxf"]),
    );

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results[0]["outcome"]["status"], "generated");
    assert_eq!(results[0]["outcome"]["program_id"], "door.nc");
    assert_eq!(results[0]["summary"]["circles"], 1);
    assert_eq!(results[1]["outcome"]["status"], "failed");
    assert!(results[1]["summary"].is_null());
}

#[test]
fn test_all_ids_drive_a_full_batch() {
    let (dir, store) = store_with_panels();
    let sink = ProgramStore::new(dir.path().join("output"));

    let all = store.all_ids().unwrap();
    assert_eq!(all, ids(&["broken.dxf", "door.dxf", "shelf.dxf"]));

    let report = BatchProcessor::new(MachiningParameters::default()).run(&store, &sink, &all);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
}

type Build = fn() -> Vec<Entity>;

/// Builds drawings on demand and remembers which ids were opened
struct MemorySource {
    drawings: HashMap<String, Build>,
    opened: Mutex<Vec<String>>,
}

impl MemorySource {
    fn new(drawings: &[(&str, Build)]) -> Self {
        Self {
            drawings: drawings
                .iter()
                .map(|(id, build)| (id.to_string(), *build))
                .collect(),
            opened: Mutex::new(Vec::new()),
        }
    }
}

impl DocumentSource for MemorySource {
    fn open(&self, id: &str) -> Result<CadDocument, DocumentError> {
        self.opened.lock().unwrap().push(id.to_string());
        let build = self
            .drawings
            .get(id)
            .ok_or_else(|| DocumentError::open(id, "not found"))?;
        Ok(CadDocument::from_drawing(id, drawing(build())))
    }
}

fn hole_only() -> Vec<Entity> {
    vec![circle(100.0, 200.0, 10.0)]
}

fn outline_only() -> Vec<Entity> {
    vec![rectangle(0.0, 0.0, 100.0, 100.0)]
}

#[test]
fn test_colliding_program_ids_keep_first_document() {
    let dir = tempfile::tempdir().unwrap();
    let sink = ProgramStore::new(dir.path());
    let source = MemorySource::new(&[
        ("door.DXF", hole_only as Build),
        ("door.dxf", outline_only as Build),
        ("shelf.dxf", outline_only as Build),
    ]);

    let report = BatchProcessor::new(MachiningParameters::default()).run(
        &source,
        &sink,
        &ids(&["door.DXF", "door.dxf", "shelf.dxf"]),
    );

    let ok: Vec<bool> = report.results.iter().map(|r| r.is_success()).collect();
    assert_eq!(ok, [true, false, true]);

    let first_lines = match &report.results[0].outcome {
        GenerationOutcome::Generated {
            program_id,
            line_count,
            ..
        } => {
            assert_eq!(program_id, "door.nc");
            *line_count
        }
        other => panic!("unexpected outcome: {:?}", other),
    };
    match &report.results[1].outcome {
        GenerationOutcome::Failed { error } => {
            assert!(error.contains("already produced by 'door.DXF'"), "{}", error)
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(report.results[1].summary.is_none());

    // The loser is never opened, so it cannot race the winner's write
    let mut opened = source.opened.lock().unwrap().clone();
    opened.sort();
    assert_eq!(opened, ["door.DXF", "shelf.dxf"]);

    let programs: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.starts_with("door"))
        .collect();
    assert_eq!(programs, ["door.nc"]);
    let text = std::fs::read_to_string(dir.path().join("door.nc")).unwrap();
    assert_eq!(text.lines().count(), first_lines);
    assert!(text.contains("M6 T2"));
    assert!(!text.contains("M6 T1"));
}

#[test]
fn test_repeated_id_is_processed_once() {
    let dir = tempfile::tempdir().unwrap();
    let sink = ProgramStore::new(dir.path());
    let source = MemorySource::new(&[("door.dxf", hole_only as Build)]);

    let report = BatchProcessor::new(MachiningParameters::default()).run(
        &source,
        &sink,
        &ids(&["door.dxf", "door.dxf"]),
    );

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert!(report.results[0].is_success());
    assert_eq!(source.opened.lock().unwrap().len(), 1);
}
