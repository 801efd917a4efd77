//! Document and program stores
//!
//! [`InputStore`] is a flat directory of uploaded DXF documents and serves
//! as the batch [`DocumentSource`]. [`ProgramStore`] is the directory that
//! generated programs are written to and serves as the [`ProgramSink`].

use crate::batch::{DocumentSource, ProgramSink};
use crate::document::CadDocument;
use crate::error::{IntakeError, IntakeResult};
use crate::intake::{is_cad_filename, sanitize_filename};
use crate::program::InstructionProgram;
use chrono::{DateTime, Utc};
use panelcam_core::{DocumentError, PersistError};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// A document held in the input store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDocument {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Result of accepting an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    /// Sanitized name the document was stored under
    pub name: String,
    /// An existing document of the same name was overwritten
    pub replaced: bool,
}

/// Flat directory of CAD documents
#[derive(Debug, Clone)]
pub struct InputStore {
    root: PathBuf,
}

impl InputStore {
    /// Open the store at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> IntakeResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stored `.dxf` documents sorted by name
    pub fn list(&self) -> IntakeResult<Vec<StoredDocument>> {
        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !metadata.is_file() || !is_cad_filename(&name) {
                continue;
            }
            documents.push(StoredDocument {
                name,
                size: metadata.len(),
                modified: DateTime::<Utc>::from(metadata.modified()?),
            });
        }
        documents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(documents)
    }

    /// Names of every stored document, as an explicit work list
    pub fn all_ids(&self) -> IntakeResult<Vec<String>> {
        Ok(self.list()?.into_iter().map(|d| d.name).collect())
    }

    /// Store an uploaded document under its sanitized name
    pub fn accept_upload(&self, name: &str, bytes: &[u8]) -> IntakeResult<UploadReceipt> {
        if !is_cad_filename(name) {
            return Err(IntakeError::UnsupportedExtension(name.to_string()));
        }
        if bytes.is_empty() {
            return Err(IntakeError::EmptyUpload(name.to_string()));
        }

        let stored_name = sanitize_filename(name);
        if !is_cad_filename(&stored_name) {
            return Err(IntakeError::UnsupportedExtension(stored_name));
        }

        let path = self.root.join(&stored_name);
        let replaced = path.exists();

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| IntakeError::IoError(e.error))?;

        info!(name = %stored_name, bytes = bytes.len(), replaced, "Stored document");
        Ok(UploadReceipt {
            name: stored_name,
            replaced,
        })
    }

    /// Copy a file from disk into the store
    pub fn import_file(&self, path: &Path) -> IntakeResult<UploadReceipt> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| IntakeError::InvalidName(path.display().to_string()))?;
        let bytes = fs::read(path)?;
        self.accept_upload(&name, &bytes)
    }

    pub fn delete(&self, name: &str) -> IntakeResult<()> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(IntakeError::NotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        info!(name = %name, "Deleted document");
        Ok(())
    }

    /// Path of a stored document; only plain `.dxf` file names are accepted
    pub fn resolve(&self, name: &str) -> IntakeResult<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(IntakeError::InvalidName(name.to_string())),
        }
        if !is_cad_filename(name) {
            return Err(IntakeError::UnsupportedExtension(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl DocumentSource for InputStore {
    fn open(&self, id: &str) -> Result<CadDocument, DocumentError> {
        let path = self.resolve(id).map_err(|e| match e {
            IntakeError::UnsupportedExtension(name) => DocumentError::UnsupportedFormat(name),
            other => DocumentError::open(id, other),
        })?;
        if !path.is_file() {
            return Err(DocumentError::open(id, IntakeError::NotFound(id.to_string())));
        }
        CadDocument::open(path)
    }
}

/// Output directory for generated programs
#[derive(Debug, Clone)]
pub struct ProgramStore {
    root: PathBuf,
}

impl ProgramStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProgramSink for ProgramStore {
    fn persist(
        &self,
        program_id: &str,
        program: &InstructionProgram,
    ) -> Result<PathBuf, PersistError> {
        let path = self.root.join(program_id);
        fs::create_dir_all(&self.root).map_err(|e| PersistError::new(&path, e))?;
        program.write_atomic(&path)?;
        debug!(path = %path.display(), "Program persisted");
        Ok(path)
    }
}
