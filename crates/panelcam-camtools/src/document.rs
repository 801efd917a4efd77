//! CAD document reader
//!
//! Opens DXF drawings through the `dxf` crate and exposes the model-space
//! entities to the extractor. Opening is the only step that touches bytes;
//! everything downstream works on an already-parsed drawing.

use crate::intake::is_cad_filename;
use dxf::entities::Entity;
use dxf::Drawing;
use panelcam_core::DocumentError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A successfully parsed CAD document
pub struct CadDocument {
    source_id: String,
    drawing: Drawing,
}

impl std::fmt::Debug for CadDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CadDocument")
            .field("source_id", &self.source_id)
            .finish_non_exhaustive()
    }
}

impl CadDocument {
    /// Open a DXF file from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let source_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !is_cad_filename(path) {
            return Err(DocumentError::UnsupportedFormat(source_id));
        }

        let drawing = Drawing::load_file(path).map_err(|e| DocumentError::open(&source_id, e))?;
        debug!(source = %source_id, "Opened DXF document");

        Ok(Self { source_id, drawing })
    }

    /// Parse a DXF document from any reader
    pub fn from_reader<R: Read>(
        source_id: impl Into<String>,
        reader: &mut R,
    ) -> Result<Self, DocumentError> {
        let source_id = source_id.into();
        let drawing = Drawing::load(reader).map_err(|e| DocumentError::open(&source_id, e))?;
        Ok(Self { source_id, drawing })
    }

    /// Wrap a drawing that is already in memory
    pub fn from_drawing(source_id: impl Into<String>, drawing: Drawing) -> Self {
        Self {
            source_id: source_id.into(),
            drawing,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Model-space entities in document order
    pub fn model_space_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.drawing
            .entities()
            .filter(|entity| !entity.common.is_in_paper_space)
    }
}
