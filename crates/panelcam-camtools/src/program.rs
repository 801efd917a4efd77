//! Instruction programs
//!
//! An [`InstructionProgram`] is the immutable, line-oriented output of the
//! sequencer. Persisting one is all-or-nothing: the text goes to a temporary
//! file beside the destination and is renamed into place only once it is
//! complete.

use panelcam_core::PersistError;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Ordered G-code lines, one instruction per line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstructionProgram {
    lines: Vec<String>,
}

impl InstructionProgram {
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Program text: every line terminated by `\n`
    pub fn to_text(&self) -> String {
        let capacity = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut text = String::with_capacity(capacity);
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Write the program to `path`, replacing any existing file
    ///
    /// On failure nothing is left at `path` that was not there before.
    pub fn write_atomic(&self, path: &Path) -> Result<(), PersistError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistError::new(path, e))?;
        tmp.write_all(self.to_text().as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| PersistError::new(path, e))?;
        tmp.persist(path)
            .map_err(|e| PersistError::new(path, e.error))?;

        info!(path = %path.display(), lines = self.line_count(), "Wrote program");
        Ok(())
    }
}

impl fmt::Display for InstructionProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
