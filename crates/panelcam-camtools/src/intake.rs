//! Upload intake helpers
//!
//! Name checks applied to user-supplied files before they enter the
//! document store.

use std::path::Path;

/// Extension of accepted CAD documents
pub const CAD_EXTENSION: &str = "dxf";

/// Extension of generated numeric-control programs
pub const PROGRAM_EXTENSION: &str = "nc";

/// Name used when sanitising leaves nothing usable
pub const DEFAULT_UPLOAD_NAME: &str = "upload_file.dxf";

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip path separators and reserved characters from a user-supplied name
///
/// Non-ASCII characters are kept. Leading and trailing dots and spaces are
/// trimmed; an empty result (or a bare relative-path marker) becomes
/// [`DEFAULT_UPLOAD_NAME`].
pub fn sanitize_filename(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect();
    let trimmed = stripped.trim_matches(|c| c == '.' || c == ' ');
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        DEFAULT_UPLOAD_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// True when the name ends in `.dxf` (any case)
pub fn is_cad_filename(name: impl AsRef<Path>) -> bool {
    name.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CAD_EXTENSION))
}

/// Program file name for a document: the document stem plus `.nc`
pub fn program_file_name(source_id: &str) -> String {
    let stem = Path::new(source_id)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "output".to_string());
    format!("{}.{}", stem, PROGRAM_EXTENSION)
}
