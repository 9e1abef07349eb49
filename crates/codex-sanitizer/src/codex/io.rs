//! Reading codex exports and writing the sanitized document.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::{CodexDocument, MAX_INDENT, SanitizeOptions, SanitizeReport, sanitize_document};
use crate::error::{Result, SanitizeError};

/// Read and parse a JSON document from `path`.
pub fn load_document(path: &Path) -> Result<JsonValue> {
    let content = fs::read(path).map_err(|source| SanitizeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| SanitizeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `doc` with `indent` spaces per level (at most [`MAX_INDENT`])
/// and no trailing newline.
pub fn render(doc: &CodexDocument, indent: usize) -> Result<Vec<u8>> {
    let indent = " ".repeat(indent.min(MAX_INDENT));
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    doc.serialize(&mut ser).map_err(SanitizeError::Serialize)?;
    Ok(buf)
}

/// Create or truncate `path` and write `bytes` to it.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| SanitizeError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut f = fs::File::create(path).map_err(write_err)?;
    f.write_all(bytes).map_err(write_err)?;
    f.flush().map_err(write_err)?;
    Ok(())
}

/// Load `input`, strip private fields, and write the public document to
/// `output`. Nothing is written unless the whole input sanitizes cleanly.
pub fn sanitize_file(
    input: &Path,
    output: &Path,
    options: &SanitizeOptions,
) -> Result<SanitizeReport> {
    tracing::debug!("reading codex export from {}", input.display());
    let doc = load_document(input)?;
    let (public, report) = sanitize_document(doc, options)?;
    let bytes = render(&public, options.indent)?;
    write_output(output, &bytes)?;
    tracing::info!(
        "sanitized {} item(s), removed {} private field(s) -> {}",
        report.items,
        report.removed_fields,
        output.display()
    );
    Ok(report)
}
