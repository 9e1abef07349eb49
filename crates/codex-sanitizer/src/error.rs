//! Error taxonomy for loading, sanitizing, and writing codex documents.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Top-level value is not a JSON object.
    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },

    #[error("expected 'codex' to be an array, found {found}")]
    CodexNotArray { found: &'static str },

    #[error("codex item {index} is not an object (found {found})")]
    ItemNotObject { index: usize, found: &'static str },

    #[error("failed to serialize sanitized codex")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SanitizeError>;

/// Short JSON type name used in shape errors.
pub fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
