use serde::Serialize;
use serde_json::{Map, Value};

/// Key prefix marking a field as private.
pub const DEFAULT_PRIVATE_PREFIX: &str = "_";
/// Spaces per indentation level in the written document.
pub const DEFAULT_INDENT: usize = 2;
/// Widest indentation accepted; larger requests are clamped.
pub const MAX_INDENT: usize = 16;

/// Public codex document: a single `codex` list of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodexDocument {
    pub codex: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Keys starting with this prefix are dropped. Never empty.
    pub private_prefix: String,
    pub indent: usize,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            private_prefix: DEFAULT_PRIVATE_PREFIX.to_string(),
            indent: DEFAULT_INDENT,
        }
    }
}

/// Counts gathered while sanitizing a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub items: usize,
    pub removed_fields: usize,
}
