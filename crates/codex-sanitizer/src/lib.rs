//! Strip private (`_`-prefixed) fields from a codex export before publishing.

pub mod cli;
pub mod codex;
pub mod config;
pub mod error;
pub mod logging;

pub use codex::{CodexDocument, SanitizeOptions, SanitizeReport, sanitize_file};
pub use error::SanitizeError;
