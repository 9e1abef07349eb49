//! Codex documents: types, the private-field filter, and file I/O.

pub mod io;
pub mod sanitize;
pub mod types;

pub use io::*;
pub use sanitize::*;
pub use types::*;
