//! Positional argument handling for the `sanitize-codex` binary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const USAGE: &str = "Usage: sanitize-codex.py <input.json> <output.json>";

/// Exit status when too few arguments are supplied.
pub const USAGE_EXIT_CODE: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Too few arguments; print [`USAGE`] and exit with [`USAGE_EXIT_CODE`].
    Usage,
    Sanitize { input: PathBuf, output: PathBuf },
}

/// Interpret arguments (program name already removed). Anything past the
/// second positional is ignored.
pub fn parse_args<I, S>(args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        return Invocation::Usage;
    };
    let extra = args.count();
    if extra > 0 {
        tracing::debug!("ignoring {} extra argument(s)", extra);
    }
    Invocation::Sanitize {
        input: PathBuf::from(input),
        output: PathBuf::from(output),
    }
}

pub fn confirmation(output: &Path) -> String {
    format!("Wrote sanitized codex to {}", output.display())
}
