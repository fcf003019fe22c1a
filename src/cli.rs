//! # Command-Line Front End
//!
//! Argument parsing and source-file reading for the `kozi` binary.
//! `spec.md` §6 scopes the CLI itself out of the CORE ("these contribute
//! no hard engineering"); this module is the ambient front end `SPEC_FULL.md`
//! §6.1 adds on top: the three-way exit-code contract (0/64/65/70) plus
//! zero-cost `-h`/`--help` and `-v`/`--version` handling.

use std::fmt;
use std::fs;
use std::io;

/// What the binary should do, derived from its argument list.
pub enum Command {
    /// No positional arguments: start the REPL.
    Repl,
    /// One positional argument: run it as a source file path.
    RunFile(String),
    Help,
    Version,
    /// Two or more arguments: usage error (`spec.md` §6, exit 64).
    Usage,
}

/// Parse the binary's argument list (excluding `argv[0]`).
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Command {
    let args: Vec<String> = args.into_iter().collect();
    match args.len() {
        0 => Command::Repl,
        1 => match args[0].as_str() {
            "-h" | "--help" => Command::Help,
            "-v" | "--version" => Command::Version,
            path => Command::RunFile(path.to_string()),
        },
        _ => Command::Usage,
    }
}

pub const USAGE: &str = "Usage: kozi <path>";

/// Build the full `-h`/`--help` text.
pub fn help_text() -> String {
    format!(
        "Kozi {}\n\n{}\n\n\
Options:\n  \
-h, --help     print this help text and exit\n  \
-v, --version  print the version and exit\n\n\
With no arguments, start an interactive REPL.",
        env!("CARGO_PKG_VERSION"),
        USAGE
    )
}

/// A failure reading and validating a source file, distinct from the
/// scanner's own [`crate::scanner::ScanError`] taxonomy: these happen
/// before a single token is scanned.
#[derive(Debug)]
pub enum SourceError {
    Io(io::Error),
    InvalidUtf8,
}

impl SourceError {
    /// `InvalidUtf8` is a scan-time concern (`spec.md` §4.1), so it carries
    /// the same exit code as any other compile error. A raw I/O failure
    /// (file missing, permission denied, ...) is not modeled by the spec at
    /// all; sysexits' `EX_IOERR` (74) is the conventional choice for the
    /// same family of exit codes 64/65/70 are drawn from.
    pub fn exit_code(&self) -> i32 {
        match self {
            SourceError::Io(_) => 74,
            SourceError::InvalidUtf8 => 65,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(err) => write!(f, "{}", err),
            SourceError::InvalidUtf8 => write!(f, "source file is not valid UTF-8"),
        }
    }
}

/// Read `path` and validate it as UTF-8 source text (`spec.md` §6:
/// "Source encoding. UTF-8.").
pub fn read_source(path: &str) -> Result<String, SourceError> {
    let bytes = fs::read(path).map_err(SourceError::Io)?;
    String::from_utf8(bytes).map_err(|_| SourceError::InvalidUtf8)
}

#[cfg(test)]
mod tests;
