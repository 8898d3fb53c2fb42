//! Error types and the numeric return-code contract from the original C ABI.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A position within an input file. Column is intentionally not tracked:
/// the block indexer does not carry it across block boundaries cheaply, so
/// only the line of the record's first token is reported (see `parser.rs`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: Rc<Path>,
    pub line: u64,
}

impl Position {
    pub fn new(file: Rc<Path>, line: u64) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// The numeric return-code contract described in spec.md §6/§7, offered for
/// hosts that bridge to code expecting the original C `zone_*` ABI values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ReturnCode {
    Success = 0,
    SyntaxError = -1,
    SemanticError = -2,
    OutOfMemory = -3,
    NotPermitted = -4,
    NotAFile = -5,
    ReadError = -6,
    NotImplemented = -7,
}

/// Errors partition into the four classes from spec.md §7: syntax, semantic,
/// I/O, and resource exhaustion. Every variant carries the position of the
/// record that failed, matching the `(file, line, message)` triple the host
/// log callback receives.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("{position}: syntax error: {message}")]
    Syntax { position: Position, message: String },

    #[error("{position}: semantic error: {message}")]
    Semantic { position: Position, message: String },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{position}: {path}: no such file")]
    NotAFile { position: Position, path: PathBuf },

    #[error("out of memory: {message}")]
    OutOfMemory { message: String },

    #[error("buffer capacity exceeded: {message}")]
    BufferCapacityExceeded { message: String },

    #[error("{position}: not permitted: {message}")]
    NotPermitted { position: Position, message: String },
}

impl ZoneError {
    pub fn code(&self) -> ReturnCode {
        match self {
            ZoneError::Syntax { .. } => ReturnCode::SyntaxError,
            ZoneError::Semantic { .. } => ReturnCode::SemanticError,
            ZoneError::Io { .. } => ReturnCode::ReadError,
            ZoneError::NotAFile { .. } => ReturnCode::NotAFile,
            ZoneError::OutOfMemory { .. } => ReturnCode::OutOfMemory,
            ZoneError::BufferCapacityExceeded { .. } => ReturnCode::OutOfMemory,
            ZoneError::NotPermitted { .. } => ReturnCode::NotPermitted,
        }
    }

    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        ZoneError::Syntax { position, message: message.into() }
    }

    pub fn semantic(position: Position, message: impl Into<String>) -> Self {
        ZoneError::Semantic { position, message: message.into() }
    }

    pub fn not_permitted(position: Position, message: impl Into<String>) -> Self {
        ZoneError::NotPermitted { position, message: message.into() }
    }

    pub fn not_a_file(position: Position, path: PathBuf) -> Self {
        ZoneError::NotAFile { position, path }
    }
}

/// Severity levels for the host log callback (spec.md §6 "Log callback").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogPriority {
    Error,
    Info,
}
