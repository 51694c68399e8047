use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a file could not be read as text.
///
/// During bundling these are per-file conditions: the run logs them and
/// moves on to the next file.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("binary content")]
    Binary,
    #[error("not valid UTF-8")]
    InvalidUtf8,
}

/// Errors produced by bundling and restore operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The restore input file does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// A restored record carries a path that must not be written.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A walked file could not be read into the bundle.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    /// Output or restored-file I/O failed. Always fatal.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A command-line glob pattern does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl Error {
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
