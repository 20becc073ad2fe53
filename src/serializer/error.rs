//! Error space shared by the serializer and its helpers.
//!
//! Structural misses (section not present, key not present) are not errors:
//! lookups report them through `Ok(false)` or `None` so that loading a stale or
//! hand-edited file degrades to "keep the defaults".

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or rewriting a settings file.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller input (bad key, bad section name, unusable value).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The text buffer could not grow.
    #[error("failed to allocate text buffer: {0}")]
    Memory(#[from] TryReserveError),

    /// An offset/length pair does not fit the buffer.
    #[error("range {pos}..{pos}+{len} is out of bounds for buffer of {size} bytes")]
    Range { pos: usize, len: usize, size: usize },

    /// A format tag or a text value could not be interpreted.
    #[error("format error: {0}")]
    Format(String),

    /// The session was already shut down.
    #[error("serializer session is not initialized")]
    NotInitialized,

    /// Underlying file operation failed.
    #[error("I/O error while {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pop from an empty header stack.
    #[error("header stack is empty")]
    EmptyStack,
}

impl Error {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type for serializer operations.
pub type Result<T> = std::result::Result<T, Error>;
