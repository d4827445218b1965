//! Error types for repository operations

use crate::conflict::ConflictError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering or scanning a repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Repository not found or invalid
    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    /// Bare repository not supported
    #[error("Bare repositories are not supported. Mergeline needs a working directory to resolve conflicts in.")]
    BareRepository,

    /// Failed to resolve HEAD reference
    #[error("Failed to resolve HEAD: {reason}")]
    HeadResolution { reason: String },

    /// The index could not be read
    #[error("Failed to read the index: {reason}")]
    IndexRead { reason: String },

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Reading or writing a working tree file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The conflict markers in a file could not be parsed or resolved
    #[error("{path}: {source}")]
    Conflict {
        path: PathBuf,
        #[source]
        source: ConflictError,
    },
}

/// Result type alias using RepositoryError
pub type Result<T> = std::result::Result<T, RepositoryError>;

impl RepositoryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepositoryError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn conflict(path: impl Into<PathBuf>, source: ConflictError) -> Self {
        RepositoryError::Conflict {
            path: path.into(),
            source,
        }
    }
}
