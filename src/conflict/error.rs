//! Error types for conflict parsing and resolution

use super::Source;
use crate::buffer::BufferError;
use thiserror::Error;

/// Errors that can occur while parsing or resolving conflicts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// A required boundary never appeared before the end of the text.
    /// The collection scanner discards the candidate and keeps going.
    #[error("Unterminated conflict side starting at row {from_row}")]
    UnterminatedConflict { from_row: usize },

    /// A boundary line was found but its description could not be read
    #[error("Malformed conflict banner on row {row}: {line:?}")]
    MalformedBanner { row: usize, line: String },

    /// The parser finished without reporting every mandatory region
    #[error("Conflict at row {row} is missing its {region}")]
    IncompleteConflict { row: usize, region: &'static str },

    /// A side was requested that this conflict does not have
    #[error("Conflict has no {0} side")]
    MissingSide(Source),

    /// The conflict was already resolved
    #[error("Conflict was already resolved as {0}")]
    AlreadyResolved(Source),

    /// A resolution was requested with no sides to keep
    #[error("No sides given to resolve the conflict with")]
    EmptyResolution,

    /// A marker backing this conflict is gone
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Result type alias using ConflictError
pub type Result<T> = std::result::Result<T, ConflictError>;
