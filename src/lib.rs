//! Mergeline - Parse and resolve git conflict markers
//!
//! This library finds the `<<<<<<<` / `|||||||` / `=======` / `>>>>>>>` blocks
//! git leaves in files after a conflicted merge, models each block as a
//! [`Conflict`] whose sides keep tracking their text while the file is edited,
//! and resolves a block by keeping one side or several sides in order.
//!
//! # Architecture
//!
//! The library is organized into focused modules:
//!
//! - **buffer** - Line-addressable text with markers, transactions, and undo
//! - **conflict** - Marker parsing, the conflict model, cursor matching, and resolution
//! - **repository** - Discovery of in-progress merges and their conflicted files
//!
//! # Usage
//!
//! 1. **CLI tool** (`src/main.rs`) - status, check, resolve, and a watch TUI
//! 2. **Library** - Rust code can drive the parser and resolver directly
//!
//! # Example
//!
//! ```rust
//! use mergeline::{Source, TextBuffer, resolve_as, scan_for_conflicts};
//!
//! let mut buffer = TextBuffer::new("<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> topic\n");
//! let mut conflicts = scan_for_conflicts(&mut buffer, false).expect("markers parse");
//! assert_eq!(conflicts.len(), 1);
//!
//! resolve_as(&mut buffer, &mut conflicts[0], Source::Theirs).expect("theirs exists");
//! assert_eq!(buffer.text(), "B\n");
//! ```

pub mod buffer;
pub mod conflict;
pub mod repository;

pub use buffer::{BufferError, MarkerId, Point, Range, TextBuffer};
pub use conflict::{
    Conflict, ConflictError, ConflictMatch, Position, ResolutionProgress, Side, Source,
    match_cursors_to_conflicts, resolve_as, resolve_as_sequence, scan_for_conflicts,
};
pub use repository::{
    ConflictSummary, ConflictedFile, FileReport, MergeSession, MergeState, RepositoryError,
};
