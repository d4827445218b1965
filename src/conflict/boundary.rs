//! Detection of the 7-character boundary lines git writes around a conflict

use super::error::{ConflictError, Result};
use crate::buffer::LineAdapter;

/// One of the four boundary lines of a conflict block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// `<<<<<<<` opens the top side
    Open,
    /// `|||||||` opens the base side
    Base,
    /// `=======` separates the sides
    Separator,
    /// `>>>>>>>` closes the bottom side
    Close,
}

impl Boundary {
    pub const ALL: [Boundary; 4] = [
        Boundary::Open,
        Boundary::Base,
        Boundary::Separator,
        Boundary::Close,
    ];

    /// The full 7-character run
    pub const fn marker(self) -> &'static str {
        match self {
            Boundary::Open => "<<<<<<<",
            Boundary::Base => "|||||||",
            Boundary::Separator => "=======",
            Boundary::Close => ">>>>>>>",
        }
    }

    pub fn matches(self, line: &str) -> bool {
        line.starts_with(self.marker())
    }
}

/// The first of `kinds` that begins the adapter's current line, if any
pub fn is_at_boundary<A>(adapter: &A, kinds: &[Boundary]) -> Option<Boundary>
where
    A: LineAdapter + ?Sized,
{
    let line = adapter.current_line();
    kinds.iter().copied().find(|kind| kind.matches(line))
}

/// Advance until the current line is one of `kinds`.
///
/// The current line is tested before moving. Running off the end of the input
/// raises [`ConflictError::UnterminatedConflict`].
pub fn advance_to_boundary<A>(adapter: &mut A, kinds: &[Boundary]) -> Result<Boundary>
where
    A: LineAdapter + ?Sized,
{
    let from_row = adapter.current_row();
    loop {
        if let Some(found) = is_at_boundary(adapter, kinds) {
            return Ok(found);
        }
        adapter.advance_row();
        if adapter.is_at_end() {
            return Err(ConflictError::UnterminatedConflict { from_row });
        }
    }
}
