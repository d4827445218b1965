//! Recursive state machine over git conflict markers
//!
//! ```text
//! conflict   := header [ base ] separator footer
//! header     := "<<<<<<<" description, body lines up to "|||||||" or "======="
//! base       := "|||||||" description, body lines up to "=======" (nested conflicts skipped)
//! separator  := "======="
//! footer     := body lines, then ">>>>>>>" description
//! ```
//!
//! The parser only reports row ranges to a [`Visitor`]. It never touches the
//! text it walks over, so the same machine serves both the collecting pass and
//! the cheap skip over conflicts nested inside a base side.

use super::boundary::{Boundary, advance_to_boundary};
use super::error::Result;
use super::{Position, Source};
use crate::buffer::LineAdapter;

/// Receives the row ranges of each region as the parser discovers them.
///
/// Rows are buffer rows. `text_row_end` is exclusive.
pub trait Visitor {
    fn visit_our_side(
        &mut self,
        position: Position,
        banner_row: usize,
        text_row_start: usize,
        text_row_end: usize,
    );

    fn visit_base_side(&mut self, banner_row: usize, text_row_start: usize, text_row_end: usize);

    fn visit_separator(&mut self, sep_row_start: usize, sep_row_end: usize);

    fn visit_their_side(
        &mut self,
        position: Position,
        banner_row: usize,
        text_row_start: usize,
        text_row_end: usize,
    );
}

/// Visitor that ignores every region
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopVisitor;

impl Visitor for NoopVisitor {
    fn visit_our_side(&mut self, _: Position, _: usize, _: usize, _: usize) {}

    fn visit_base_side(&mut self, _: usize, _: usize, _: usize) {}

    fn visit_separator(&mut self, _: usize, _: usize) {}

    fn visit_their_side(&mut self, _: Position, _: usize, _: usize, _: usize) {}
}

/// Parse one conflict starting on the adapter's current `<<<<<<<` row.
///
/// On success the adapter rests on the row after the closing `>>>>>>>` banner.
/// During a rebase the sources of the top and bottom sides are swapped;
/// positions never are.
pub fn parse_conflict<A, V>(adapter: &mut A, is_rebase: bool, visitor: &mut V) -> Result<()>
where
    A: LineAdapter + ?Sized,
    V: Visitor + ?Sized,
{
    let mut parser = ConflictParser {
        adapter,
        visitor,
        state: ParseState::default(),
    };

    let (top, bottom) = if is_rebase {
        (Source::Theirs, Source::Ours)
    } else {
        (Source::Ours, Source::Theirs)
    };

    parser.visit_header_side(top)?;
    parser.visit_base_and_separator(is_rebase)?;
    parser.visit_footer_side(bottom)
}

/// State carried between the phases of a single parse.
///
/// Nested parses get their own instance.
#[derive(Debug, Default, Clone, Copy)]
struct ParseState {
    last_boundary: Option<Boundary>,
}

struct ConflictParser<'a, A: ?Sized, V: ?Sized> {
    adapter: &'a mut A,
    visitor: &'a mut V,
    state: ParseState,
}

impl<A, V> ConflictParser<'_, A, V>
where
    A: LineAdapter + ?Sized,
    V: Visitor + ?Sized,
{
    fn advance_to(&mut self, kinds: &[Boundary]) -> Result<Boundary> {
        let found = advance_to_boundary(&mut *self.adapter, kinds)?;
        self.state.last_boundary = Some(found);
        Ok(found)
    }

    fn emit_side(
        &mut self,
        source: Source,
        position: Position,
        banner_row: usize,
        text_row_start: usize,
        text_row_end: usize,
    ) {
        match source {
            Source::Ours => {
                self.visitor
                    .visit_our_side(position, banner_row, text_row_start, text_row_end)
            }
            Source::Theirs => {
                self.visitor
                    .visit_their_side(position, banner_row, text_row_start, text_row_end)
            }
            Source::Base => self
                .visitor
                .visit_base_side(banner_row, text_row_start, text_row_end),
        }
    }

    /// Side whose banner is its first line
    fn visit_header_side(&mut self, source: Source) -> Result<()> {
        let banner_row = self.adapter.current_row();
        self.adapter.advance_row();
        self.advance_to(&[Boundary::Base, Boundary::Separator])?;
        let text_row_end = self.adapter.current_row();

        self.emit_side(source, Position::Top, banner_row, banner_row + 1, text_row_end);
        Ok(())
    }

    fn visit_base_and_separator(&mut self, is_rebase: bool) -> Result<()> {
        if self.state.last_boundary == Some(Boundary::Base) {
            self.visit_base_side(is_rebase)?;
        }
        self.visit_separator();
        Ok(())
    }

    fn visit_base_side(&mut self, is_rebase: bool) -> Result<()> {
        let banner_row = self.adapter.current_row();
        self.adapter.advance_row();

        let kinds = [Boundary::Open, Boundary::Separator];
        let mut found = self.advance_to(&kinds)?;
        while found == Boundary::Open {
            // Criss-cross merges leave whole conflicts inside the base side
            parse_conflict(&mut *self.adapter, is_rebase, &mut NoopVisitor)?;
            found = self.advance_to(&kinds)?;
        }
        let text_row_end = self.adapter.current_row();

        self.emit_side(Source::Base, Position::Middle, banner_row, banner_row + 1, text_row_end);
        Ok(())
    }

    fn visit_separator(&mut self) {
        let sep_row_start = self.adapter.current_row();
        self.adapter.advance_row();
        let sep_row_end = self.adapter.current_row();

        self.visitor.visit_separator(sep_row_start, sep_row_end);
    }

    /// Side whose banner is its last line
    fn visit_footer_side(&mut self, source: Source) -> Result<()> {
        let text_row_start = self.adapter.current_row();
        self.advance_to(&[Boundary::Close])?;
        self.adapter.advance_row();
        let banner_row = self.adapter.current_row() - 1;

        self.emit_side(source, Position::Bottom, banner_row, text_row_start, banner_row);
        Ok(())
    }
}
