//! Git conflict markers: parsing, modelling, and resolution
//!
//! This module recognizes the marker blocks git leaves in a file after an
//! unresolved merge (both the 2-way and the diff3 layout, including conflicts
//! nested inside a base side by criss-cross merges), turns each block into a
//! [`Conflict`] whose pieces track their text through a [`TextBuffer`], and
//! resolves a conflict by keeping one side or a sequence of sides.

mod boundary;
mod error;
mod matcher;
mod parser;
mod progress;
mod resolve;
mod scanner;
mod side;
mod source;
mod visitor;

pub use boundary::{Boundary, advance_to_boundary, is_at_boundary};
pub use error::{ConflictError, Result as ConflictResult};
pub use matcher::{ConflictMatch, match_cursors_to_conflicts};
pub use parser::{NoopVisitor, Visitor, parse_conflict};
pub use progress::{PathProgress, ProgressPayload, ResolutionProgress};
pub use resolve::{resolve_as, resolve_as_sequence};
pub use scanner::scan_for_conflicts;
pub use side::{Banner, Separator, Side};
pub use source::{Position, Source};
pub use visitor::CollectingVisitor;

use crate::buffer::{MarkerId, Point, Range, TextBuffer};
use error::Result;

/// One marker block: two sides, an optional base, and the separator
#[derive(Debug, PartialEq, Eq)]
pub struct Conflict {
    ours: Side,
    theirs: Side,
    base: Option<Side>,
    separator: Separator,
    resolution: Option<Source>,
}

impl Conflict {
    pub(crate) fn new(ours: Side, separator: Separator, base: Option<Side>, theirs: Side) -> Self {
        debug_assert_ne!(ours.position(), theirs.position());
        debug_assert!(base.as_ref().is_none_or(|b| b.position() == Position::Middle));
        Self {
            ours,
            theirs,
            base,
            separator,
            resolution: None,
        }
    }

    pub fn ours(&self) -> &Side {
        &self.ours
    }

    pub fn theirs(&self) -> &Side {
        &self.theirs
    }

    pub fn base(&self) -> Option<&Side> {
        self.base.as_ref()
    }

    pub fn separator(&self) -> &Separator {
        &self.separator
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn resolution(&self) -> Option<Source> {
        self.resolution
    }

    /// Record `source` as the chosen side. Buffer text is left untouched;
    /// see [`resolve_as`](crate::conflict::resolve_as) for the full edit.
    pub fn resolve_as(&mut self, source: Source) -> Result<()> {
        self.check_resolvable(source)?;
        self.resolution = Some(source);
        Ok(())
    }

    pub(crate) fn check_resolvable(&self, source: Source) -> Result<()> {
        if let Some(previous) = self.resolution {
            return Err(ConflictError::AlreadyResolved(previous));
        }
        if self.side(source).is_none() {
            return Err(ConflictError::MissingSide(source));
        }
        Ok(())
    }

    pub fn chosen_side(&self) -> Option<&Side> {
        self.resolution.and_then(|source| self.side(source))
    }

    /// Every side other than the chosen one (all sides while unresolved)
    pub fn unchosen_sides(&self) -> Vec<&Side> {
        self.sides()
            .filter(|side| Some(side.source()) != self.resolution)
            .collect()
    }

    pub fn side(&self, source: Source) -> Option<&Side> {
        match source {
            Source::Ours => Some(&self.ours),
            Source::Theirs => Some(&self.theirs),
            Source::Base => self.base.as_ref(),
        }
    }

    pub fn side_at(&self, position: Position) -> Option<&Side> {
        self.sides().find(|side| side.position() == position)
    }

    /// Sides in buffer order, top to bottom
    pub fn sides(&self) -> impl Iterator<Item = &Side> {
        let (top, bottom) = if self.ours.position() == Position::Top {
            (&self.ours, &self.theirs)
        } else {
            (&self.theirs, &self.ours)
        };
        std::iter::once(top)
            .chain(self.base.as_ref())
            .chain(std::iter::once(bottom))
    }

    fn top(&self) -> &Side {
        if self.ours.position() == Position::Top {
            &self.ours
        } else {
            &self.theirs
        }
    }

    fn bottom(&self) -> &Side {
        if self.ours.position() == Position::Bottom {
            &self.ours
        } else {
            &self.theirs
        }
    }

    /// The whole block, from the top banner through the bottom banner
    pub fn range(&self, buffer: &TextBuffer) -> Result<Range> {
        Ok(self.top().range(buffer)?.union(&self.bottom().range(buffer)?))
    }

    pub fn includes_point(&self, buffer: &TextBuffer, point: Point) -> Result<bool> {
        Ok(self.range(buffer)?.contains_point(point))
    }

    /// The side whose banner or body holds `point`
    pub fn side_containing(&self, buffer: &TextBuffer, point: Point) -> Result<Option<&Side>> {
        for side in self.sides() {
            if side.includes_point(buffer, point)? {
                return Ok(Some(side));
            }
        }
        Ok(None)
    }

    /// Marker that begins where the body of the side at `position` ends
    pub fn marker_after(&self, position: Position) -> Option<MarkerId> {
        match position {
            Position::Top => Some(match &self.base {
                Some(base) => base.banner().marker(),
                None => self.separator.marker(),
            }),
            Position::Middle => Some(self.separator.marker()),
            Position::Bottom => Some(self.bottom().banner().marker()),
        }
    }

    /// Stop tracking every marker this conflict holds
    pub fn release(self, buffer: &mut TextBuffer) {
        for side in self.sides() {
            side.release(buffer);
        }
        buffer.destroy_marker(self.separator.marker());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_WAY: &str = "\
<<<<<<< HEAD
A
=======
B
>>>>>>> feature
";

    const DIFF3: &str = "\
<<<<<<< HEAD
A
||||||| base
O
=======
B
>>>>>>> feature
";

    fn first_conflict(buffer: &mut TextBuffer, is_rebase: bool) -> Conflict {
        scan_for_conflicts(buffer, is_rebase).unwrap().remove(0)
    }

    #[test]
    fn sides_are_listed_top_to_bottom() {
        let mut buffer = TextBuffer::new(DIFF3);
        let conflict = first_conflict(&mut buffer, true);
        let order: Vec<Source> = conflict.sides().map(Side::source).collect();
        assert_eq!(order, vec![Source::Theirs, Source::Base, Source::Ours]);
        assert_eq!(conflict.side_at(Position::Top).unwrap().source(), Source::Theirs);
    }

    #[test]
    fn range_spans_both_banners() {
        let mut buffer = TextBuffer::new(TWO_WAY);
        let conflict = first_conflict(&mut buffer, false);
        assert_eq!(conflict.range(&buffer).unwrap(), Range::rows(0, 5));
        assert!(conflict.includes_point(&buffer, Point::new(4, 2)).unwrap());
        assert!(!conflict.includes_point(&buffer, Point::new(5, 0)).unwrap());
    }

    #[test]
    fn side_containing_finds_banners_and_bodies() {
        let mut buffer = TextBuffer::new(DIFF3);
        let conflict = first_conflict(&mut buffer, false);
        let at = |row| {
            conflict
                .side_containing(&buffer, Point::new(row, 0))
                .unwrap()
                .map(Side::source)
        };
        assert_eq!(at(0), Some(Source::Ours));
        assert_eq!(at(3), Some(Source::Base));
        assert_eq!(at(4), None);
        assert_eq!(at(6), Some(Source::Theirs));
    }

    #[test]
    fn marker_after_follows_layout() {
        let mut buffer = TextBuffer::new(DIFF3);
        let conflict = first_conflict(&mut buffer, false);
        let base = conflict.base().unwrap();
        assert_eq!(conflict.marker_after(Position::Top), Some(base.banner().marker()));
        assert_eq!(
            conflict.marker_after(Position::Middle),
            Some(conflict.separator().marker())
        );
        assert_eq!(
            conflict.marker_after(Position::Bottom),
            Some(conflict.theirs().banner().marker())
        );

        let mut buffer = TextBuffer::new(TWO_WAY);
        let conflict = first_conflict(&mut buffer, false);
        assert_eq!(
            conflict.marker_after(Position::Top),
            Some(conflict.separator().marker())
        );
    }

    #[test]
    fn resolving_twice_is_rejected() {
        let mut buffer = TextBuffer::new(TWO_WAY);
        let mut conflict = first_conflict(&mut buffer, false);
        assert_eq!(conflict.unchosen_sides().len(), 2);
        conflict.resolve_as(Source::Theirs).unwrap();
        assert_eq!(conflict.chosen_side().unwrap().source(), Source::Theirs);
        assert_eq!(
            conflict.resolve_as(Source::Ours),
            Err(ConflictError::AlreadyResolved(Source::Theirs))
        );
    }

    #[test]
    fn base_is_missing_from_two_way_conflicts() {
        let mut buffer = TextBuffer::new(TWO_WAY);
        let mut conflict = first_conflict(&mut buffer, false);
        assert!(conflict.side(Source::Base).is_none());
        assert_eq!(
            conflict.resolve_as(Source::Base),
            Err(ConflictError::MissingSide(Source::Base))
        );
        assert!(!conflict.is_resolved());
    }

    #[test]
    fn released_conflict_frees_its_markers() {
        let mut buffer = TextBuffer::new(TWO_WAY);
        let conflict = first_conflict(&mut buffer, false);
        let markers = [
            conflict.ours().marker(),
            conflict.theirs().banner().marker(),
            conflict.separator().marker(),
        ];
        conflict.release(&mut buffer);
        assert!(markers.iter().all(|m| !buffer.is_marker_valid(*m)));
    }
}
