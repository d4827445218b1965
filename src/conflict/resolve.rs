//! Buffer edits that settle a conflict
//!
//! Every resolution runs inside one [`TextBuffer::transact`] call, so it is
//! undone as a single step and leaves the buffer untouched if any piece fails.

use super::error::{ConflictError, Result};
use super::{Conflict, Source};
use crate::buffer::TextBuffer;
use tracing::debug;

/// Keep the `source` side of `conflict` and remove everything else.
///
/// The chosen banner and the separator survive only if the user edited them.
/// Unchosen sides are removed even when edited.
pub fn resolve_as(buffer: &mut TextBuffer, conflict: &mut Conflict, source: Source) -> Result<()> {
    conflict.check_resolvable(source)?;
    buffer.transact(|buffer| apply_resolution(buffer, conflict, source))
}

/// Keep the sides named by `sources`, concatenated in that order, in place of
/// the first one.
///
/// Sources missing from the conflict (a base on a 2-way conflict) are
/// skipped, except the first, which must exist.
pub fn resolve_as_sequence(
    buffer: &mut TextBuffer,
    conflict: &mut Conflict,
    sources: &[Source],
) -> Result<()> {
    let Some(&chosen) = sources.first() else {
        return Err(ConflictError::EmptyResolution);
    };
    conflict.check_resolvable(chosen)?;

    buffer.transact(|buffer| {
        let mut present = sources.iter().filter_map(|&source| conflict.side(source));
        if let Some(first) = present.next() {
            let mut rest = String::new();
            for side in present {
                rest.push_str(side.text(buffer)?);
            }

            if !rest.is_empty() {
                let appended = first.append_text(buffer, &rest)?;
                if let Some(marker) = conflict.marker_after(first.position()) {
                    buffer.set_marker_tail(marker, appended.end)?;
                }
            }
        }

        apply_resolution(buffer, conflict, chosen)
    })
}

fn apply_resolution(buffer: &mut TextBuffer, conflict: &mut Conflict, source: Source) -> Result<()> {
    let chosen = conflict
        .side(source)
        .ok_or(ConflictError::MissingSide(source))?;

    let banner_removed = chosen.delete_banner(buffer)?;
    let separator_removed = conflict.separator().delete(buffer)?;
    for side in conflict.sides().filter(|side| side.source() != source) {
        side.discard(buffer)?;
    }

    debug!(%source, banner_removed, separator_removed, "Resolved conflict");
    conflict.resolve_as(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Range;
    use crate::conflict::scan_for_conflicts;

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

    fn scan_one(text: &str) -> (TextBuffer, Conflict) {
        let mut buffer = TextBuffer::new(text);
        let conflict = scan_for_conflicts(&mut buffer, false).unwrap().remove(0);
        (buffer, conflict)
    }

    #[test]
    fn keeping_theirs_leaves_only_their_text() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        resolve_as(&mut buffer, &mut conflict, Source::Theirs).unwrap();

        assert_eq!(buffer.text(), "B\n");
        assert!(conflict.is_resolved());
        assert_eq!(conflict.chosen_side().unwrap().source(), Source::Theirs);
        let unchosen: Vec<Source> = conflict.unchosen_sides().iter().map(|s| s.source()).collect();
        assert_eq!(unchosen, vec![Source::Ours]);
    }

    #[test]
    fn sequence_appends_later_sides_to_the_first() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        resolve_as_sequence(&mut buffer, &mut conflict, &[Source::Ours, Source::Theirs]).unwrap();

        assert_eq!(buffer.text(), "A\nB\n");
        assert_eq!(conflict.resolution(), Some(Source::Ours));
        assert_eq!(conflict.ours().body_range(&buffer).unwrap(), Range::rows(0, 2));
    }

    #[test]
    fn sequence_can_start_from_the_bottom_side() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        resolve_as_sequence(&mut buffer, &mut conflict, &[Source::Theirs, Source::Ours]).unwrap();
        assert_eq!(buffer.text(), "B\nA\n");
    }

    #[test]
    fn sequence_through_a_base_side() {
        let (mut buffer, mut conflict) = scan_one(DIFF3);
        resolve_as_sequence(&mut buffer, &mut conflict, &[Source::Ours, Source::Base]).unwrap();
        assert_eq!(buffer.text(), "A\nO\n");

        let (mut buffer, mut conflict) = scan_one(DIFF3);
        resolve_as_sequence(&mut buffer, &mut conflict, &[Source::Base, Source::Theirs]).unwrap();
        assert_eq!(buffer.text(), "O\nB\n");
    }

    #[test]
    fn missing_sides_after_the_first_are_skipped() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        resolve_as_sequence(
            &mut buffer,
            &mut conflict,
            &[Source::Theirs, Source::Base, Source::Ours],
        )
        .unwrap();
        assert_eq!(buffer.text(), "B\nA\n");
    }

    #[test]
    fn edited_chosen_banner_is_preserved() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        buffer.set_text_in_range(Range::new((0, 12), (0, 12)), " (kept)");
        resolve_as(&mut buffer, &mut conflict, Source::Ours).unwrap();
        assert_eq!(buffer.text(), "<<<<<<< HEAD (kept)\nA\n");
    }

    #[test]
    fn edited_unchosen_side_is_discarded() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        buffer.set_text_in_range(Range::new((3, 0), (3, 1)), "changed");
        resolve_as(&mut buffer, &mut conflict, Source::Ours).unwrap();
        assert_eq!(buffer.text(), "A\n");
    }

    #[test]
    fn edited_separator_is_preserved() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        buffer.set_text_in_range(Range::new((2, 7), (2, 7)), " note");
        resolve_as(&mut buffer, &mut conflict, Source::Theirs).unwrap();
        assert_eq!(buffer.text(), "======= note\nB\n");
    }

    #[test]
    fn resolution_undoes_in_one_step() {
        let (mut buffer, mut conflict) = scan_one(DIFF3);
        resolve_as_sequence(&mut buffer, &mut conflict, &[Source::Theirs, Source::Ours]).unwrap();
        assert_eq!(buffer.text(), "B\nA\n");

        assert!(buffer.undo());
        assert_eq!(buffer.text(), DIFF3);
        assert!(!buffer.undo());
    }

    #[test]
    fn second_resolution_is_rejected_without_edits() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        resolve_as(&mut buffer, &mut conflict, Source::Theirs).unwrap();
        assert_eq!(
            resolve_as(&mut buffer, &mut conflict, Source::Ours),
            Err(ConflictError::AlreadyResolved(Source::Theirs))
        );
        assert_eq!(
            resolve_as_sequence(&mut buffer, &mut conflict, &[Source::Ours]),
            Err(ConflictError::AlreadyResolved(Source::Theirs))
        );
        assert_eq!(buffer.text(), "B\n");
    }

    #[test]
    fn missing_or_empty_choices_are_rejected() {
        let (mut buffer, mut conflict) = scan_one(TWO_WAY);
        assert_eq!(
            resolve_as(&mut buffer, &mut conflict, Source::Base),
            Err(ConflictError::MissingSide(Source::Base))
        );
        assert_eq!(
            resolve_as_sequence(&mut buffer, &mut conflict, &[]),
            Err(ConflictError::EmptyResolution)
        );
        assert_eq!(buffer.text(), TWO_WAY);
        assert!(!conflict.is_resolved());
    }
}
