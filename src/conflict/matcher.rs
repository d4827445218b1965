//! Map cursor positions onto the conflicts and sides beneath them

use super::error::Result;
use super::side::Side;
use super::Conflict;
use crate::buffer::{Point, TextBuffer};

/// A conflict holding at least one cursor, with the sides those cursors sit in
#[derive(Debug)]
pub struct ConflictMatch<'a> {
    pub conflict: &'a Conflict,
    pub sides: Vec<&'a Side>,
}

/// Walk `cursors` and `conflicts` together in a single forward pass.
///
/// Both slices must be sorted in buffer order. A conflict is reported once,
/// and only if some cursor lands in one of its sides; a cursor resting on
/// the separator alone does not select anything.
pub fn match_cursors_to_conflicts<'a>(
    buffer: &TextBuffer,
    cursors: &[Point],
    conflicts: &'a [Conflict],
) -> Result<Vec<ConflictMatch<'a>>> {
    let mut matches = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < cursors.len() && j < conflicts.len() {
        let conflict = &conflicts[j];
        let range = conflict.range(buffer)?;

        if cursors[i] < range.start {
            i += 1;
            continue;
        }
        if !range.contains_point(cursors[i]) {
            j += 1;
            continue;
        }

        let mut sides: Vec<&Side> = Vec::new();
        while i < cursors.len() && range.contains_point(cursors[i]) {
            if let Some(side) = conflict.side_containing(buffer, cursors[i])?
                && !sides.iter().any(|seen| seen.source() == side.source())
            {
                sides.push(side);
            }
            i += 1;
        }

        if !sides.is_empty() {
            matches.push(ConflictMatch { conflict, sides });
        }
        j += 1;
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{Source, scan_for_conflicts};

    /// Conflicts over rows 0..=5 and 10..=25
    fn two_conflicts() -> TextBuffer {
        let mut text = String::from("<<<<<<< HEAD\nours 1\nours 2\n=======\ntheirs 1\n>>>>>>> a\n");
        for row in 6..10 {
            text.push_str(&format!("plain {row}\n"));
        }
        text.push_str("<<<<<<< HEAD\n");
        for row in 11..18 {
            text.push_str(&format!("ours {row}\n"));
        }
        text.push_str("=======\n");
        for row in 19..25 {
            text.push_str(&format!("theirs {row}\n"));
        }
        text.push_str(">>>>>>> b\n");
        TextBuffer::new(text)
    }

    #[test]
    fn cursors_select_their_enclosing_conflicts() {
        let mut buffer = two_conflicts();
        let conflicts = scan_for_conflicts(&mut buffer, false).unwrap();
        assert_eq!(conflicts.len(), 2);

        let cursors = [Point::new(1, 0), Point::new(6, 0), Point::new(20, 0)];
        let matches = match_cursors_to_conflicts(&buffer, &cursors, &conflicts).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(std::ptr::eq(matches[0].conflict, &conflicts[0]));
        assert_eq!(matches[0].sides[0].source(), Source::Ours);
        assert!(std::ptr::eq(matches[1].conflict, &conflicts[1]));
        assert_eq!(matches[1].sides[0].source(), Source::Theirs);
    }

    #[test]
    fn several_cursors_in_one_conflict_yield_one_match() {
        let mut buffer = two_conflicts();
        let conflicts = scan_for_conflicts(&mut buffer, false).unwrap();

        let cursors = [
            Point::new(11, 0),
            Point::new(12, 3),
            Point::new(19, 0),
            Point::new(25, 2),
        ];
        let matches = match_cursors_to_conflicts(&buffer, &cursors, &conflicts).unwrap();
        assert_eq!(matches.len(), 1);
        let sources: Vec<Source> = matches[0].sides.iter().map(|s| s.source()).collect();
        assert_eq!(sources, vec![Source::Ours, Source::Theirs]);
    }

    #[test]
    fn cursor_on_separator_matches_nothing() {
        let mut buffer = two_conflicts();
        let conflicts = scan_for_conflicts(&mut buffer, false).unwrap();

        let matches = match_cursors_to_conflicts(&buffer, &[Point::new(3, 4)], &conflicts).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn no_cursors_no_matches() {
        let mut buffer = two_conflicts();
        let conflicts = scan_for_conflicts(&mut buffer, false).unwrap();
        assert!(
            match_cursors_to_conflicts(&buffer, &[], &conflicts)
                .unwrap()
                .is_empty()
        );
    }
}
