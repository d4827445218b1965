//! Visitor that turns parsed row ranges into a [`Conflict`]

use super::error::{ConflictError, Result};
use super::parser::Visitor;
use super::side::{Banner, Separator, Side};
use super::{Conflict, Position, Source};
use crate::buffer::{Range, TextBuffer};
use regex::Regex;
use std::sync::LazyLock;

/// Description following a `<`, `|`, or `>` run on a banner line
static BANNER_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[<|>]{7} (.*)$").expect("banner description pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SideRows {
    position: Position,
    banner_row: usize,
    text_row_start: usize,
    text_row_end: usize,
}

/// Collects the regions of one top-level conflict.
///
/// Regions are only recorded as rows while parsing. Markers are placed by
/// [`finish`](Self::finish), once the parse has succeeded, so a discarded
/// candidate never leaves markers behind in the buffer.
#[derive(Debug, Clone)]
pub struct CollectingVisitor {
    start_row: usize,
    ours: Option<SideRows>,
    base: Option<SideRows>,
    separator: Option<(usize, usize)>,
    theirs: Option<SideRows>,
}

impl CollectingVisitor {
    pub fn new(start_row: usize) -> Self {
        Self {
            start_row,
            ours: None,
            base: None,
            separator: None,
            theirs: None,
        }
    }

    /// True once both mandatory sides and the separator were visited
    pub fn is_complete(&self) -> bool {
        self.ours.is_some() && self.theirs.is_some() && self.separator.is_some()
    }

    /// Mark every collected region in `buffer` and assemble the conflict
    pub fn finish(self, buffer: &mut TextBuffer) -> Result<Conflict> {
        let missing = |region| ConflictError::IncompleteConflict {
            row: self.start_row,
            region,
        };
        let ours = self.ours.ok_or_else(|| missing("ours side"))?;
        let theirs = self.theirs.ok_or_else(|| missing("theirs side"))?;
        let (sep_row_start, sep_row_end) = self.separator.ok_or_else(|| missing("separator"))?;

        // Read every description before placing any marker
        let ours_description = side_description(buffer, ours.banner_row)?;
        let theirs_description = side_description(buffer, theirs.banner_row)?;
        let base_description = self
            .base
            .map(|rows| side_description(buffer, rows.banner_row))
            .transpose()?;

        let ours = mark_side(buffer, Source::Ours, ours, ours_description);
        let base = self
            .base
            .zip(base_description)
            .map(|(rows, description)| mark_side(buffer, Source::Base, rows, description));
        let separator = mark_separator(buffer, sep_row_start, sep_row_end);
        let theirs = mark_side(buffer, Source::Theirs, theirs, theirs_description);

        Ok(Conflict::new(ours, separator, base, theirs))
    }
}

impl Visitor for CollectingVisitor {
    fn visit_our_side(
        &mut self,
        position: Position,
        banner_row: usize,
        text_row_start: usize,
        text_row_end: usize,
    ) {
        self.ours = Some(SideRows {
            position,
            banner_row,
            text_row_start,
            text_row_end,
        });
    }

    fn visit_base_side(&mut self, banner_row: usize, text_row_start: usize, text_row_end: usize) {
        self.base = Some(SideRows {
            position: Position::Middle,
            banner_row,
            text_row_start,
            text_row_end,
        });
    }

    fn visit_separator(&mut self, sep_row_start: usize, sep_row_end: usize) {
        self.separator = Some((sep_row_start, sep_row_end));
    }

    fn visit_their_side(
        &mut self,
        position: Position,
        banner_row: usize,
        text_row_start: usize,
        text_row_end: usize,
    ) {
        self.theirs = Some(SideRows {
            position,
            banner_row,
            text_row_start,
            text_row_end,
        });
    }
}

fn side_description(buffer: &TextBuffer, banner_row: usize) -> Result<String> {
    let line = buffer.line_for_row(banner_row);
    BANNER_DESCRIPTION
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ConflictError::MalformedBanner {
            row: banner_row,
            line: line.to_string(),
        })
}

fn mark_side(buffer: &mut TextBuffer, source: Source, rows: SideRows, description: String) -> Side {
    let banner_range = Range::rows(rows.banner_row, rows.banner_row + 1);
    let banner_marker = buffer.mark_range(banner_range);
    let banner_text = buffer.text_in_range(banner_range).to_string();
    let banner = Banner::new(banner_marker, description, banner_text);

    let text_range = Range::rows(rows.text_row_start, rows.text_row_end);
    let marker = buffer.mark_range(text_range);
    let original_text = buffer.text_in_range(text_range).to_string();

    Side::new(source, rows.position, marker, banner, original_text)
}

fn mark_separator(buffer: &mut TextBuffer, sep_row_start: usize, sep_row_end: usize) -> Separator {
    let range = Range::rows(sep_row_start, sep_row_end);
    let marker = buffer.mark_range(range);
    let original_text = buffer.text_in_range(range).to_string();
    Separator::new(marker, original_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::parse_conflict;

    fn collect(buffer: &mut TextBuffer, start_row: usize) -> Result<Conflict> {
        let mut visitor = CollectingVisitor::new(start_row);
        let mut adapter = buffer.adapter(start_row);
        parse_conflict(&mut adapter, false, &mut visitor)?;
        assert!(visitor.is_complete());
        visitor.finish(buffer)
    }

    #[test]
    fn captures_descriptions_and_original_text() {
        let mut buffer = TextBuffer::new("<<<<<<< HEAD\r\nA\r\n=======\r\nB\r\n>>>>>>> topic/x\r\n");
        let conflict = collect(&mut buffer, 0).unwrap();
        assert_eq!(conflict.ours().description(), "HEAD");
        assert_eq!(conflict.theirs().description(), "topic/x");
        assert_eq!(conflict.ours().original_text(), "A\r\n");
        assert_eq!(conflict.ours().banner().original_text(), "<<<<<<< HEAD\r\n");
        assert!(conflict.base().is_none());
    }

    #[test]
    fn footer_without_description_is_malformed() {
        let mut buffer = TextBuffer::new("<<<<<<< HEAD\nA\n=======\nB\n>>>>>>>\n");
        assert_eq!(
            collect(&mut buffer, 0).unwrap_err(),
            ConflictError::MalformedBanner {
                row: 4,
                line: ">>>>>>>".to_string(),
            }
        );
    }

    #[test]
    fn unfinished_visitor_reports_what_is_missing() {
        let mut buffer = TextBuffer::new("");
        let mut visitor = CollectingVisitor::new(3);
        visitor.visit_our_side(Position::Top, 3, 4, 5);
        assert!(!visitor.is_complete());
        assert_eq!(
            visitor.finish(&mut buffer).unwrap_err(),
            ConflictError::IncompleteConflict {
                row: 3,
                region: "theirs side",
            }
        );
    }
}
