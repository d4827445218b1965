//! In-memory text buffer that plays the host role for conflict parsing
//!
//! The conflict engine never owns text. It reads rows through a [`LineAdapter`],
//! remembers regions through [`MarkerId`] handles, and mutates text through
//! [`TextBuffer::set_text_in_range`] inside a [`TextBuffer::transact`] boundary.
//! This module provides one concrete host with exactly those primitives so the
//! engine can run against files on disk.

mod adapter;
mod point;

pub use adapter::{BufferAdapter, LineAdapter, LinesAdapter};
pub use point::{Point, Range};

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Handle to a range tracked by a [`TextBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "marker #{}", self.0)
    }
}

/// Errors raised by buffer primitives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The marker was destroyed (or never belonged to this buffer)
    #[error("{0} is no longer valid")]
    InvalidMarker(MarkerId),
}

/// Result type alias using BufferError
pub type Result<T> = std::result::Result<T, BufferError>;

/// Text and marker state captured before an undoable change
#[derive(Debug, Clone)]
struct Snapshot {
    text: String,
    markers: HashMap<MarkerId, Range>,
}

/// Line-oriented text with markers that follow edits
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    line_starts: Vec<usize>,
    markers: HashMap<MarkerId, Range>,
    next_marker: u64,
    undo_stack: Vec<Snapshot>,
    pending: Option<Snapshot>,
    transaction_depth: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = line_starts(&text);
        Self {
            text,
            line_starts,
            markers: HashMap::new(),
            next_marker: 0,
            undo_stack: Vec::new(),
            pending: None,
            transaction_depth: 0,
        }
    }

    /// Full buffer contents
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of rows. A trailing newline starts a final empty row.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn last_row(&self) -> usize {
        self.line_starts.len() - 1
    }

    /// Text of `row` without its line ending; empty for rows past the end
    pub fn line_for_row(&self, row: usize) -> &str {
        let Some(&start) = self.line_starts.get(row) else {
            return "";
        };
        let end = self
            .line_starts
            .get(row + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let line = &self.text[start..end];
        line.strip_suffix('\r').unwrap_or(line)
    }

    /// Clamp a point onto existing text and a character boundary
    pub fn clip_point(&self, point: Point) -> Point {
        let last_row = self.last_row();
        if point.row > last_row {
            return Point::new(last_row, self.line_for_row(last_row).len());
        }
        let line = self.line_for_row(point.row);
        let mut column = point.column.min(line.len());
        while !line.is_char_boundary(column) {
            column -= 1;
        }
        Point::new(point.row, column)
    }

    pub fn clip_range(&self, range: Range) -> Range {
        Range::new(self.clip_point(range.start), self.clip_point(range.end))
    }

    pub fn text_in_range(&self, range: Range) -> &str {
        let range = self.clip_range(range);
        &self.text[self.offset_for_point(range.start)..self.offset_for_point(range.end)]
    }

    /// Replace the text in `range`, returning the range now covered by `text`.
    ///
    /// Outside of [`transact`](Self::transact) every call is its own undo step.
    pub fn set_text_in_range(&mut self, range: Range, text: &str) -> Range {
        let range = self.clip_range(range);
        if self.transaction_depth == 0 {
            let snapshot = self.snapshot();
            self.undo_stack.push(snapshot);
        }

        let start = self.offset_for_point(range.start);
        let end = self.offset_for_point(range.end);
        self.text.replace_range(start..end, text);
        self.line_starts = line_starts(&self.text);

        let new_end = self.point_for_offset(start + text.len());
        for marker in self.markers.values_mut() {
            *marker = Range {
                start: adjust_start(marker.start, range, new_end),
                end: adjust_end(marker.end, range, new_end),
            };
        }

        Range {
            start: range.start,
            end: new_end,
        }
    }

    // ------------------------------------------------------------------------
    // Markers
    // ------------------------------------------------------------------------

    /// Start tracking `range`; the returned handle follows subsequent edits
    pub fn mark_range(&mut self, range: Range) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        let range = self.clip_range(range);
        self.markers.insert(id, range);
        id
    }

    pub fn marker_range(&self, id: MarkerId) -> Result<Range> {
        self.markers
            .get(&id)
            .copied()
            .ok_or(BufferError::InvalidMarker(id))
    }

    pub fn text_in_marker(&self, id: MarkerId) -> Result<&str> {
        Ok(self.text_in_range(self.marker_range(id)?))
    }

    /// Replace the tracked range of a marker outright
    pub fn set_marker_range(&mut self, id: MarkerId, range: Range) -> Result<()> {
        let range = self.clip_range(range);
        let marker = self
            .markers
            .get_mut(&id)
            .ok_or(BufferError::InvalidMarker(id))?;
        *marker = range;
        Ok(())
    }

    /// Move the start of a marker, pulling its end along if they would cross
    pub fn set_marker_tail(&mut self, id: MarkerId, point: Point) -> Result<()> {
        let point = self.clip_point(point);
        let marker = self
            .markers
            .get_mut(&id)
            .ok_or(BufferError::InvalidMarker(id))?;
        marker.start = point;
        if marker.end < point {
            marker.end = point;
        }
        Ok(())
    }

    /// Number of markers still being tracked
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Stop tracking a marker. Returns false if it was already gone.
    pub fn destroy_marker(&mut self, id: MarkerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    pub fn is_marker_valid(&self, id: MarkerId) -> bool {
        self.markers.contains_key(&id)
    }

    // ------------------------------------------------------------------------
    // Transactions and undo
    // ------------------------------------------------------------------------

    /// Group every edit made by `f` into a single undo step.
    ///
    /// If `f` fails, text and marker positions are restored to their state
    /// before the outermost transaction began.
    pub fn transact<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let outermost = self.transaction_depth == 0;
        if outermost {
            self.pending = Some(self.snapshot());
        }

        self.transaction_depth += 1;
        let result = f(self);
        self.transaction_depth -= 1;

        if outermost && let Some(snapshot) = self.pending.take() {
            if result.is_err() {
                self.restore(snapshot);
            } else if snapshot.text != self.text || snapshot.markers != self.markers {
                self.undo_stack.push(snapshot);
            }
        }

        result
    }

    /// Revert the most recent edit or transaction. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Searching
    // ------------------------------------------------------------------------

    /// Starting row of every match of `regex`, in ascending order
    pub fn scan_rows(&self, regex: &Regex) -> Vec<usize> {
        regex
            .find_iter(&self.text)
            .map(|m| self.point_for_offset(m.start()).row)
            .collect()
    }

    /// Line adapter positioned at `start_row`
    pub fn adapter(&self, start_row: usize) -> BufferAdapter<'_> {
        BufferAdapter::new(self, start_row)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn offset_for_point(&self, point: Point) -> usize {
        self.line_starts[point.row] + point.column
    }

    fn point_for_offset(&self, offset: usize) -> Point {
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Point::new(row, offset - self.line_starts[row])
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            markers: self.markers.clone(),
        }
    }

    /// Markers created after the snapshot survive, clipped to the restored text.
    /// Markers destroyed since stay destroyed.
    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.line_starts = line_starts(&self.text);

        let mut markers = std::mem::take(&mut self.markers);
        for (id, range) in markers.iter_mut() {
            *range = match snapshot.markers.get(id) {
                Some(saved) => *saved,
                None => self.clip_range(*range),
            };
        }
        self.markers = markers;
    }
}

fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

// A marker grows to take in text inserted at its start, never at its end.

/// Where a point that sat after `edit` lands once `edit` now ends at `new_end`
fn shift(point: Point, edit: Range, new_end: Point) -> Point {
    if point.row == edit.end.row {
        Point::new(new_end.row, new_end.column + point.column - edit.end.column)
    } else {
        Point::new(point.row + new_end.row - edit.end.row, point.column)
    }
}

fn adjust_start(point: Point, edit: Range, new_end: Point) -> Point {
    if point < edit.start {
        point
    } else if point > edit.end {
        shift(point, edit, new_end)
    } else {
        edit.start
    }
}

fn adjust_end(point: Point, edit: Range, new_end: Point) -> Point {
    if point <= edit.start {
        point
    } else if point > edit.end {
        shift(point, edit, new_end)
    } else {
        new_end
    }
}
