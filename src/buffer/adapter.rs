//! Row-by-row read access used by the conflict parser

use super::TextBuffer;

/// Forward-only, row-addressable view over line-oriented text.
///
/// Once `is_at_end` is true, `current_line` yields an empty string.
pub trait LineAdapter {
    fn current_row(&self) -> usize;

    /// Text of the current row without its line ending
    fn current_line(&self) -> &str;

    fn advance_row(&mut self);

    fn is_at_end(&self) -> bool;
}

/// Adapter over the rows of a [`TextBuffer`]
#[derive(Debug, Clone)]
pub struct BufferAdapter<'a> {
    buffer: &'a TextBuffer,
    row: usize,
}

impl<'a> BufferAdapter<'a> {
    pub fn new(buffer: &'a TextBuffer, start_row: usize) -> Self {
        Self {
            buffer,
            row: start_row,
        }
    }
}

impl LineAdapter for BufferAdapter<'_> {
    fn current_row(&self) -> usize {
        self.row
    }

    fn current_line(&self) -> &str {
        if self.is_at_end() {
            ""
        } else {
            self.buffer.line_for_row(self.row)
        }
    }

    fn advance_row(&mut self) {
        self.row += 1;
    }

    fn is_at_end(&self) -> bool {
        self.row > self.buffer.last_row()
    }
}

/// Adapter over a plain string, for hosts that hold text outside a [`TextBuffer`]
#[derive(Debug, Clone)]
pub struct LinesAdapter<'a> {
    lines: Vec<&'a str>,
    row: usize,
}

impl<'a> LinesAdapter<'a> {
    pub fn new(text: &'a str, start_row: usize) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Self {
            lines,
            row: start_row,
        }
    }
}

impl LineAdapter for LinesAdapter<'_> {
    fn current_row(&self) -> usize {
        self.row
    }

    fn current_line(&self) -> &str {
        self.lines.get(self.row).copied().unwrap_or("")
    }

    fn advance_row(&mut self) {
        self.row += 1;
    }

    fn is_at_end(&self) -> bool {
        self.row >= self.lines.len()
    }
}
