//! Row/column coordinates within a [`TextBuffer`](super::TextBuffer)

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a buffer. Columns count bytes within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The first column of `row`
    pub const fn row_start(row: usize) -> Self {
        Self { row, column: 0 }
    }
}

impl From<(usize, usize)> for Point {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A half-open span of buffer text: `start` is inside, `end` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    /// Build a range, swapping the endpoints if they arrive reversed
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        let (start, end) = (start.into(), end.into());
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Range covering whole rows `start_row..end_row`
    pub fn rows(start_row: usize, end_row: usize) -> Self {
        Self::new(Point::row_start(start_row), Point::row_start(end_row))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.start <= point && point < self.end
    }

    /// Smallest range that covers both `self` and `other`
    pub fn union(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_order_by_row_then_column() {
        assert!(Point::new(1, 9) < Point::new(2, 0));
        assert!(Point::new(2, 0) < Point::new(2, 1));
    }

    #[test]
    fn range_end_is_exclusive() {
        let range = Range::rows(0, 6);
        assert!(range.contains_point(Point::new(0, 0)));
        assert!(range.contains_point(Point::new(5, 40)));
        assert!(!range.contains_point(Point::new(6, 0)));
    }

    #[test]
    fn union_spans_both_ranges() {
        let top = Range::rows(2, 4);
        let bottom = Range::rows(7, 9);
        assert_eq!(top.union(&bottom), Range::rows(2, 9));
        assert_eq!(bottom.union(&top), Range::rows(2, 9));
    }

    #[test]
    fn reversed_endpoints_are_normalized() {
        let range = Range::new((4, 0), (1, 2));
        assert_eq!(range.start, Point::new(1, 2));
        assert_eq!(range.end, Point::new(4, 0));
    }
}
