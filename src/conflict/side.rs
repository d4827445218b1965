//! Range-backed pieces of a conflict: banners, the separator, and sides
//!
//! Each piece holds [`MarkerId`] handles into the host [`TextBuffer`] plus the
//! text it covered when the conflict was parsed. Comparing the two tells
//! whether the user has edited the piece since.

use super::error::Result;
use super::{Position, Source};
use crate::buffer::{MarkerId, Point, Range, TextBuffer};

/// The marker-plus-description line that opens or closes a side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    marker: MarkerId,
    description: String,
    original_text: String,
}

impl Banner {
    pub(crate) fn new(marker: MarkerId, description: String, original_text: String) -> Self {
        Self {
            marker,
            description,
            original_text,
        }
    }

    pub fn marker(&self) -> MarkerId {
        self.marker
    }

    /// Text after the 7-character run, e.g. `HEAD` or a branch name
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn range(&self, buffer: &TextBuffer) -> Result<Range> {
        Ok(buffer.marker_range(self.marker)?)
    }

    pub fn text<'b>(&self, buffer: &'b TextBuffer) -> Result<&'b str> {
        Ok(buffer.text_in_marker(self.marker)?)
    }

    pub fn is_modified(&self, buffer: &TextBuffer) -> Result<bool> {
        Ok(self.text(buffer)? != self.original_text)
    }

    /// Remove the banner line unless the user has edited it.
    ///
    /// Returns whether the text was removed.
    pub fn delete(&self, buffer: &mut TextBuffer) -> Result<bool> {
        if self.is_modified(buffer)? {
            return Ok(false);
        }
        self.discard(buffer)?;
        Ok(true)
    }

    /// Remove the banner line regardless of edits
    pub fn discard(&self, buffer: &mut TextBuffer) -> Result<()> {
        let range = self.range(buffer)?;
        buffer.set_text_in_range(range, "");
        Ok(())
    }
}

/// The `=======` line between the top side (or base) and the bottom side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator {
    marker: MarkerId,
    original_text: String,
}

impl Separator {
    pub(crate) fn new(marker: MarkerId, original_text: String) -> Self {
        Self {
            marker,
            original_text,
        }
    }

    pub fn marker(&self) -> MarkerId {
        self.marker
    }

    pub fn range(&self, buffer: &TextBuffer) -> Result<Range> {
        Ok(buffer.marker_range(self.marker)?)
    }

    pub fn is_modified(&self, buffer: &TextBuffer) -> Result<bool> {
        Ok(buffer.text_in_marker(self.marker)? != self.original_text)
    }

    /// Remove the separator unless the user has edited it
    pub fn delete(&self, buffer: &mut TextBuffer) -> Result<bool> {
        if self.is_modified(buffer)? {
            return Ok(false);
        }
        let range = self.range(buffer)?;
        buffer.set_text_in_range(range, "");
        Ok(true)
    }
}

/// One participant's version of the conflicting text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Side {
    source: Source,
    position: Position,
    marker: MarkerId,
    banner: Banner,
    original_text: String,
}

impl Side {
    pub(crate) fn new(
        source: Source,
        position: Position,
        marker: MarkerId,
        banner: Banner,
        original_text: String,
    ) -> Self {
        Self {
            source,
            position,
            marker,
            banner,
            original_text,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Marker over the body text, excluding the banner
    pub fn marker(&self) -> MarkerId {
        self.marker
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn description(&self) -> &str {
        self.banner.description()
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn text<'b>(&self, buffer: &'b TextBuffer) -> Result<&'b str> {
        Ok(buffer.text_in_marker(self.marker)?)
    }

    pub fn is_modified(&self, buffer: &TextBuffer) -> Result<bool> {
        Ok(self.text(buffer)? != self.original_text)
    }

    pub fn is_banner_modified(&self, buffer: &TextBuffer) -> Result<bool> {
        self.banner.is_modified(buffer)
    }

    pub fn body_range(&self, buffer: &TextBuffer) -> Result<Range> {
        Ok(buffer.marker_range(self.marker)?)
    }

    /// Body and banner together
    pub fn range(&self, buffer: &TextBuffer) -> Result<Range> {
        Ok(self.body_range(buffer)?.union(&self.banner.range(buffer)?))
    }

    pub fn includes_point(&self, buffer: &TextBuffer, point: Point) -> Result<bool> {
        Ok(self.range(buffer)?.contains_point(point))
    }

    /// Insert `text` after the body, returning the range it now occupies.
    ///
    /// The body marker is extended over the new text. Whatever marker begins
    /// where the body ended also starts at the insertion point, so callers
    /// re-anchor it with [`Conflict::marker_after`](super::Conflict::marker_after).
    pub fn append_text(&self, buffer: &mut TextBuffer, text: &str) -> Result<Range> {
        let body = self.body_range(buffer)?;
        let inserted = buffer.set_text_in_range(Range::new(body.end, body.end), text);
        buffer.set_marker_range(self.marker, Range::new(body.start, inserted.end))?;
        Ok(inserted)
    }

    /// Remove the body text
    pub fn delete(&self, buffer: &mut TextBuffer) -> Result<()> {
        let range = self.body_range(buffer)?;
        buffer.set_text_in_range(range, "");
        Ok(())
    }

    /// Remove the banner unless the user has edited it
    pub fn delete_banner(&self, buffer: &mut TextBuffer) -> Result<bool> {
        self.banner.delete(buffer)
    }

    /// Remove body and banner, edited or not
    pub fn discard(&self, buffer: &mut TextBuffer) -> Result<()> {
        self.delete(buffer)?;
        self.banner.discard(buffer)
    }

    /// Stop tracking this side's markers
    pub(crate) fn release(&self, buffer: &mut TextBuffer) {
        buffer.destroy_marker(self.marker);
        buffer.destroy_marker(self.banner.marker);
    }
}
