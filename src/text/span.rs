//! Span: a styled byte range within a [`Text`](super::Text).

use crate::style::Style;
use std::ops::Range;

/// A style applied to the byte range `start..end` of a text.
///
/// Offsets always fall on UTF-8 character boundaries of the owning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Style applied to the range
    pub style: Style,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub const fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    /// Check if the span covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Move the span right by `offset` bytes.
    #[inline]
    #[must_use]
    pub const fn shifted(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset, self.style)
    }

    /// Intersect with `range` and rebase onto `range.start`.
    pub(crate) fn clipped(self, range: &Range<usize>) -> Option<Self> {
        let start = self.start.max(range.start);
        let end = self.end.min(range.end);
        (start < end).then(|| Self::new(start - range.start, end - range.start, self.style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_clipped_inside() {
        let span = Span::new(2, 8, Style::NULL);
        assert_eq!(span.clipped(&(4..6)), Some(Span::new(0, 2, Style::NULL)));
    }

    #[test]
    fn test_span_clipped_disjoint() {
        let span = Span::new(2, 4, Style::NULL);
        assert_eq!(span.clipped(&(4..6)), None);
    }

    #[test]
    fn test_span_shifted() {
        assert_eq!(Span::new(1, 3, Style::NULL).shifted(5), Span::new(6, 8, Style::NULL));
    }
}
