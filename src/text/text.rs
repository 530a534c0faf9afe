//! Text: a plain string plus the style spans laid over it.

use super::span::Span;
use crate::style::Style;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Styled text.
///
/// Spans may overlap; where they do, later spans are layered over earlier
/// ones with [`Style::combine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    plain: String,
    spans: Vec<Span>,
}

impl Text {
    /// Create empty text.
    pub const fn new() -> Self {
        Self {
            plain: String::new(),
            spans: Vec::new(),
        }
    }

    /// Create text with a single style covering all of it.
    pub fn styled(plain: impl Into<String>, style: Style) -> Self {
        let mut text = Self::from(plain.into());
        text.stylize(0..text.len(), style);
        text
    }

    /// The unstyled characters.
    #[inline]
    pub fn plain(&self) -> &str {
        &self.plain
    }

    /// Style spans, in layering order.
    #[inline]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.plain.len()
    }

    /// Check if there is no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plain.is_empty()
    }

    /// Width in terminal cells.
    pub fn cell_len(&self) -> usize {
        self.plain.width()
    }

    /// Append unstyled text.
    pub fn push_str(&mut self, s: &str) {
        self.plain.push_str(s);
    }

    /// Append text with a style.
    pub fn push_styled(&mut self, s: &str, style: Style) {
        let start = self.plain.len();
        self.plain.push_str(s);
        self.stylize(start..self.plain.len(), style);
    }

    /// Append another text, keeping its spans.
    pub fn append_text(&mut self, other: &Self) {
        let offset = self.plain.len();
        self.plain.push_str(&other.plain);
        self.spans
            .extend(other.spans.iter().map(|span| span.shifted(offset)));
    }

    /// Apply a style to a byte range. Out-of-range ends are clamped and empty
    /// ranges or null styles are ignored.
    pub fn stylize(&mut self, range: Range<usize>, style: Style) {
        let end = range.end.min(self.plain.len());
        if range.start < end && style != Style::NULL {
            self.spans.push(Span::new(range.start, end, style));
        }
    }

    /// Concatenate `items`, placing this text between each pair.
    #[must_use]
    pub fn join<I>(&self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<Self>,
    {
        let mut joined = Self::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                joined.append_text(self);
            }
            joined.append_text(item.borrow());
        }
        joined
    }

    /// Copy out a byte range, keeping the spans that intersect it.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            plain: self.plain[range.clone()].to_string(),
            spans: self
                .spans
                .iter()
                .filter_map(|span| span.clipped(&range))
                .collect(),
        }
    }

    /// Split on `'\n'`. A trailing newline yields a trailing empty line.
    pub fn split_lines(&self) -> Vec<Self> {
        let mut lines = Vec::new();
        let mut start = 0;
        for (i, _) in self.plain.match_indices('\n') {
            lines.push(self.slice(start..i));
            start = i + 1;
        }
        lines.push(self.slice(start..self.plain.len()));
        lines
    }

    /// Replace tabs with spaces up to the next multiple of `tab_size` columns.
    #[must_use]
    pub fn expand_tabs(&self, tab_size: usize) -> Self {
        if !self.plain.contains('\t') {
            return self.clone();
        }

        // Byte offset in the old text -> byte offset in the new text.
        let mut offsets = vec![0; self.plain.len() + 1];
        let mut plain = String::with_capacity(self.plain.len());
        let mut column = 0;

        for (i, c) in self.plain.char_indices() {
            offsets[i..i + c.len_utf8()].fill(plain.len());
            match c {
                '\t' => {
                    if tab_size > 0 {
                        let pad = tab_size - column % tab_size;
                        plain.extend(std::iter::repeat(' ').take(pad));
                        column += pad;
                    }
                }
                '\n' => {
                    plain.push(c);
                    column = 0;
                }
                c => {
                    plain.push(c);
                    column += c.width().unwrap_or(0);
                }
            }
        }
        offsets[self.plain.len()] = plain.len();

        let spans = self
            .spans
            .iter()
            .map(|span| Span::new(offsets[span.start], offsets[span.end], span.style))
            .filter(|span| !span.is_empty())
            .collect();
        Self { plain, spans }
    }

    /// Break a single line into pieces no wider than `width` cells.
    ///
    /// Breaks fall on grapheme boundaries. A grapheme wider than `width` gets
    /// a piece of its own. A zero width disables folding.
    pub fn fold(&self, width: usize) -> Vec<Self> {
        if width == 0 || self.cell_len() <= width {
            return vec![self.clone()];
        }

        let mut pieces = Vec::new();
        let mut start = 0;
        let mut column = 0;
        for (i, grapheme) in self.plain.grapheme_indices(true) {
            let w = grapheme.width();
            if column + w > width && column > 0 {
                pieces.push(self.slice(start..i));
                start = i;
                column = 0;
            }
            column += w;
        }
        pieces.push(self.slice(start..self.plain.len()));
        pieces
    }

    /// Resolve overlapping spans into consecutive `(text, style)` runs.
    pub fn segments(&self) -> Vec<(&str, Style)> {
        if self.spans.is_empty() {
            return if self.plain.is_empty() {
                Vec::new()
            } else {
                vec![(self.plain.as_str(), Style::NULL)]
            };
        }

        let mut cuts: Vec<usize> = self
            .spans
            .iter()
            .flat_map(|span| [span.start, span.end])
            .chain([0, self.plain.len()])
            .filter(|&offset| offset <= self.plain.len())
            .collect();
        cuts.sort_unstable();
        cuts.dedup();

        let mut runs: Vec<(Range<usize>, Style)> = Vec::new();
        for window in cuts.windows(2) {
            let (start, end) = (window[0], window[1]);
            let style = self
                .spans
                .iter()
                .filter(|span| span.start <= start && span.end >= end)
                .fold(Style::NULL, |acc, span| acc.combine(span.style));

            match runs.last_mut() {
                Some((range, last)) if *last == style => range.end = end,
                _ => runs.push((start..end, style)),
            }
        }
        runs.into_iter()
            .map(|(range, style)| (&self.plain[range], style))
            .collect()
    }
}

impl From<&str> for Text {
    fn from(plain: &str) -> Self {
        Self::from(plain.to_string())
    }
}

impl From<String> for Text {
    fn from(plain: String) -> Self {
        Self {
            plain,
            spans: Vec::new(),
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, Modifiers};

    fn red() -> Style {
        Style::new().with_fg(Color::Indexed(1))
    }

    fn bold() -> Style {
        Style::new().with_modifiers(Modifiers::BOLD)
    }

    #[test]
    fn test_join_offsets_spans() {
        let a = Text::styled("ab", red());
        let b = Text::styled("cd", bold());
        let joined = Text::from("\n").join([&a, &b]);

        assert_eq!(joined.plain(), "ab\ncd");
        assert_eq!(joined.spans(), &[Span::new(0, 2, red()), Span::new(3, 5, bold())]);
    }

    #[test]
    fn test_join_empty_and_single() {
        let sep = Text::from(", ");
        assert_eq!(sep.join(Vec::<Text>::new()).plain(), "");
        assert_eq!(sep.join([Text::from("x")]).plain(), "x");
    }

    #[test]
    fn test_stylize_clamps_and_ignores_empty() {
        let mut text = Text::from("hello");
        text.stylize(3..99, red());
        text.stylize(2..2, bold());
        text.stylize(0..1, Style::NULL);
        assert_eq!(text.spans(), &[Span::new(3, 5, red())]);
    }

    #[test]
    fn test_split_lines() {
        let mut text = Text::from("ab\ncd\n");
        text.stylize(1..4, red());
        let lines = text.split_lines();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].plain(), "ab");
        assert_eq!(lines[0].spans(), &[Span::new(1, 2, red())]);
        assert_eq!(lines[1].plain(), "cd");
        assert_eq!(lines[1].spans(), &[Span::new(0, 1, red())]);
        assert!(lines[2].is_empty());
    }

    #[test]
    fn test_expand_tabs() {
        let mut text = Text::from("a\tb");
        text.stylize(2..3, red());
        let expanded = text.expand_tabs(4);

        assert_eq!(expanded.plain(), "a   b");
        assert_eq!(expanded.spans(), &[Span::new(4, 5, red())]);
    }

    #[test]
    fn test_expand_tabs_resets_per_line() {
        let text = Text::from("abcde\tx\n\ty");
        assert_eq!(text.expand_tabs(4).plain(), "abcde   x\n    y");
    }

    #[test]
    fn test_fold_ascii() {
        let pieces = Text::from("abcdefg").fold(3);
        let plains: Vec<&str> = pieces.iter().map(Text::plain).collect();
        assert_eq!(plains, ["abc", "def", "g"]);
    }

    #[test]
    fn test_fold_wide_chars() {
        let pieces = Text::from("日本語").fold(3);
        let plains: Vec<&str> = pieces.iter().map(Text::plain).collect();
        assert_eq!(plains, ["日", "本", "語"]);
    }

    #[test]
    fn test_fold_keeps_spans() {
        let text = Text::styled("abcd", red());
        let pieces = text.fold(2);
        assert_eq!(pieces[1].spans(), &[Span::new(0, 2, red())]);
    }

    #[test]
    fn test_segments_overlap() {
        let mut text = Text::from("abcdef");
        text.stylize(0..4, red());
        text.stylize(2..6, bold());
        let segments = text.segments();

        assert_eq!(
            segments,
            vec![
                ("ab", red()),
                ("cd", red().combine(bold())),
                ("ef", bold()),
            ]
        );
    }

    #[test]
    fn test_segments_merges_equal_runs() {
        let mut text = Text::from("abcd");
        text.stylize(0..2, red());
        text.stylize(2..4, red());
        assert_eq!(text.segments(), vec![("abcd", red())]);
    }

    #[test]
    fn test_segments_plain() {
        assert_eq!(Text::from("hi").segments(), vec![("hi", Style::NULL)]);
        assert!(Text::new().segments().is_empty());
    }

    #[test]
    fn test_cell_len() {
        assert_eq!(Text::from("日本").cell_len(), 4);
        assert_eq!(Text::from("abc").cell_len(), 3);
    }
}
