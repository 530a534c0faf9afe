//! Automatic highlighting of numbers, strings, keywords and URLs.

use crate::style::{Color, Modifiers, Style};
use crate::text::Text;

/// Adds style spans to text based on its content.
pub trait Highlighter {
    /// Stylize `text` in place.
    fn highlight(&self, text: &mut Text);
}

/// Highlights the things that commonly show up in debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReprHighlighter {
    /// Integers, decimals and hex literals
    pub number: Style,
    /// Single- or double-quoted strings
    pub string: Style,
    /// `true` / `True`
    pub bool_true: Style,
    /// `false` / `False`
    pub bool_false: Style,
    /// `None` / `null`
    pub none: Style,
    /// `http://` and `https://` links
    pub url: Style,
}

impl Default for ReprHighlighter {
    fn default() -> Self {
        Self {
            number: Style::new()
                .with_fg(Color::Indexed(6))
                .with_modifiers(Modifiers::BOLD),
            string: Style::new().with_fg(Color::Indexed(2)),
            bool_true: Style::new()
                .with_fg(Color::Indexed(10))
                .with_modifiers(Modifiers::ITALIC),
            bool_false: Style::new()
                .with_fg(Color::Indexed(9))
                .with_modifiers(Modifiers::ITALIC),
            none: Style::new()
                .with_fg(Color::Indexed(5))
                .with_modifiers(Modifiers::ITALIC),
            url: Style::new()
                .with_fg(Color::Indexed(12))
                .with_modifiers(Modifiers::UNDERLINE),
        }
    }
}

impl Highlighter for ReprHighlighter {
    fn highlight(&self, text: &mut Text) {
        let matches = self.scan(text.plain());
        for (start, end, style) in matches {
            text.stylize(start..end, style);
        }
    }
}

impl ReprHighlighter {
    fn scan(&self, plain: &str) -> Vec<(usize, usize, Style)> {
        let bytes = plain.as_bytes();
        let mut found = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            let after_word = i > 0 && is_word(bytes[i - 1]);
            let b = bytes[i];
            let tail = &plain[i..];

            if !after_word && (tail.starts_with("http://") || tail.starts_with("https://")) {
                let end = i + tail
                    .bytes()
                    .position(|c| c.is_ascii_whitespace() || b"\"'<>".contains(&c))
                    .unwrap_or(tail.len());
                found.push((i, end, self.url));
                i = end;
                continue;
            }

            if b == b'"' || (b == b'\'' && !after_word) {
                if let Some(close) = bytes[i + 1..].iter().position(|&c| c == b) {
                    let end = i + close + 2;
                    found.push((i, end, self.string));
                    i = end;
                    continue;
                }
            }

            let negative = b == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
            if !after_word && (is_word(b) || negative) {
                let start = i;
                let mut end = word_end(bytes, if negative { i + 1 } else { i });
                let word = &plain[start..end];

                let style = if is_number(word.trim_start_matches('-')) {
                    // Decimal part: digits '.' digits
                    if bytes.get(end) == Some(&b'.') {
                        let frac_end = word_end(bytes, end + 1);
                        if frac_end > end + 1 && plain[end + 1..frac_end].bytes().all(|c| c.is_ascii_digit()) {
                            end = frac_end;
                        }
                    }
                    Some(self.number)
                } else {
                    match word {
                        "true" | "True" => Some(self.bool_true),
                        "false" | "False" => Some(self.bool_false),
                        "None" | "null" => Some(self.none),
                        _ => None,
                    }
                };

                if let Some(style) = style {
                    found.push((start, end, style));
                }
                i = end.max(start + 1);
                continue;
            }

            i += 1;
        }
        found
    }
}

/// Bytes that continue an identifier. Non-ASCII bytes count, so that a
/// highlight never starts or ends inside a multi-byte character.
const fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || !b.is_ascii()
}

fn word_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| !is_word(b))
        .map_or(bytes.len(), |offset| from + offset)
}

fn is_number(word: &str) -> bool {
    if let Some(hex) = word.strip_prefix("0x") {
        return !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}
