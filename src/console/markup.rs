//! Console markup: `[bold red]styled[/]` to [`Text`].
//!
//! `[style]` opens a style, `[/style]` closes the most recent tag with that
//! name and `[/]` closes the most recent tag of any name. `\[` produces a
//! literal bracket. Brackets whose contents are not a valid style are kept
//! as text, so `[1, 2, 3]` prints unchanged. Tags left open run to the end.

use super::emoji;
use crate::error::MarkupError;
use crate::style::Style;
use crate::text::{Span, Text};

/// Parse markup into styled text, optionally replacing emoji shortcodes.
pub fn render(markup: &str, with_emoji: bool) -> Result<Text, MarkupError> {
    let mut text = Text::new();
    let mut open: Vec<(String, usize, Style)> = Vec::new();
    let mut closed: Vec<Span> = Vec::new();
    let mut literal = String::new();
    let mut rest = markup;

    let push_literal = |text: &mut Text, literal: &mut String| {
        if !literal.is_empty() {
            if with_emoji {
                text.push_str(&emoji::replace(literal));
            } else {
                text.push_str(literal);
            }
            literal.clear();
        }
    };

    while let Some(idx) = rest.find(|c: char| c == '[' || c == '\\') {
        literal.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        if let Some(escaped) = tail.strip_prefix("\\[") {
            literal.push('[');
            rest = escaped;
            continue;
        }
        if tail.starts_with('\\') {
            literal.push('\\');
            rest = &tail[1..];
            continue;
        }

        let Some(close) = tail.find(']') else {
            rest = tail;
            break;
        };
        let tag = &tail[1..close];
        let position = markup.len() - tail.len();

        if let Some(name) = tag.strip_prefix('/') {
            push_literal(&mut text, &mut literal);
            let name = name.trim();
            let found = if name.is_empty() {
                open.len().checked_sub(1)
            } else {
                open.iter().rposition(|(tag, _, _)| tag == name)
            };
            let Some(found) = found else {
                return Err(MarkupError::UnmatchedClose {
                    tag: name.to_string(),
                    position,
                });
            };
            let (_, start, style) = open.remove(found);
            closed.push(Span::new(start, text.len(), style));
        } else if let Ok(style) = Style::parse(tag) {
            push_literal(&mut text, &mut literal);
            open.push((tag.trim().to_string(), text.len(), style));
        } else {
            literal.push_str(&tail[..=close]);
        }
        rest = &tail[close + 1..];
    }
    literal.push_str(rest);
    push_literal(&mut text, &mut literal);

    let end = text.len();
    closed.extend(open.into_iter().rev().map(|(_, start, style)| Span::new(start, end, style)));

    // Outer tags close last; reverse then sort by start so they sit underneath.
    closed.reverse();
    closed.sort_by_key(|span| span.start);
    for span in closed {
        text.stylize(span.start..span.end, span.style);
    }
    Ok(text)
}
