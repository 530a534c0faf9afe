//! Style: colors plus text modifiers, and the style-definition parser.

use super::color::Color;
use crate::error::StyleError;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use fileproxy::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Blinking text
        const BLINK = 0b0001_0000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
        /// Hidden/invisible text
        const HIDDEN = 0b0100_0000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b1000_0000;
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl Modifiers {
    /// SGR parameter that switches each modifier on.
    pub(crate) const SGR_CODES: [(Self, u8); 8] = [
        (Self::BOLD, 1),
        (Self::DIM, 2),
        (Self::ITALIC, 3),
        (Self::UNDERLINE, 4),
        (Self::BLINK, 5),
        (Self::REVERSED, 7),
        (Self::HIDDEN, 8),
        (Self::STRIKETHROUGH, 9),
    ];

    fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "bold" | "b" => Self::BOLD,
            "dim" | "d" => Self::DIM,
            "italic" | "i" => Self::ITALIC,
            "underline" | "u" => Self::UNDERLINE,
            "blink" => Self::BLINK,
            "reverse" | "r" => Self::REVERSED,
            "conceal" | "hidden" => Self::HIDDEN,
            "strike" | "s" | "strikethrough" => Self::STRIKETHROUGH,
            _ => return None,
        })
    }
}

/// Visual attributes applied to a run of text.
///
/// `cleared` records modifiers explicitly switched off (`not bold`), so that a
/// nested style can cancel an attribute inherited from an outer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Modifiers switched on
    pub modifiers: Modifiers,
    /// Modifiers switched off
    pub cleared: Modifiers,
}

impl Style {
    /// The style that changes nothing.
    pub const NULL: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        modifiers: Modifiers::empty(),
        cleared: Modifiers::empty(),
    };

    /// Create an empty style.
    #[inline]
    pub const fn new() -> Self {
        Self::NULL
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Switch modifiers on (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = self.modifiers.union(modifiers);
        self
    }

    /// Check whether rendering this style would emit no escape codes.
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.fg.is_default() && self.bg.is_default() && self.modifiers.is_empty()
    }

    /// Layer `other` on top of this style.
    ///
    /// Colors set in `other` win; modifiers are unioned after removing the
    /// ones `other` clears.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            fg: if other.fg.is_default() { self.fg } else { other.fg },
            bg: if other.bg.is_default() { self.bg } else { other.bg },
            modifiers: (self.modifiers - other.cleared) | other.modifiers,
            cleared: (self.cleared - other.modifiers) | other.cleared,
        }
    }

    /// Parse a style definition such as `"bold red on #202020"`.
    pub fn parse(definition: &str) -> Result<Self, StyleError> {
        let words = split_words(definition);
        if words.is_empty() {
            return Err(StyleError::Empty);
        }

        let mut style = Self::NULL;
        let mut words = words.into_iter();
        while let Some(word) = words.next() {
            let word = word.to_ascii_lowercase();
            match word.as_str() {
                "none" => {}
                "on" => {
                    let color = words.next().ok_or(StyleError::MissingBackground)?;
                    style.bg = Color::parse(color)?;
                }
                "not" => {
                    let attr = words.next().ok_or(StyleError::MissingAttribute)?;
                    let modifier = Modifiers::from_word(&attr.to_ascii_lowercase())
                        .ok_or_else(|| StyleError::UnknownWord(attr.to_string()))?;
                    style.modifiers.remove(modifier);
                    style.cleared.insert(modifier);
                }
                other => {
                    if let Some(modifier) = Modifiers::from_word(other) {
                        style.modifiers.insert(modifier);
                        style.cleared.remove(modifier);
                    } else {
                        style.fg = Color::parse(other)
                            .map_err(|_| StyleError::UnknownWord(other.to_string()))?;
                    }
                }
            }
        }
        Ok(style)
    }
}

impl FromStr for Style {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split on whitespace outside parentheses, so `rgb(1, 2, 3)` stays one word.
fn split_words(definition: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in definition.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    words.push(&definition[s..i]);
                }
                continue;
            }
            _ => {}
        }
        start.get_or_insert(i);
    }
    if let Some(s) = start {
        words.push(&definition[s..]);
    }
    words
}
