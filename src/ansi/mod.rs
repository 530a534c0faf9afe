//! ANSI decoding: turn terminal output into styled [`Text`].
//!
//! The decoder drives `vte`'s state machine over each line. SGR sequences
//! (`ESC [ ... m`) update the current style; every other escape sequence and
//! control byte is dropped, apart from tabs, which are kept for the console's
//! tab expansion. The current style carries over from one line to the next,
//! as it would in a terminal.
//!
//! # Example
//!
//! ```
//! use fileproxy::AnsiDecoder;
//!
//! let mut decoder = AnsiDecoder::new();
//! let text = decoder.decode_line("\x1b[1mbold\x1b[0m plain");
//! assert_eq!(text.plain(), "bold plain");
//! assert_eq!(text.spans().len(), 1);
//! ```

use crate::style::{Color, Modifiers, Rgb, Style};
use crate::text::Text;
use tracing::trace;
use vte::{Params, Parser, Perform};

/// Stateful converter from escape-sequence text to [`Text`].
#[derive(Debug, Default)]
pub struct AnsiDecoder {
    style: Style,
}

impl AnsiDecoder {
    /// Create a decoder with no active style.
    pub const fn new() -> Self {
        Self { style: Style::NULL }
    }

    /// The style that the next decoded character will receive.
    pub const fn current_style(&self) -> Style {
        self.style
    }

    /// Decode text containing any number of lines.
    pub fn decode(&mut self, terminal_text: &str) -> Vec<Text> {
        terminal_text
            .lines()
            .map(|line| self.decode_line(line))
            .collect()
    }

    /// Decode a single line.
    ///
    /// Only the part after the last carriage return survives, since a
    /// terminal would have overwritten everything before it.
    pub fn decode_line(&mut self, line: &str) -> Text {
        let line = line.rsplit('\r').next().unwrap_or(line);

        let mut parser = Parser::new();
        let mut performer = LinePerformer {
            style: &mut self.style,
            text: Text::new(),
            run: String::new(),
        };
        for byte in line.bytes() {
            parser.advance(&mut performer, byte);
        }
        performer.finish()
    }
}

/// Collects printable characters into runs sharing one style.
struct LinePerformer<'a> {
    style: &'a mut Style,
    text: Text,
    run: String,
}

impl LinePerformer<'_> {
    fn flush_run(&mut self) {
        if !self.run.is_empty() {
            self.text.push_styled(&self.run, *self.style);
            self.run.clear();
        }
    }

    fn finish(mut self) -> Text {
        self.flush_run();
        self.text
    }

    fn apply_sgr(&mut self, params: &Params) {
        let params: Vec<&[u16]> = params.iter().collect();
        if params.is_empty() {
            *self.style = Style::NULL;
            return;
        }

        let mut iter = params.into_iter();
        while let Some(param) = iter.next() {
            let Some(&code) = param.first() else { continue };
            let style = &mut *self.style;
            match code {
                0 => *style = Style::NULL,
                1..=9 => {
                    if let Some(&(modifier, _)) =
                        Modifiers::SGR_CODES.iter().find(|(_, sgr)| u16::from(*sgr) == code)
                    {
                        style.modifiers.insert(modifier);
                    }
                }
                21 => style.modifiers.remove(Modifiers::BOLD),
                22 => style.modifiers.remove(Modifiers::BOLD | Modifiers::DIM),
                23 => style.modifiers.remove(Modifiers::ITALIC),
                24 => style.modifiers.remove(Modifiers::UNDERLINE),
                25 => style.modifiers.remove(Modifiers::BLINK),
                27 => style.modifiers.remove(Modifiers::REVERSED),
                28 => style.modifiers.remove(Modifiers::HIDDEN),
                29 => style.modifiers.remove(Modifiers::STRIKETHROUGH),
                30..=37 => style.fg = Color::Indexed(low_byte(code - 30)),
                38 => {
                    if let Some(color) = extended_color(param, &mut iter) {
                        style.fg = color;
                    }
                }
                39 => style.fg = Color::Default,
                40..=47 => style.bg = Color::Indexed(low_byte(code - 40)),
                48 => {
                    if let Some(color) = extended_color(param, &mut iter) {
                        style.bg = color;
                    }
                }
                49 => style.bg = Color::Default,
                90..=97 => style.fg = Color::Indexed(low_byte(code - 90 + 8)),
                100..=107 => style.bg = Color::Indexed(low_byte(code - 100 + 8)),
                _ => trace!(code, "ignoring unsupported SGR parameter"),
            }
        }
    }
}

impl Perform for LinePerformer<'_> {
    fn print(&mut self, c: char) {
        self.run.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if byte == b'\t' {
            self.run.push('\t');
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if action == 'm' && intermediates.is_empty() && !ignore {
            self.flush_run();
            self.apply_sgr(params);
        } else {
            trace!(%action, "dropping control sequence");
        }
    }
}

/// Read a 256-color or RGB color from `38`/`48`, in either the colon form
/// (`38:5:n`) or the semicolon form (`38;5;n`).
fn extended_color<'p>(
    param: &[u16],
    rest: &mut impl Iterator<Item = &'p [u16]>,
) -> Option<Color> {
    if param.len() > 1 {
        return match param[1] {
            5 => param.get(2).map(|&idx| Color::Indexed(low_byte(idx))),
            // 38:2:r:g:b, or 38:2:colorspace:r:g:b
            2 if param.len() >= 5 => {
                let rgb = &param[param.len() - 3..];
                Some(Color::Rgb(Rgb::new(
                    low_byte(rgb[0]),
                    low_byte(rgb[1]),
                    low_byte(rgb[2]),
                )))
            }
            _ => None,
        };
    }

    let mut next = || rest.next().and_then(|p| p.first().copied());
    match next()? {
        5 => next().map(|idx| Color::Indexed(low_byte(idx))),
        2 => {
            let r = next()?;
            let g = next()?;
            let b = next()?;
            Some(Color::Rgb(Rgb::new(low_byte(r), low_byte(g), low_byte(b))))
        }
        _ => None,
    }
}

fn low_byte(value: u16) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}
