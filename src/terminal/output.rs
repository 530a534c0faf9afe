//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use crate::style::{Color, ColorSystem, Modifiers, Style};
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// so that a batch of lines reaches the terminal in one piece.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical batch of lines (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write `s` wrapped in the SGR sequence for `style`.
    ///
    /// With no color system, or a null style, the text is written bare.
    pub fn write_styled(&mut self, s: &str, style: Style, system: Option<ColorSystem>) {
        match system {
            Some(system) if !style.is_null() => {
                self.set_style(style, system);
                self.write_str(s);
                self.reset_attrs();
            }
            _ => self.write_str(s),
        }
    }

    /// Emit one SGR sequence selecting `style`, downgrading colors to `system`.
    pub fn set_style(&mut self, style: Style, system: ColorSystem) {
        let mut params: Vec<String> = Modifiers::SGR_CODES
            .iter()
            .filter(|(modifier, _)| style.modifiers.contains(*modifier))
            .map(|(_, code)| code.to_string())
            .collect();
        if let Some(fg) = color_params(style.fg.downgrade(system), false) {
            params.push(fg);
        }
        if let Some(bg) = color_params(style.bg.downgrade(system), true) {
            params.push(bg);
        }
        if params.is_empty() {
            return;
        }
        let _ = write!(self.data, "\x1b[{}m", params.join(";"));
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// SGR parameters for a color; background codes are offset by 10.
fn color_params(color: Color, background: bool) -> Option<String> {
    let base: u8 = if background { 40 } else { 30 };
    match color {
        Color::Default => None,
        Color::Indexed(idx @ 0..=7) => Some((base + idx).to_string()),
        Color::Indexed(idx @ 8..=15) => Some((base + 60 + idx - 8).to_string()),
        Color::Indexed(idx) => Some(format!("{};5;{idx}", base + 8)),
        Color::Rgb(rgb) => Some(format!("{};2;{};{};{}", base + 8, rgb.r, rgb.g, rgb.b)),
    }
}
