//! Colors: terminal default, 256-color palette indices and 24-bit RGB.

use crate::error::StyleError;
use std::fmt;

/// True-color RGB representation.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Squared euclidean distance, used for nearest-palette lookups.
    const fn distance(self, other: Self) -> u32 {
        let dr = self.r.abs_diff(other.r) as u32;
        let dg = self.g.abs_diff(other.g) as u32;
        let db = self.b.abs_diff(other.b) as u32;
        dr * dr + dg * dg + db * db
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

/// Number of colors a terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorSystem {
    /// The 16 base ANSI colors
    Standard,
    /// The xterm 256-color palette
    EightBit,
    /// 24-bit color
    TrueColor,
}

impl fmt::Display for ColorSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::EightBit => "256",
            Self::TrueColor => "truecolor",
        })
    }
}

/// A foreground or background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Color {
    /// The terminal's own default
    #[default]
    Default,
    /// Index into the 256-color palette (0-15 are the base colors)
    Indexed(u8),
    /// 24-bit color
    Rgb(Rgb),
}

/// Names of the 16 base colors, by palette index.
const STANDARD_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright_black",
    "bright_red",
    "bright_green",
    "bright_yellow",
    "bright_blue",
    "bright_magenta",
    "bright_cyan",
    "bright_white",
];

impl Color {
    /// Check if this is the terminal default.
    #[inline]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Resolve to RGB using the xterm palette. `None` for the default color.
    pub const fn to_rgb(self) -> Option<Rgb> {
        match self {
            Self::Default => None,
            Self::Indexed(idx) => Some(ansi_to_rgb(idx)),
            Self::Rgb(rgb) => Some(rgb),
        }
    }

    /// Reduce this color so that it can be shown with `system`.
    #[must_use]
    pub fn downgrade(self, system: ColorSystem) -> Self {
        match (self, system) {
            (Self::Default, _) | (_, ColorSystem::TrueColor) => self,
            (Self::Indexed(_), ColorSystem::EightBit) => self,
            (Self::Rgb(rgb), ColorSystem::EightBit) => Self::Indexed(rgb_to_eight_bit(rgb)),
            (Self::Indexed(idx), ColorSystem::Standard) if idx < 16 => self,
            (Self::Indexed(idx), ColorSystem::Standard) => {
                Self::Indexed(nearest_standard(ansi_to_rgb(idx)))
            }
            (Self::Rgb(rgb), ColorSystem::Standard) => Self::Indexed(nearest_standard(rgb)),
        }
    }

    /// Parse a color: a base color name, `default`, `color(N)`, `#rrggbb`
    /// or `rgb(r,g,b)`.
    pub fn parse(name: &str) -> Result<Self, StyleError> {
        let name = name.trim().to_ascii_lowercase();
        let invalid = || StyleError::InvalidColor(name.clone());

        if name == "default" {
            return Ok(Self::Default);
        }
        if let Some(idx) = STANDARD_NAMES.iter().position(|&n| n == name) {
            return u8::try_from(idx).map(Self::Indexed).map_err(|_| invalid());
        }
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(invalid());
            }
            let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return Ok(Self::Rgb(Rgb::from_u32(value)));
        }
        if let Some(inner) = name.strip_prefix("color(").and_then(|s| s.strip_suffix(')')) {
            let idx = inner.trim().parse::<u8>().map_err(|_| invalid())?;
            return Ok(Self::Indexed(idx));
        }
        if let Some(inner) = name.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<u8> = inner
                .split(',')
                .map(|p| p.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())?;
            return match parts[..] {
                [r, g, b] => Ok(Self::Rgb(Rgb::new(r, g, b))),
                _ => Err(invalid()),
            };
        }
        Err(invalid())
    }
}

/// Convert ANSI color index to RGB.
pub const fn ansi_to_rgb(idx: u8) -> Rgb {
    match idx {
        0 => Rgb::new(0, 0, 0),
        1 => Rgb::new(128, 0, 0),
        2 => Rgb::new(0, 128, 0),
        3 => Rgb::new(128, 128, 0),
        4 => Rgb::new(0, 0, 128),
        5 => Rgb::new(128, 0, 128),
        6 => Rgb::new(0, 128, 128),
        7 => Rgb::new(192, 192, 192),
        8 => Rgb::new(128, 128, 128),
        9 => Rgb::new(255, 0, 0),
        10 => Rgb::new(0, 255, 0),
        11 => Rgb::new(255, 255, 0),
        12 => Rgb::new(0, 0, 255),
        13 => Rgb::new(255, 0, 255),
        14 => Rgb::new(0, 255, 255),
        15 => Rgb::new(255, 255, 255),
        16..=231 => {
            let i = idx - 16;
            let r = (i / 36) % 6;
            let g = (i / 6) % 6;
            let b = i % 6;
            Rgb::new(
                if r == 0 { 0 } else { r * 40 + 55 },
                if g == 0 { 0 } else { g * 40 + 55 },
                if b == 0 { 0 } else { b * 40 + 55 },
            )
        }
        232..=255 => {
            let v = (idx - 232) * 10 + 8;
            Rgb::new(v, v, v)
        }
    }
}

/// Map an RGB color onto the 6x6x6 cube or the grayscale ramp.
fn rgb_to_eight_bit(rgb: Rgb) -> u8 {
    if rgb.r == rgb.g && rgb.g == rgb.b {
        return match rgb.r {
            0..=3 => 16,
            247..=255 => 231,
            v => 232 + ((v - 3) / 10).min(23),
        };
    }
    // Cube levels are 0, 95, 135, 175, 215, 255; thresholds sit at the midpoints.
    let level = |c: u8| match c {
        0..=47 => 0,
        48..=114 => 1,
        c => (c - 35) / 40,
    };
    16 + 36 * level(rgb.r) + 6 * level(rgb.g) + level(rgb.b)
}

fn nearest_standard(rgb: Rgb) -> u8 {
    (0..16u8)
        .min_by_key(|&idx| ansi_to_rgb(idx).distance(rgb))
        .unwrap_or(7)
}
