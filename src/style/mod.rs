//! Style module: colors, modifiers and the styles built from them.
//!
//! This module contains:
//! - [`Color`]: Terminal default, 256-color index or 24-bit [`Rgb`]
//! - [`ColorSystem`]: What the terminal can display, used for downgrading
//! - [`Modifiers`]: Text style bitflags
//! - [`Style`]: Colors plus modifiers, parsed from definitions like `"bold red"`

mod color;
#[allow(clippy::module_inception)]
mod style;

pub use color::{ansi_to_rgb, Color, ColorSystem, Rgb};
pub use style::{Modifiers, Style};
