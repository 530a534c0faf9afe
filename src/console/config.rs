//! Console configuration and terminal capability detection.

use crate::error::ConfigError;
use crate::style::ColorSystem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Width used when nothing else says how wide the terminal is.
pub const DEFAULT_WIDTH: usize = 80;

/// Requested color system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Detect from the terminal and environment
    #[default]
    Auto,
    /// Never emit color or style codes
    None,
    /// 16 colors
    Standard,
    /// 256 colors
    #[serde(rename = "256")]
    EightBit,
    /// 24-bit color
    TrueColor,
}

impl FromStr for ColorChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" | "off" => Ok(Self::None),
            "standard" | "16" => Ok(Self::Standard),
            "256" | "eight_bit" => Ok(Self::EightBit),
            "truecolor" | "24bit" => Ok(Self::TrueColor),
            _ => Err(ConfigError::UnknownColorSystem(s.to_string())),
        }
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Standard => "standard",
            Self::EightBit => "256",
            Self::TrueColor => "truecolor",
        })
    }
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Color system to use
    pub color_system: ColorChoice,
    /// Treat the output as a terminal (or not) regardless of detection
    pub force_terminal: Option<bool>,
    /// Fixed width in cells
    pub width: Option<usize>,
    /// Columns per tab stop
    pub tab_size: usize,
    /// Leave long lines to the terminal instead of folding them
    pub soft_wrap: bool,
    /// Allow markup in printed strings
    pub markup: bool,
    /// Allow `:emoji:` shortcodes in printed strings
    pub emoji: bool,
    /// Allow automatic highlighting
    pub highlight: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            color_system: ColorChoice::Auto,
            force_terminal: None,
            width: None,
            tab_size: 8,
            soft_wrap: false,
            markup: true,
            emoji: true,
            highlight: true,
        }
    }
}

impl ConsoleConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Decide whether output counts as a terminal.
    ///
    /// `force_terminal` wins, then a non-empty `FORCE_COLOR`, then detection.
    pub fn resolve_terminal<E>(&self, detected: bool, env: &E) -> bool
    where
        E: Fn(&str) -> Option<String>,
    {
        self.force_terminal
            .or_else(|| non_empty(env("FORCE_COLOR")).map(|_| true))
            .unwrap_or(detected)
    }

    /// Work out which color system to render with; `None` means no styling.
    pub fn resolve_color_system<E>(&self, is_terminal: bool, env: &E) -> Option<ColorSystem>
    where
        E: Fn(&str) -> Option<String>,
    {
        let system = match self.color_system {
            ColorChoice::None => None,
            ColorChoice::Standard => Some(ColorSystem::Standard),
            ColorChoice::EightBit => Some(ColorSystem::EightBit),
            ColorChoice::TrueColor => Some(ColorSystem::TrueColor),
            ColorChoice::Auto => detect_color_system(is_terminal, env),
        };
        debug!(choice = %self.color_system, is_terminal, ?system, "resolved color system");
        system
    }

    /// Work out the console width: config, then `COLUMNS`, then the terminal.
    pub fn resolve_width<E>(&self, is_terminal: bool, env: &E) -> usize
    where
        E: Fn(&str) -> Option<String>,
    {
        self.width
            .or_else(|| env("COLUMNS").and_then(|v| v.trim().parse().ok()))
            .or_else(|| {
                is_terminal
                    .then(crossterm::terminal::size)
                    .and_then(Result::ok)
                    .map(|(columns, _)| usize::from(columns))
            })
            .filter(|&width| width > 0)
            .unwrap_or(DEFAULT_WIDTH)
    }
}

fn detect_color_system<E>(is_terminal: bool, env: &E) -> Option<ColorSystem>
where
    E: Fn(&str) -> Option<String>,
{
    if !is_terminal || non_empty(env("NO_COLOR")).is_some() {
        return None;
    }

    let term = env("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" || term == "unknown" {
        return None;
    }

    let colorterm = env("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if colorterm == "truecolor" || colorterm == "24bit" || term.ends_with("-direct") {
        return Some(ColorSystem::TrueColor);
    }
    if term.contains("256color") {
        return Some(ColorSystem::EightBit);
    }
    Some(ColorSystem::Standard)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Read a variable from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
