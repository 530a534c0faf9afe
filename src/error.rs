//! Error types for style parsing, markup and configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A style definition could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// Word is neither an attribute nor a color
    #[error("unknown style word '{0}'")]
    UnknownWord(String),

    /// Color name or literal could not be understood
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    /// `on` was not followed by a color
    #[error("expected a color after 'on'")]
    MissingBackground,

    /// `not` was not followed by an attribute
    #[error("expected an attribute after 'not'")]
    MissingAttribute,

    /// Empty style definition
    #[error("empty style definition")]
    Empty,
}

/// Console markup was malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// A closing tag was found with no matching open tag
    #[error("closing tag '[/{tag}]' at position {position} has nothing to close")]
    UnmatchedClose {
        /// Tag name (empty for `[/]`)
        tag: String,
        /// Byte offset of the tag in the markup
        position: usize,
    },
}

impl From<MarkupError> for io::Error {
    fn from(err: MarkupError) -> Self {
        Self::new(io::ErrorKind::InvalidData, err)
    }
}

/// Console configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unrecognised color system name
    #[error("unknown color system '{0}' (expected auto, none, standard, 256 or truecolor)")]
    UnknownColorSystem(String),

    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Config file is not valid JSON for [`ConsoleConfig`](crate::console::ConsoleConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
