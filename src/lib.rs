//! # fileproxy
//!
//! Line-buffering stream proxy that routes plain writes through a styled
//! terminal console.
//!
//! Code that writes text to a stream (a logger, a child process's output, a
//! `write!` call) can be pointed at a [`FileProxy`] instead. The proxy holds
//! partial lines, decodes ANSI escape sequences in complete ones, and prints
//! them through a [`Console`], so that they interleave cleanly with the
//! console's own output and pick up its color handling.
//!
//! ## Core Concepts
//!
//! - **Pending line**: text after the last newline waits in the proxy until
//!   a newline or an explicit flush
//! - **Scoped batches**: all lines completed by one write are printed inside
//!   one console [`Scope`], so they reach the terminal together
//! - **Styled text**: escape sequences become [`Style`] spans on a [`Text`],
//!   which the console re-renders for the terminal's [`ColorSystem`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use fileproxy::{Console, FileProxy};
//! use std::io::Write;
//!
//! let mut console = Console::stdout();
//! let mut out = FileProxy::new(&mut console, std::io::stdout());
//!
//! writeln!(out, "\x1b[1mbuilding\x1b[0m crate")?;
//! out.flush()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod ansi;
pub mod console;
pub mod error;
pub mod proxy;
pub mod style;
pub mod terminal;
pub mod text;

// Re-exports for convenience
pub use ansi::AnsiDecoder;
pub use console::{ColorChoice, Console, ConsoleConfig, PrintOptions, Renderer, Scope};
pub use error::{ConfigError, MarkupError, StyleError};
pub use proxy::FileProxy;
pub use style::{Color, ColorSystem, Modifiers, Rgb, Style};
pub use text::{Span, Text};
