//! `Console`: renders styled text to a writer.

use super::config::{process_env, ConsoleConfig};
use super::highlight::{Highlighter, ReprHighlighter};
use super::{emoji, markup, PrintOptions, Renderer};
use crate::style::ColorSystem;
use crate::terminal::OutputBuffer;
use crate::text::Text;
use std::borrow::Cow;
use std::io::{self, IsTerminal, Stdout, Write};

/// A console writing styled text to `W`.
///
/// Each print expands tabs, folds long lines to the console width (unless
/// soft wrapping), and wraps styled runs in SGR sequences for the resolved
/// color system. Outside a scope, output is written as soon as it is printed;
/// inside one, it is held until the outermost scope exits and then written
/// in a single call.
pub struct Console<W: Write = Stdout> {
    writer: W,
    config: ConsoleConfig,
    color_system: Option<ColorSystem>,
    width: usize,
    highlighter: ReprHighlighter,
    output: OutputBuffer,
    depth: usize,
}

impl Console<Stdout> {
    /// Console on the process's standard output, with terminal detection.
    pub fn stdout() -> Self {
        Self::stdout_with_config(ConsoleConfig::default())
    }

    /// Console on standard output with the given configuration.
    pub fn stdout_with_config(config: ConsoleConfig) -> Self {
        let stdout = io::stdout();
        let detected = stdout.is_terminal();
        Self::build(stdout, config, detected, &process_env)
    }
}

impl<W: Write> Console<W> {
    /// Console on an arbitrary writer, which is assumed not to be a terminal.
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, ConsoleConfig::default())
    }

    /// Console on an arbitrary writer with the given configuration.
    ///
    /// The writer is not probed; set `force_terminal` (or `FORCE_COLOR`) to
    /// get styled output from an automatic color system.
    pub fn with_config(writer: W, config: ConsoleConfig) -> Self {
        Self::build(writer, config, false, &process_env)
    }

    pub(crate) fn build<E>(writer: W, config: ConsoleConfig, detected: bool, env: &E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let is_terminal = config.resolve_terminal(detected, env);
        let color_system = config.resolve_color_system(is_terminal, env);
        let width = config.resolve_width(is_terminal, env);
        Self {
            writer,
            config,
            color_system,
            width,
            highlighter: ReprHighlighter::default(),
            output: OutputBuffer::new(),
            depth: 0,
        }
    }

    /// Color system in use; `None` when output is unstyled.
    pub const fn color_system(&self) -> Option<ColorSystem> {
        self.color_system
    }

    /// Width in cells that lines are folded to.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The configuration this console was built from.
    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Replace the highlighter used when highlighting is on.
    pub const fn set_highlighter(&mut self, highlighter: ReprHighlighter) {
        self.highlighter = highlighter;
    }

    /// Check whether a scope is currently open.
    pub const fn in_scope(&self) -> bool {
        self.depth > 0
    }

    /// Get a reference to the writer.
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Give back the writer. Output held by an open scope is discarded.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Print a string, interpreting markup and emoji shortcodes as enabled.
    pub fn print_str(&mut self, s: &str, options: PrintOptions) -> io::Result<()> {
        let with_emoji = options.emoji && self.config.emoji;
        let text = if options.markup && self.config.markup {
            markup::render(s, with_emoji)?
        } else if with_emoji {
            Text::from(emoji::replace(s).into_owned())
        } else {
            Text::from(s)
        };
        self.print(&text, options)
    }

    fn render(&mut self, text: &Text, options: PrintOptions) {
        let text = if options.highlight && self.config.highlight {
            let mut highlighted = text.clone();
            self.highlighter.highlight(&mut highlighted);
            Cow::Owned(highlighted)
        } else {
            Cow::Borrowed(text)
        };
        let text = text.expand_tabs(self.config.tab_size);

        let mut first = true;
        for line in text.split_lines() {
            let pieces = if self.config.soft_wrap {
                vec![line]
            } else {
                line.fold(self.width)
            };
            for piece in pieces {
                if !first {
                    self.output.write_str("\n");
                }
                first = false;
                for (s, style) in piece.segments() {
                    self.output.write_styled(s, style, self.color_system);
                }
            }
        }
        self.output.write_str("\n");
    }

    fn write_held(&mut self) -> io::Result<()> {
        if self.output.is_empty() {
            return Ok(());
        }
        let result = self.output.flush_to(&mut self.writer);
        self.output.clear();
        result
    }
}

impl<W: Write> Renderer for Console<W> {
    fn print(&mut self, text: &Text, options: PrintOptions) -> io::Result<()> {
        self.render(text, options);
        if self.depth == 0 {
            self.write_held()
        } else {
            Ok(())
        }
    }

    fn enter(&mut self) {
        self.depth += 1;
    }

    fn exit(&mut self) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.write_held()
        } else {
            Ok(())
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
