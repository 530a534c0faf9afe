//! Console module: the rendering side of the proxy.
//!
//! This module contains:
//! - [`Renderer`]: What a proxy needs from a console (print + scoped batching)
//! - [`Scope`]: Guard that enters a renderer's scope and always leaves it
//! - [`PrintOptions`]: Per-print switches for markup, emoji and highlighting
//! - [`Console`]: A renderer that writes styled text to any `Write`
//! - [`ConsoleConfig`]: Serde-loadable console settings

mod config;
#[allow(clippy::module_inception)]
mod console;
pub mod emoji;
mod highlight;
pub mod markup;

pub use config::{process_env, ColorChoice, ConsoleConfig, DEFAULT_WIDTH};
pub use console::Console;
pub use highlight::{Highlighter, ReprHighlighter};

use crate::text::Text;
use std::io;
use std::ops::{Deref, DerefMut};
use tracing::warn;

/// Switches for how a single print interprets its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Parse `[style]` markup in strings
    pub markup: bool,
    /// Replace `:emoji:` shortcodes in strings
    pub emoji: bool,
    /// Apply the console's highlighter
    pub highlight: bool,
}

impl PrintOptions {
    /// Everything off: the text is printed exactly as given.
    pub const fn raw() -> Self {
        Self {
            markup: false,
            emoji: false,
            highlight: false,
        }
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            markup: true,
            emoji: true,
            highlight: true,
        }
    }
}

/// A console that can print styled text.
///
/// `enter` and `exit` bracket a batch of prints. Implementations may hold
/// output back until the outermost batch ends; calls nest.
pub trait Renderer {
    /// Print `text` followed by a newline.
    fn print(&mut self, text: &Text, options: PrintOptions) -> io::Result<()>;

    /// Begin a batch.
    fn enter(&mut self);

    /// End a batch, writing held output if this was the outermost one.
    fn exit(&mut self) -> io::Result<()>;

    /// Flush the underlying output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn print(&mut self, text: &Text, options: PrintOptions) -> io::Result<()> {
        (**self).print(text, options)
    }

    fn enter(&mut self) {
        (**self).enter();
    }

    fn exit(&mut self) -> io::Result<()> {
        (**self).exit()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// An entered renderer scope.
///
/// Dereferences to the renderer, so prints go through the guard. Scopes nest
/// by entering a new one through an existing guard. Call [`Scope::finish`] to
/// see errors from leaving the scope; dropping the guard leaves it too, on
/// every path, and logs any error.
///
/// # Example
///
/// ```
/// use fileproxy::{Console, PrintOptions, Renderer, Scope, Text};
///
/// let mut console = Console::new(Vec::new());
/// let mut scope = Scope::enter(&mut console);
/// scope.print(&Text::from("held until the scope ends"), PrintOptions::raw())?;
/// scope.finish()?;
/// assert_eq!(console.get_ref(), b"held until the scope ends\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Scope<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    active: bool,
}

impl<'a, R: Renderer + ?Sized> Scope<'a, R> {
    /// Enter the renderer's scope.
    pub fn enter(renderer: &'a mut R) -> Self {
        renderer.enter();
        Self {
            renderer,
            active: true,
        }
    }

    /// Leave the scope, returning any error from writing held output.
    pub fn finish(mut self) -> io::Result<()> {
        self.active = false;
        self.renderer.exit()
    }
}

impl<R: Renderer + ?Sized> Deref for Scope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for Scope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for Scope<'_, R> {
    fn drop(&mut self) {
        if self.active {
            if let Err(err) = self.renderer.exit() {
                warn!(%err, "failed to write console output when leaving scope");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        depth: usize,
        max_depth: usize,
        exits: usize,
        fail_exit: bool,
    }

    impl Renderer for Counting {
        fn print(&mut self, _text: &Text, _options: PrintOptions) -> io::Result<()> {
            Err(io::Error::other("print failed"))
        }

        fn enter(&mut self) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
        }

        fn exit(&mut self) -> io::Result<()> {
            self.depth -= 1;
            self.exits += 1;
            if self.fail_exit {
                Err(io::Error::other("exit failed"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_scope_nests() {
        let mut renderer = Counting::default();
        {
            let mut outer = Scope::enter(&mut renderer);
            let inner = Scope::enter(&mut *outer);
            inner.finish().unwrap();
            assert_eq!(outer.depth, 1);
        }
        assert_eq!(renderer.depth, 0);
        assert_eq!(renderer.max_depth, 2);
        assert_eq!(renderer.exits, 2);
    }

    #[test]
    fn test_scope_released_on_error_path() {
        fn failing(renderer: &mut Counting) -> io::Result<()> {
            let mut scope = Scope::enter(renderer);
            scope.print(&Text::from("x"), PrintOptions::raw())?;
            scope.finish()
        }

        let mut renderer = Counting::default();
        assert!(failing(&mut renderer).is_err());
        assert_eq!(renderer.depth, 0);
        assert_eq!(renderer.exits, 1);
    }

    #[test]
    fn test_finish_reports_exit_error() {
        let mut renderer = Counting {
            fail_exit: true,
            ..Counting::default()
        };
        let scope = Scope::enter(&mut renderer);
        assert!(scope.finish().is_err());
        assert_eq!(renderer.exits, 1);
    }

    #[test]
    fn test_print_options() {
        let raw = PrintOptions::raw();
        assert!(!raw.markup && !raw.emoji && !raw.highlight);
        let default = PrintOptions::default();
        assert!(default.markup && default.emoji && default.highlight);
    }
}
