//! File Proxy: route writes meant for a stream through a console.
//!
//! [`FileProxy`] stands in for a text stream such as standard output. Text
//! written to it is buffered until a newline arrives; complete lines are then
//! decoded for ANSI styling and printed through a [`Renderer`] in one scoped
//! batch. Everything else a caller might want from the stream (reading,
//! seeking, terminal checks, file descriptors) goes to the wrapped stream.
//!
//! # Example
//!
//! ```
//! use fileproxy::{Console, FileProxy};
//! use std::io::Write;
//!
//! let mut console = Console::new(Vec::new());
//! let mut proxy = FileProxy::new(&mut console, std::io::sink());
//!
//! write!(proxy, "progress: ")?;
//! writeln!(proxy, "\x1b[32mdone\x1b[0m")?;
//! proxy.flush()?;
//! drop(proxy);
//!
//! assert_eq!(console.get_ref(), b"progress: done\n");
//! # Ok::<(), std::io::Error>(())
//! ```

use crate::ansi::AnsiDecoder;
use crate::console::{PrintOptions, Renderer, Scope};
use crate::text::Text;
use std::fmt;
use std::io::{self, IsTerminal, Read, Seek, SeekFrom, Write};
use tracing::trace;

/// A stream stand-in that sends complete lines to a console.
///
/// The proxy owns its console handle `C` (pass `&mut Console` to keep using
/// the console afterwards) and the stream `F` it replaces.
pub struct FileProxy<C: Renderer, F> {
    console: C,
    file: F,
    /// Fragments of the current unterminated line. Never contains `'\n'`.
    buffer: Vec<String>,
    decoder: AnsiDecoder,
    /// Trailing bytes of an incomplete UTF-8 sequence from `io::Write`.
    partial: Vec<u8>,
}

impl<C: Renderer, F> FileProxy<C, F> {
    /// Wrap `file`, redirecting writes to `console`.
    pub fn new(console: C, file: F) -> Self {
        Self {
            console,
            file,
            buffer: Vec::new(),
            decoder: AnsiDecoder::new(),
            partial: Vec::new(),
        }
    }

    /// Write text, printing every line it completes.
    ///
    /// Returns the number of characters of `text` after its last newline,
    /// that is, how much of this call is still waiting in the pending line.
    /// Decoder and console errors are returned unchanged.
    pub fn write_text(&mut self, text: &str) -> io::Result<usize> {
        let mut lines = Vec::new();
        let mut rest = text;

        while let Some((line, tail)) = rest.split_once('\n') {
            let mut completed = self.buffer.concat();
            completed.push_str(line);
            lines.push(completed);
            self.buffer.clear();
            rest = tail;
        }
        if !rest.is_empty() {
            self.buffer.push(rest.to_string());
        }

        if !lines.is_empty() {
            trace!(lines = lines.len(), "printing completed lines");
            let mut scope = Scope::enter(&mut self.console);
            let decoder = &mut self.decoder;
            let output = Text::from("\n").join(lines.iter().map(|line| decoder.decode_line(line)));
            scope.print(&output, PrintOptions::raw())?;
            scope.finish()?;
        }

        Ok(rest.chars().count())
    }

    /// Print the pending partial line, if there is one.
    pub fn flush_pending(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let pending = self.buffer.concat();
        trace!(len = pending.len(), "flushing pending line");
        self.console
            .print(&Text::from(pending), PrintOptions::default())?;
        self.buffer.clear();
        Ok(())
    }

    /// Fragments written since the last newline.
    pub fn pending(&self) -> &[String] {
        &self.buffer
    }

    /// Check if a partial line is waiting.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Get a reference to the wrapped stream.
    pub const fn get_ref(&self) -> &F {
        &self.file
    }

    /// Get a mutable reference to the wrapped stream.
    pub fn get_mut(&mut self) -> &mut F {
        &mut self.file
    }

    /// Get a reference to the console.
    pub const fn console(&self) -> &C {
        &self.console
    }

    /// Get a mutable reference to the console.
    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Take the proxy apart. Any pending line is discarded; call
    /// [`flush_pending`](Self::flush_pending) first to keep it.
    pub fn into_parts(self) -> (C, F) {
        (self.console, self.file)
    }

    /// Decode bytes as UTF-8, holding back an incomplete trailing sequence
    /// for the next call. Invalid bytes become U+FFFD.
    fn decode_utf8(&mut self, buf: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.partial);
        bytes.extend_from_slice(buf);

        let mut decoded = String::with_capacity(bytes.len());
        let mut input = bytes.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    decoded.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = input.split_at(err.valid_up_to());
                    decoded.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            decoded.push(char::REPLACEMENT_CHARACTER);
                            input = &after[len..];
                        }
                        None => {
                            self.partial = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        decoded
    }
}

impl<C: Renderer, F: IsTerminal> FileProxy<C, F> {
    /// Check whether the wrapped stream is a terminal.
    pub fn is_terminal(&self) -> bool {
        self.file.is_terminal()
    }
}

impl<C: Renderer, F> Write for FileProxy<C, F> {
    /// Always reports the whole buffer as written, as `io::Write` requires;
    /// use [`FileProxy::write_text`] for the pending-remainder count.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = self.decode_utf8(buf);
        self.write_text(&text)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending()?;
        self.console.flush()
    }
}

impl<C: Renderer, F> fmt::Write for FileProxy<C, F> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s).map(|_| ()).map_err(|_| fmt::Error)
    }
}

impl<C: Renderer, F: Read> Read for FileProxy<C, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl<C: Renderer, F: Seek> Seek for FileProxy<C, F> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

#[cfg(unix)]
impl<C: Renderer, F: std::os::fd::AsFd> std::os::fd::AsFd for FileProxy<C, F> {
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        self.file.as_fd()
    }
}

#[cfg(unix)]
impl<C: Renderer, F: std::os::fd::AsRawFd> std::os::fd::AsRawFd for FileProxy<C, F> {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.file.as_raw_fd()
    }
}

impl<C: Renderer + fmt::Debug, F: fmt::Debug> fmt::Debug for FileProxy<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileProxy")
            .field("console", &self.console)
            .field("file", &self.file)
            .field("pending", &self.buffer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ColorChoice, Console, ConsoleConfig};
    use crate::style::{Color, Modifiers, Style};
    use proptest::prelude::*;
    use std::io::Cursor;

    /// Records every print along with the scope depth it happened at.
    #[derive(Debug, Default)]
    struct Recorder {
        prints: Vec<(Text, PrintOptions, usize)>,
        depth: usize,
        enters: usize,
        flushes: usize,
    }

    impl Recorder {
        fn plains(&self) -> Vec<&str> {
            self.prints.iter().map(|(text, _, _)| text.plain()).collect()
        }
    }

    impl Renderer for Recorder {
        fn print(&mut self, text: &Text, options: PrintOptions) -> io::Result<()> {
            self.prints.push((text.clone(), options, self.depth));
            Ok(())
        }

        fn enter(&mut self) {
            self.depth += 1;
            self.enters += 1;
        }

        fn exit(&mut self) -> io::Result<()> {
            self.depth -= 1;
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn proxy() -> FileProxy<Recorder, Cursor<Vec<u8>>> {
        FileProxy::new(Recorder::default(), Cursor::new(Vec::new()))
    }

    #[test]
    fn test_partial_write_is_buffered() {
        let mut proxy = proxy();
        assert_eq!(proxy.write_text("hello").unwrap(), 5);
        assert_eq!(proxy.pending(), ["hello"]);
        assert!(proxy.console().prints.is_empty());
    }

    #[test]
    fn test_scenario() {
        let mut proxy = proxy();

        assert_eq!(proxy.write_text("hello").unwrap(), 5);
        assert_eq!(proxy.pending(), ["hello"]);

        assert_eq!(proxy.write_text(" world\n").unwrap(), 0);
        assert_eq!(proxy.console().plains(), ["hello world"]);
        assert!(!proxy.has_pending());

        assert_eq!(proxy.write_text("a\nb\nc").unwrap(), 1);
        assert_eq!(proxy.console().plains(), ["hello world", "a\nb"]);
        assert_eq!(proxy.pending(), ["c"]);

        proxy.flush_pending().unwrap();
        assert_eq!(proxy.console().plains(), ["hello world", "a\nb", "c"]);
        assert!(!proxy.has_pending());
    }

    #[test]
    fn test_lines_printed_raw_inside_scope() {
        let mut proxy = proxy();
        proxy.write_text("one\ntwo\n").unwrap();

        let recorder = proxy.console();
        assert_eq!(recorder.enters, 1);
        assert_eq!(recorder.depth, 0);
        let (_, options, depth) = &recorder.prints[0];
        assert_eq!(*options, PrintOptions::raw());
        assert_eq!(*depth, 1);
    }

    #[test]
    fn test_flush_prints_outside_scope_with_defaults() {
        let mut proxy = proxy();
        proxy.write_text("tail").unwrap();
        proxy.flush_pending().unwrap();

        let recorder = proxy.console();
        assert_eq!(recorder.enters, 0);
        let (text, options, depth) = &recorder.prints[0];
        assert_eq!(text.plain(), "tail");
        assert_eq!(*options, PrintOptions::default());
        assert_eq!(*depth, 0);
    }

    #[test]
    fn test_flush_empty_is_noop() {
        let mut proxy = proxy();
        proxy.flush_pending().unwrap();
        assert!(proxy.console().prints.is_empty());
    }

    #[test]
    fn test_empty_write() {
        let mut proxy = proxy();
        assert_eq!(proxy.write_text("").unwrap(), 0);
        assert!(!proxy.has_pending());
        assert!(proxy.console().prints.is_empty());
    }

    #[test]
    fn test_fragments_accumulate() {
        let mut proxy = proxy();
        proxy.write_text("a").unwrap();
        proxy.write_text("b").unwrap();
        assert_eq!(proxy.pending(), ["a", "b"]);
        proxy.write_text("c\n").unwrap();
        assert_eq!(proxy.console().plains(), ["abc"]);
    }

    #[test]
    fn test_blank_lines_kept() {
        let mut proxy = proxy();
        assert_eq!(proxy.write_text("\n\n").unwrap(), 0);
        assert_eq!(proxy.console().plains(), ["\n"]);
    }

    #[test]
    fn test_remainder_counts_chars() {
        let mut proxy = proxy();
        assert_eq!(proxy.write_text("x\n日本").unwrap(), 2);
    }

    #[test]
    fn test_escape_sequences_decoded() {
        let mut proxy = proxy();
        proxy.write_text("\x1b[1;31merror\x1b[0m: boom\n").unwrap();

        let (text, _, _) = &proxy.console().prints[0];
        assert_eq!(text.plain(), "error: boom");
        assert_eq!(
            text.spans()[0].style,
            Style::new()
                .with_fg(Color::Indexed(1))
                .with_modifiers(Modifiers::BOLD)
        );
    }

    #[test]
    fn test_style_carries_across_writes() {
        let mut proxy = proxy();
        proxy.write_text("\x1b[32mgreen\n").unwrap();
        proxy.write_text("still\n").unwrap();

        let (text, _, _) = &proxy.console().prints[1];
        assert_eq!(text.spans()[0].style.fg, Color::Indexed(2));
    }

    #[test]
    fn test_io_write_reports_full_length() {
        let mut proxy = proxy();
        assert_eq!(Write::write(&mut proxy, b"abc\nde").unwrap(), 6);
        assert_eq!(proxy.pending(), ["de"]);
    }

    #[test]
    fn test_io_write_split_utf8() {
        let mut proxy = proxy();
        let bytes = "é\n".as_bytes();
        proxy.write_all(&bytes[..1]).unwrap();
        assert!(!proxy.has_pending());
        proxy.write_all(&bytes[1..]).unwrap();
        assert_eq!(proxy.console().plains(), ["é"]);
    }

    #[test]
    fn test_io_write_invalid_utf8() {
        let mut proxy = proxy();
        proxy.write_all(b"a\xffb\n").unwrap();
        assert_eq!(proxy.console().plains(), ["a\u{fffd}b"]);
    }

    #[test]
    fn test_io_flush_flushes_console() {
        let mut proxy = proxy();
        write!(proxy, "partial").unwrap();
        proxy.flush().unwrap();
        assert_eq!(proxy.console().plains(), ["partial"]);
        assert_eq!(proxy.console().flushes, 1);
    }

    #[test]
    fn test_fmt_write() {
        let mut proxy = proxy();
        fmt::Write::write_fmt(&mut proxy, format_args!("{}-{}\n", 1, 2)).unwrap();
        assert_eq!(proxy.console().plains(), ["1-2"]);
    }

    #[test]
    fn test_read_and_seek_forward_to_stream() {
        let mut proxy = FileProxy::new(Recorder::default(), Cursor::new(b"stream".to_vec()));
        let mut buf = [0u8; 3];
        proxy.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"str");
        assert_eq!(proxy.seek(SeekFrom::Start(1)).unwrap(), 1);
        assert_eq!(proxy.get_ref().position(), 1);
    }

    #[test]
    fn test_into_parts() {
        let mut proxy = proxy();
        proxy.write_text("x\n").unwrap();
        let (recorder, file) = proxy.into_parts();
        assert_eq!(recorder.prints.len(), 1);
        assert!(file.get_ref().is_empty());
    }

    #[test]
    fn test_errors_propagate() {
        struct Broken;

        impl Renderer for Broken {
            fn print(&mut self, _: &Text, _: PrintOptions) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn enter(&mut self) {}
            fn exit(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut proxy = FileProxy::new(Broken, ());
        let err = proxy.write_text("x\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        proxy.write_text("y").unwrap();
        let err = proxy.flush_pending().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(proxy.has_pending());
    }

    #[test]
    fn test_through_real_console() {
        let config = ConsoleConfig {
            color_system: ColorChoice::Standard,
            width: Some(80),
            ..ConsoleConfig::default()
        };
        let mut console = Console::with_config(Vec::new(), config);
        {
            let mut proxy = FileProxy::new(&mut console, io::sink());
            proxy.write_text("[bold]x[/] \x1b[31mred\x1b[0m 42\n").unwrap();
            proxy.write_text("n=7").unwrap();
            proxy.flush_pending().unwrap();
        }
        let out = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(out, "[bold]x[/] \x1b[31mred\x1b[0m 42\nn=\x1b[1;36m7\x1b[0m\n");
    }

    /// Text the decoder passes through unchanged.
    const PRINTABLE: &str = "[ -~é日本]{0,16}";

    proptest! {
        #[test]
        fn prop_no_newline_is_buffered(prefix in "[^\n]*", text in "[^\n]*") {
            let mut proxy = proxy();
            proxy.write_text(&prefix).unwrap();
            let returned = proxy.write_text(&text).unwrap();

            prop_assert_eq!(returned, text.chars().count());
            prop_assert_eq!(proxy.pending().concat(), format!("{prefix}{text}"));
            prop_assert!(proxy.console().prints.is_empty());
        }

        #[test]
        fn prop_newlines_make_one_print(
            prefix in PRINTABLE,
            lines in prop::collection::vec(PRINTABLE, 1..6),
            tail in "[^\n]*",
        ) {
            let mut proxy = proxy();
            proxy.write_text(&prefix).unwrap();

            let input = format!("{}\n{tail}", lines.join("\n"));
            let returned = proxy.write_text(&input).unwrap();

            prop_assert_eq!(returned, tail.chars().count());
            prop_assert_eq!(proxy.console().prints.len(), 1);
            let mut expected = lines.clone();
            expected[0] = format!("{prefix}{}", lines[0]);
            prop_assert_eq!(proxy.console().prints[0].0.plain(), expected.join("\n"));
            prop_assert_eq!(proxy.pending().concat(), tail);
        }
    }
}
