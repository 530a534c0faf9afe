//! proxy-cat: copy stdin to stdout through a `FileProxy` and `Console`.
//!
//! Escape sequences in the input are decoded and re-rendered for the
//! terminal's color system, and long lines are folded to its width.
//!
//! ```text
//! ls --color=always | proxy-cat --color-system 256
//! ```

use clap::Parser;
use fileproxy::{ColorChoice, Console, ConsoleConfig, FileProxy};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Copy stdin to stdout through a styled console.
#[derive(Debug, Parser)]
#[command(name = "proxy-cat", version, about)]
struct Args {
    /// Color system: auto, none, standard, 256 or truecolor
    #[arg(long, value_name = "SYSTEM")]
    color_system: Option<ColorChoice>,

    /// Fold lines to this many columns
    #[arg(long)]
    width: Option<usize>,

    /// Leave long lines for the terminal to wrap
    #[arg(long)]
    soft_wrap: bool,

    /// JSON console configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bytes read from stdin per write
    #[arg(long, default_value_t = 4096)]
    chunk_size: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ConsoleConfig::from_json_file(path)?,
        None => ConsoleConfig::default(),
    };
    if let Some(color_system) = args.color_system {
        config.color_system = color_system;
    }
    if let Some(width) = args.width {
        config.width = Some(width);
    }
    if args.soft_wrap {
        config.soft_wrap = true;
    }

    let mut console = Console::stdout_with_config(config);
    debug!(
        color_system = ?console.color_system(),
        width = console.width(),
        "console ready"
    );

    let mut proxy = FileProxy::new(&mut console, io::stdout());
    debug!(is_terminal = proxy.is_terminal(), "proxying stdin");

    let mut stdin = io::stdin().lock();
    let mut chunk = vec![0u8; args.chunk_size.max(1)];
    loop {
        let read = match stdin.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        proxy.write_all(&chunk[..read])?;
    }
    proxy.flush()?;
    Ok(())
}
