use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context as _;
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct LogArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Write logs to this file instead of stderr
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
}

/// Where log lines go when no log file is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fallback {
    Stderr,
    /// The terminal belongs to the TUI; drop log lines.
    Discard,
}

fn level_from_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("Failed to create log file: {}", path.display()))
}

pub(crate) fn init(args: &LogArgs, fallback: Fallback) -> anyhow::Result<()> {
    let level = level_from_verbosity(args.verbose);

    let file_layer = match &args.log_file {
        Some(path) => Some(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };
    let stderr_layer = (args.log_file.is_none() && fallback == Fallback::Stderr)
        .then(|| fmt::layer().with_target(false).with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(LevelFilter::from_level(level))
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing::debug!(%level, "logging initialized");
    Ok(())
}
