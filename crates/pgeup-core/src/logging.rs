//! Logging init: console on stdout plus a log file under the XDG state dir,
//! with a console-only fallback.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Level names accepted on the command line.
pub const LEVEL_NAMES: &[&str] = &["trace", "debug", "info", "warn", "error", "fatal", "panic"];

/// Parse a level name. `fatal` and `panic` map to the error level.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Some(LevelFilter::ERROR),
        _ => None,
    }
}

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(std::fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(std::fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Path of the log file: `$XDG_STATE_HOME/pgeup/pgeup.log`
/// (`~/.local/state/pgeup/pgeup.log` by default).
pub fn log_file_path() -> Result<PathBuf> {
    // Unprefixed so the app dir is joined exactly once.
    let xdg_dirs = xdg::BaseDirectories::new()?;
    Ok(xdg_dirs.get_state_home().join("pgeup").join("pgeup.log"))
}

/// Initialize logging to stdout and to the log file at `level`.
/// `RUST_LOG`, when set, overrides `level`.
/// On failure (e.g. log dir unwritable), returns Err so the caller can fall back
/// to [`init_console_only`].
pub fn init_logging(level: LevelFilter) -> Result<PathBuf> {
    let log_file_path = log_file_path()?;
    if let Some(dir) = log_file_path.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    let writer: BoxMakeWriter = BoxMakeWriter::new(FileMakeWriter(file));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(false)
        .without_time();
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console)
        .with(file_layer)
        .init();

    tracing::trace!("pgeup logging initialized at {}", log_file_path.display());

    Ok(log_file_path)
}

/// Initialize logging to stdout only. Use when [`init_logging`] fails so the CLI doesn't crash.
pub fn init_console_only(level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(io::stdout)
        .with_target(false)
        .without_time()
        .init();
}
