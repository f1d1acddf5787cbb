//! CLI for pgeup.

mod commands;

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use std::io::Write;
use clap_complete::Shell;
use pgeup_core::logging;

use commands::{print_completions, print_man, run_update};

/// Long flags that may also be spelled with a single dash (`-force`).
const SINGLE_DASH_LONG: &[&str] = &["force", "log-level", "completions", "man"];

/// Install or update GE-Proton for Steam.
#[derive(Debug, Parser)]
#[command(name = "pgeup", version)]
#[command(about = "Install or update GE-Proton for Steam", long_about = None)]
pub struct Cli {
    /// Skip confirmations.
    #[arg(
        short = 'y',
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL"
    )]
    pub yes: bool,

    /// Force download even when up-to-date.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL"
    )]
    pub force: bool,

    /// Log level (trace, debug, info, warn, error, fatal, panic).
    #[arg(short = 'l', long = "log-level", default_value = "info", value_name = "LEVEL")]
    pub level: String,

    /// Print a shell completion script and exit.
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Print a man page and exit.
    #[arg(long)]
    pub man: bool,
}

/// Rewrite Go-style `-force` / `-force=false` / `-log-level=x` into their `--`
/// spelling. Arguments after a bare `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for arg in args {
        if passthrough || arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let rewritten = arg
            .strip_prefix('-')
            .filter(|rest| !rest.starts_with('-'))
            .filter(|rest| {
                let name = rest.split('=').next().unwrap_or("");
                SINGLE_DASH_LONG.contains(&name)
            })
            .map(|rest| format!("--{}", rest));
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }
    if cli.man {
        return print_man();
    }

    let Some(level) = logging::parse_level(&cli.level) else {
        // Unknown level: show usage and exit cleanly.
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Err(e) = logging::init_logging(level) {
        logging::init_console_only(level);
        tracing::debug!("log file unavailable, logging to stdout only: {:#}", e);
    }

    run_update(cli.yes, cli.force)
}

/// Print a fatal error once, on `out`.
pub fn report_failure(err: &anyhow::Error, out: &mut dyn Write) {
    let _ = writeln!(out, "pgeup error: {:#}", err);
}

#[cfg(test)]
mod tests;
