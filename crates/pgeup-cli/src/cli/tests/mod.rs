//! CLI parse tests.

use super::{normalize_args, Cli};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    let args = normalize_args(args.iter().map(|a| a.to_string()));
    Cli::try_parse_from(args).unwrap()
}

mod flags;
mod report;
