//! Tests for the update flags.

use super::parse;
use crate::cli::Cli;
use clap::Parser;
use clap_complete::Shell;

#[test]
fn cli_parse_defaults() {
    let cli = parse(&["pgeup"]);
    assert!(!cli.yes);
    assert!(!cli.force);
    assert_eq!(cli.level, "info");
    assert!(cli.completions.is_none());
    assert!(!cli.man);
}

#[test]
fn cli_parse_yes_and_force() {
    let cli = parse(&["pgeup", "-y", "-force"]);
    assert!(cli.yes);
    assert!(cli.force);

    let cli = parse(&["pgeup", "--force"]);
    assert!(cli.force);
    assert!(!cli.yes);
}

#[test]
fn cli_parse_explicit_bool_values() {
    let cli = parse(&["pgeup", "-force=false", "-y=true"]);
    assert!(!cli.force);
    assert!(cli.yes);

    let cli = parse(&["pgeup", "--force=true", "-y=false"]);
    assert!(cli.force);
    assert!(!cli.yes);
}

#[test]
fn cli_bool_flags_do_not_take_a_separate_value() {
    // Like Go's flag package, a bool value must be attached with `=`.
    assert!(Cli::try_parse_from(["pgeup", "--force", "false"]).is_err());
    assert!(Cli::try_parse_from(["pgeup", "--force=maybe"]).is_err());
}

#[test]
fn cli_parse_log_level() {
    assert_eq!(parse(&["pgeup", "-l", "debug"]).level, "debug");
    assert_eq!(parse(&["pgeup", "--log-level=trace"]).level, "trace");
    assert_eq!(parse(&["pgeup", "-log-level", "warn"]).level, "warn");
}

#[test]
fn cli_parse_unknown_level_is_left_for_usage() {
    // Validation happens after parsing so an invalid level prints usage and exits 0.
    let cli = parse(&["pgeup", "-l", "loud"]);
    assert_eq!(cli.level, "loud");
    assert!(pgeup_core::logging::parse_level(&cli.level).is_none());
}

#[test]
fn cli_parse_completions() {
    let cli = parse(&["pgeup", "--completions", "bash"]);
    assert_eq!(cli.completions, Some(Shell::Bash));
    let cli = parse(&["pgeup", "-completions", "zsh"]);
    assert_eq!(cli.completions, Some(Shell::Zsh));
}

#[test]
fn cli_parse_man() {
    assert!(parse(&["pgeup", "-man"]).man);
}

#[test]
fn cli_rejects_unknown_flags() {
    assert!(Cli::try_parse_from(["pgeup", "--bogus"]).is_err());
}
