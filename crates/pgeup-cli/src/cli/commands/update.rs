//! Default action: install or update GE-Proton.

use anyhow::Result;
use pgeup_core::config::Config;
use pgeup_core::http::CurlClient;
use pgeup_core::process::SystemRunner;
use pgeup_core::prompt::{Gate, TerminalKeys};
use pgeup_core::updater::{Outcome, UpdateOptions, Updater};

pub fn run_update(always_yes: bool, force: bool) -> Result<()> {
    tracing::info!(skip_confirmation = always_yes, "Updating/Installing proton-ge");

    let cfg = Config::load()?;
    tracing::debug!(
        archive_dir = %cfg.archive_dir().display(),
        compatibility_tools_dir = %cfg.compatibility_tools_dir().display(),
        home = %cfg.home_dir().display(),
        release_url = cfg.release_url(),
        "config loaded"
    );

    let options = UpdateOptions {
        force,
        report_installed: tracing::enabled!(tracing::Level::DEBUG),
    };
    let http = CurlClient::new();
    let gate = Gate::new(TerminalKeys::stdout(), always_yes);

    let outcome = Updater::new(&cfg, &http, &SystemRunner, gate, options).install_or_update()?;
    match outcome {
        Outcome::Declined | Outcome::Discarded => tracing::debug!("installation declined"),
        Outcome::UpToDate | Outcome::Installed { .. } => {}
    }
    Ok(())
}
