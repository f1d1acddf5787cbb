//! Install-or-update orchestration.
//!
//! Init → fetch release info → compare → confirm → download & verify →
//! confirm → install → report. Every failure ends the run; nothing is retried.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::fetch;
use crate::http::HttpClient;
use crate::inspect::{self, Comparison};
use crate::install;
use crate::process::CommandRunner;
use crate::prompt::{Gate, KeySource};
use crate::release;

/// Run flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Reinstall even if the latest bundle is already archived.
    pub force: bool,
    /// List the compatibility-tools dir after installing.
    pub report_installed: bool,
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Latest bundle already archived; nothing downloaded.
    UpToDate,
    /// Operator declined before anything was downloaded.
    Declined,
    /// Operator declined after download; downloaded files were deleted.
    Discarded,
    Installed { bundle: String },
}

pub struct Updater<'a, K> {
    config: &'a Config,
    http: &'a dyn HttpClient,
    runner: &'a dyn CommandRunner,
    gate: Gate<K>,
    options: UpdateOptions,
}

impl<'a, K: KeySource> Updater<'a, K> {
    pub fn new(
        config: &'a Config,
        http: &'a dyn HttpClient,
        runner: &'a dyn CommandRunner,
        gate: Gate<K>,
        options: UpdateOptions,
    ) -> Self {
        Self {
            config,
            http,
            runner,
            gate,
            options,
        }
    }

    /// Install GE-Proton for the first time, or update it if a new release is out.
    pub fn install_or_update(&mut self) -> Result<Outcome> {
        self.config
            .ensure_dirs()
            .context("initialize directories")?;

        let release = release::fetch_latest(self.http, self.config.release_url())?;

        let comparison =
            inspect::compare(&release, self.config.archive_dir(), self.options.force)
                .context("display versions")?;
        match comparison {
            Comparison::UpToDate { bundle } => {
                tracing::debug!(bundle = %bundle, "latest bundle already archived");
                tracing::info!("Already up-to-date!");
                return Ok(Outcome::UpToDate);
            }
            Comparison::Outdated { installed, bundle } => {
                print!("{}", inspect::format_versions(&installed, &bundle));
            }
        }

        if !self
            .gate
            .confirm("Would you like to continue with installation?", true)
        {
            return Ok(Outcome::Declined);
        }

        tracing::info!("Downloading latest proton-ge release...");
        let downloaded =
            fetch::fetch_and_verify(self.http, self.runner, &release, self.config.work_dir())?;

        let bundle = release.bundle_name().to_string();
        let question = format!("Would you like to install {}?", style(&bundle).green());
        if !self.gate.confirm(&question, true) {
            tracing::info!("Cleaning up...");
            discard(&downloaded)?;
            return Ok(Outcome::Discarded);
        }

        tracing::info!("Installing latest Proton-GE");
        install::install(self.runner, self.config, &bundle, release.manifest_name())?;

        tracing::info!("Installed, please restart Steam");
        if self.options.report_installed {
            self.report_installed();
        }

        Ok(Outcome::Installed { bundle })
    }

    /// Debug listing of the compatibility-tools dir. The install already
    /// succeeded, so a read failure only warns.
    fn report_installed(&self) {
        let dir = self.config.compatibility_tools_dir();
        match fs::read_dir(dir) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                tracing::debug!(installed = ?names, "compatibility tools");
            }
            Err(e) => {
                tracing::warn!(path = %dir.display(), "could not list compatibility tools: {}", e);
            }
        }
    }
}

/// Delete every downloaded file. Any failure is fatal.
fn discard(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
        tracing::debug!(path = %path.display(), "deleted file");
    }
    Ok(())
}
