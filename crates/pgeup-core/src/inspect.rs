//! Install-state inspection: is the latest bundle already in the archive dir?

use anyhow::{Context, Result};
use console::style;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::release::ReleaseInfo;

/// Result of comparing the latest release against the archive directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// The latest bundle is already archived and no reinstall was requested.
    UpToDate { bundle: String },
    /// The bundle should be (re)installed.
    Outdated {
        /// Archived file names, sorted.
        installed: Vec<String>,
        bundle: String,
    },
}

/// Non-directory entries of `archive_dir`, sorted by name.
///
/// Directories are unpacked tool installs, not archived bundles, so they are skipped.
pub fn installed_entries(archive_dir: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(archive_dir).with_context(|| format!("read dir {}", archive_dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read dir {}", archive_dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if file_type.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Compare the release's bundle against the archive directory.
pub fn compare(release: &ReleaseInfo, archive_dir: &Path, force: bool) -> Result<Comparison> {
    let bundle = release.bundle_name().to_string();
    let installed = installed_entries(archive_dir)?;
    if !force && !bundle.is_empty() && installed.iter().any(|name| *name == bundle) {
        return Ok(Comparison::UpToDate { bundle });
    }
    Ok(Comparison::Outdated { installed, bundle })
}

/// Operator-facing summary of what is installed and what will be installed.
pub fn format_versions(installed: &[String], bundle: &str) -> String {
    let mut out = String::from("Found the following installed last:\n");
    for name in installed {
        let _ = write!(out, "    {}", style(name).blue());
    }
    let _ = write!(
        out,
        "\nTo be downloaded and installed:\n    {}\n",
        style(bundle).green()
    );
    out
}
