//! Fetch & verify: download every release asset, then check the bundle with `sha512sum -c`.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::http::HttpClient;
use crate::process::{CommandRunner, ToolCommand, ToolError};
use crate::release::{ReleaseInfo, MANIFEST_PATTERN};

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// An asset name that cannot be used as a plain file name.
#[derive(Debug, thiserror::Error)]
#[error("unsafe asset name {name:?}: {reason}")]
pub struct AssetNameError {
    pub name: String,
    pub reason: &'static str,
}

/// Asset names come from the network and become local paths, so they must be
/// a single path component. Names are rejected rather than rewritten since the
/// manifest refers to them verbatim.
pub fn validate_asset_name(name: &str) -> Result<(), AssetNameError> {
    let reason = if name.is_empty() {
        Some("empty")
    } else if name == "." || name == ".." {
        Some("relative path component")
    } else if name.contains('/') || name.contains('\\') {
        Some("contains a path separator")
    } else if name.chars().any(|c| c == '\0' || c.is_control()) {
        Some("contains control characters")
    } else if name.len() > NAME_MAX {
        Some("longer than 255 bytes")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(AssetNameError {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Download every asset of `release` into `work_dir`, one at a time in listed
/// order. Returns the written paths. The first failure aborts; files already
/// written are left in place.
pub fn download_assets(
    http: &dyn HttpClient,
    release: &ReleaseInfo,
    work_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(release.assets.len());
    for asset in &release.assets {
        validate_asset_name(&asset.name)?;
        tracing::debug!(name = %asset.name, "downloading...");

        let path = work_dir.join(&asset.name);
        tracing::trace!(path = %path.display(), "creating file");
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut out = BufWriter::new(file);

        tracing::trace!(url = %asset.download_url, "downloading file contents");
        let n = http
            .download(&asset.download_url, &mut out)
            .with_context(|| format!("get {}", asset.download_url))?;
        out.flush()
            .with_context(|| format!("write {}", path.display()))?;
        tracing::trace!(bytes = n, "copied response body");

        written.push(path);
    }
    Ok(written)
}

/// Run `sha512sum -c <manifest>` inside `work_dir`.
///
/// On failure the tool's output is printed before the error is returned.
pub fn verify_checksums(runner: &dyn CommandRunner, work_dir: &Path, manifest: &str) -> Result<()> {
    if manifest.is_empty() {
        anyhow::bail!("no {} asset in release", MANIFEST_PATTERN);
    }
    let cmd = ToolCommand::new("sha512sum")
        .arg("-c")
        .arg(manifest)
        .current_dir(work_dir);
    match runner.run(&cmd) {
        Ok(output) => {
            tracing::debug!(output = %output.trim_end(), "checksum verified");
            Ok(())
        }
        Err(e) => {
            if let Some(tool) = e.downcast_ref::<ToolError>() {
                println!("{}", tool.output);
            }
            Err(e).context("verify checksum")
        }
    }
}

/// Download all assets and verify the bundle against the manifest.
pub fn fetch_and_verify(
    http: &dyn HttpClient,
    runner: &dyn CommandRunner,
    release: &ReleaseInfo,
    work_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let written = download_assets(http, release, work_dir)?;
    verify_checksums(runner, work_dir, release.manifest_name())?;
    Ok(written)
}
