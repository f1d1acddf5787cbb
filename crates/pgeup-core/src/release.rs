//! Release index client: latest GE-Proton release metadata.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http::HttpClient;

/// Substring identifying the installable bundle.
pub const BUNDLE_PATTERN: &str = "tar.gz";
/// Substring identifying the checksum manifest.
pub const MANIFEST_PATTERN: &str = "sha512sum";

/// One downloadable file of a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// Latest-release document. Only the fields pgeup needs are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl ReleaseInfo {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).context("decode response")
    }

    /// Names of every asset, in listed order.
    pub fn file_names(&self) -> Vec<&str> {
        self.assets.iter().map(|a| a.name.as_str()).collect()
    }

    /// File name of the tar ball, or `""` if the release has none.
    pub fn bundle_name(&self) -> &str {
        self.find_name(BUNDLE_PATTERN)
    }

    /// File name of the sha512sum manifest, or `""` if the release has none.
    pub fn manifest_name(&self) -> &str {
        self.find_name(MANIFEST_PATTERN)
    }

    fn find_name(&self, containing: &str) -> &str {
        self.assets
            .iter()
            .find(|a| a.name.contains(containing))
            .map(|a| a.name.as_str())
            .unwrap_or("")
    }
}

/// Download and decode the release document at `url`.
pub fn fetch_latest(http: &dyn HttpClient, url: &str) -> Result<ReleaseInfo> {
    tracing::trace!(url, "downloading latest release info");
    let body = http.fetch(url).context("download release info")?;
    let release = ReleaseInfo::from_json(&body).context("download release info")?;
    if let Some(tag) = &release.tag_name {
        tracing::debug!(tag = %tag, assets = release.assets.len(), "latest release");
    }
    Ok(release)
}
