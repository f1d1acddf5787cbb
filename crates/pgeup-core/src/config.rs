use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// GitHub endpoint describing the latest GE-Proton release.
pub const DEFAULT_RELEASE_URL: &str =
    "https://api.github.com/repos/GloriousEggroll/proton-ge-custom/releases/latest";

/// Overrides the archive directory.
pub const ENV_ARCHIVE_DIR: &str = "PROTON_GE_ARCHIVE";
/// Overrides the directory Steam scans for compatibility tools.
pub const ENV_COMPATIBILITY_TOOLS_DIR: &str = "COMPATIBILITY_TOOLS_DIR";
/// Overrides the release index URL.
pub const ENV_RELEASE_URL: &str = "PGEUP_RELEASE_URL";
pub const ENV_HOME: &str = "HOME";

const ARCHIVE_SUBDIR: &str = ".local/proton-ge";
const COMPATIBILITY_TOOLS_SUBDIR: &str = ".steam/root/compatibilitytools.d";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not find home directory ($HOME is not set)")]
    MissingHome,
}

/// Optional settings loaded from `~/.config/pgeup/config.toml`.
///
/// Every key is optional; environment variables take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub archive_dir: Option<PathBuf>,
    #[serde(default)]
    pub compatibility_tools_dir: Option<PathBuf>,
    #[serde(default)]
    pub release_url: Option<String>,
}

impl Settings {
    /// Path of the settings file under the XDG config dir, if one exists.
    pub fn default_path() -> Result<Option<PathBuf>> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("pgeup")?;
        Ok(xdg_dirs.find_config_file("config.toml"))
    }

    /// Load the settings file if present. A missing file yields empty settings.
    pub fn load_default() -> Result<Self> {
        match Self::default_path()? {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let settings: Settings =
            toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }
}

/// Paths and endpoints for one run. Built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    archive_dir: PathBuf,
    compatibility_tools_dir: PathBuf,
    home_dir: PathBuf,
    work_dir: PathBuf,
    release_url: String,
}

impl Config {
    /// Resolve configuration from the process environment, the optional
    /// settings file and the current directory.
    pub fn load() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        if non_empty(lookup(ENV_HOME)).is_none() {
            return Err(ConfigError::MissingHome.into());
        }
        let settings = Settings::load_default().context("load settings file")?;
        let work_dir = std::env::current_dir().context("resolve current directory")?;
        Ok(Self::from_lookup(lookup, &settings, work_dir)?)
    }

    /// Resolve configuration from an arbitrary variable lookup.
    ///
    /// Precedence per path: environment variable, then settings file, then the
    /// default under `$HOME`.
    pub fn from_lookup<F>(
        lookup: F,
        settings: &Settings,
        work_dir: PathBuf,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home_dir = non_empty(lookup(ENV_HOME))
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingHome)?;

        let archive_dir = non_empty(lookup(ENV_ARCHIVE_DIR))
            .map(|s| trim_trailing_slash(&s))
            .or_else(|| settings.archive_dir.as_deref().map(trim_path))
            .unwrap_or_else(|| home_dir.join(ARCHIVE_SUBDIR));

        let compatibility_tools_dir = non_empty(lookup(ENV_COMPATIBILITY_TOOLS_DIR))
            .map(|s| trim_trailing_slash(&s))
            .or_else(|| settings.compatibility_tools_dir.as_deref().map(trim_path))
            .unwrap_or_else(|| home_dir.join(COMPATIBILITY_TOOLS_SUBDIR));

        let release_url = non_empty(lookup(ENV_RELEASE_URL))
            .or_else(|| settings.release_url.clone())
            .unwrap_or_else(|| DEFAULT_RELEASE_URL.to_string());

        Ok(Self {
            archive_dir,
            compatibility_tools_dir,
            home_dir,
            work_dir,
            release_url,
        })
    }

    /// Directory keeping downloaded bundles; its file names mark what is installed.
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    pub fn compatibility_tools_dir(&self) -> &Path {
        &self.compatibility_tools_dir
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Directory assets are downloaded into before installation.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn release_url(&self) -> &str {
        &self.release_url
    }

    /// Create the archive and compatibility-tools directories if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        create_if_missing(&self.archive_dir).context("create archive dir")?;
        create_if_missing(&self.compatibility_tools_dir)
            .context("create compatibility tools dir")?;
        Ok(())
    }
}

fn create_if_missing(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| format!("mkdir {}", path.display()))?;
        tracing::debug!(path = %path.display(), "created directory");
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn trim_trailing_slash(s: &str) -> PathBuf {
    let trimmed = s.trim_end_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(trimmed)
    }
}

fn trim_path(p: &Path) -> PathBuf {
    trim_trailing_slash(&p.to_string_lossy())
}
