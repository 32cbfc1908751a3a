//! Configuration management (config.toml)
//!
//! Settings are stored in TOML format in the platform-specific config
//! directory. A file given with `--config` replaces the default location.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::image_format::StorageFormat;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Drum-machine service settings
    #[serde(default)]
    pub service: ServiceConfig,
    /// Image handling settings
    #[serde(default)]
    pub image: ImageConfig,
}

/// Drum-machine service endpoint and request headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Site root (default: https://www.onemotion.com)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Share endpoint path, used both to share and to look up projects
    #[serde(default = "default_share_path")]
    pub share_path: String,
    /// `Origin` header sent with every request
    #[serde(default = "default_origin")]
    pub origin: String,
    /// `Referer` header sent with every request
    #[serde(default = "default_referer")]
    pub referer: String,
    /// `User-Agent` header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Image handling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImageConfig {
    /// Format images are re-encoded to before storing (default: png)
    #[serde(default)]
    pub format: StorageFormat,
}

fn default_base_url() -> String {
    "https://www.onemotion.com".to_string()
}
fn default_share_path() -> String {
    "/drum-machine/share_as_link.php".to_string()
}
fn default_origin() -> String {
    "https://www.onemotion.com".to_string()
}
fn default_referer() -> String {
    "https://www.onemotion.com/drum-machine/".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            share_path: default_share_path(),
            origin: default_origin(),
            referer: default_referer(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Full URL of the share endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.share_path)
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Blastbeat\config`
/// On macOS: `~/Library/Application Support/io.blastbeat.Blastbeat`
/// On Linux: `~/.config/blastbeat`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.blastbeat", "", "Blastbeat")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration.
///
/// With an explicit path the file must exist and parse. Otherwise
/// `config.toml` is read from [`config_dir`], falling back to defaults if it
/// is missing or cannot be parsed.
pub fn load(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_file(path),
        None => Ok(load_default()),
    }
}

fn load_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn load_default() -> Config {
    config_dir()
        .and_then(|dir| std::fs::read_to_string(dir.join("config.toml")).ok())
        .and_then(|content| toml::from_str(&content).ok())
        .unwrap_or_default()
}
