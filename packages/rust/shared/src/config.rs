//! Application configuration for sitepages.
//!
//! User config lives at `~/.sitepages/sitepages.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitepages.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitepages";

// ---------------------------------------------------------------------------
// Config structs (matching sitepages.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Document store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// First-party API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Runtime mode settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the document database.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "~/.sitepages/site.db".into()
}

impl StoreConfig {
    /// Resolve `database_path`, expanding a leading `~/` to the home directory.
    pub fn resolved_database_path(&self) -> Result<PathBuf> {
        match self.database_path.strip_prefix("~/") {
            Some(rest) => {
                let home = dirs::home_dir()
                    .ok_or_else(|| SiteError::config("could not determine home directory"))?;
                Ok(home.join(rest))
            }
            None => Ok(PathBuf::from(&self.database_path)),
        }
    }
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host used when the inbound request carries no host header.
    #[serde(default = "default_host")]
    pub default_host: String,

    /// Path of the faculty listing endpoint.
    #[serde(default = "default_faculty_path")]
    pub faculty_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_host: default_host(),
            faculty_path: default_faculty_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "localhost:3000".into()
}
fn default_faculty_path() -> String {
    "/api/faculty".into()
}
fn default_timeout_secs() -> u64 {
    10
}

/// `[runtime]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Development or production.
    #[serde(default)]
    pub mode: RuntimeMode,
}

/// Deployment mode. Development is the only mode that talks plain HTTP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Development,
    #[default]
    Production,
}

impl RuntimeMode {
    /// URL scheme for same-origin API calls.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Development => "http",
            Self::Production => "https",
        }
    }
}

impl FromStr for RuntimeMode {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(SiteError::config(format!(
                "unknown runtime mode '{other}': expected 'development' or 'production'"
            ))),
        }
    }
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitepages/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| SiteError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitepages/sitepages.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SiteError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SiteError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| SiteError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SiteError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
