//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use floe::FloeError;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for FloeError {
    fn from(err: ConfigError) -> Self {
        FloeError::Io(std::io::Error::other(err.to_string()))
    }
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the modeling service API.
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "ApiConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    fn default_base_url() -> String {
        floe::store::DEFAULT_BASE_URL.to_string()
    }

    fn default_timeout_secs() -> u64 {
        30
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (floe/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, FloeError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("floe/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "floeworks", "floe") {
        let system_config = proj_dirs.config_dir().join("config.toml");
        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(&system_config);
        }
    }

    // 4. Fall back to defaults
    debug!("No configuration file found, using defaults");
    Ok(AppConfig::default())
}

fn load_config_file(path: &Path) -> Result<AppConfig, FloeError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let contents = fs::read_to_string(path)?;
    let config =
        toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
    Ok(config)
}
