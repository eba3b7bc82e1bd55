//! Service Configuration
//!
//! Loaded from `crm.toml` (or the file named by `CRM_CONFIG`); every field
//! has a default, and `CRM_*` environment variables override the file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; `:memory:` keeps everything in RAM
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/crm.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub level: String,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
            max_files: rolling_logger::DEFAULT_MAX_FILES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Reject requests that carry no caller
    pub enabled: bool,
    pub user_header: String,
    pub team_header: String,
    /// Organization used when no caller is known
    pub fallback_org: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            user_header: "x-user-id".to_string(),
            team_header: "x-team-id".to_string(),
            fallback_org: "org_demo_123".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "failed to parse {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn config_path() -> PathBuf {
    std::env::var("CRM_CONFIG")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crm.toml"))
}

/// Configuration plus the overrides that were rejected while loading.
///
/// Loading happens before the logger exists, so warnings are handed back
/// for the caller to log once it is installed.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<String>,
}

pub fn load() -> Result<LoadedConfig, ConfigError> {
    load_from(&config_path())
}

/// Read `path` if present, then apply environment overrides.
pub fn load_from(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        Config::default()
    };
    let warnings = apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(LoadedConfig { config, warnings })
}

/// Apply `CRM_*` overrides obtained through `lookup`, returning a warning
/// for each value that was ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();
    let value = |key: &str| {
        lookup(key)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
    };

    if let Some(addr) = value("CRM_LISTEN_ADDR") {
        config.server.listen_addr = addr;
    }
    if let Some(path) = value("CRM_DB_PATH") {
        config.database.path = PathBuf::from(path);
    }
    if let Some(level) = value("CRM_LOG_LEVEL") {
        match rolling_logger::parse_level(&level) {
            Ok(_) => config.logging.level = level,
            Err(err) => warnings.push(format!("invalid CRM_LOG_LEVEL, ignoring: {}", err)),
        }
    }
    if let Some(enabled) = value("CRM_IDENTITY_ENABLED") {
        match enabled.parse::<bool>() {
            Ok(flag) => config.identity.enabled = flag,
            Err(err) => warnings.push(format!("invalid CRM_IDENTITY_ENABLED, ignoring: {}", err)),
        }
    }
    warnings
}
