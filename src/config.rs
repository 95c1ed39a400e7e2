use crate::constants::{DEFAULT_CHAT_PATH, DEFAULT_ENDPOINT, DEFAULT_EXAMPLE_QUERIES};
use crate::errors::{CatalogChatError, CatalogChatResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog assistant backend.
    pub endpoint: String,
    pub chat_path: String,
    pub log_level: String,
    pub log_dir: PathBuf,
    /// Questions offered on F1 onwards, in order.
    pub example_queries: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            log_level: "info".to_string(),
            log_dir: config_dir()
                .map(|dir| dir.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs")),
            example_queries: DEFAULT_EXAMPLE_QUERIES
                .iter()
                .map(|q| q.to_string())
                .collect(),
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Loads `~/.config/catalog-chat/config.json` into the global config,
/// writing the defaults there first if the file does not exist.
pub fn initialize_config() -> CatalogChatResult<()> {
    let config_path = get_config_path()?;

    let config = if config_path.exists() {
        load_config_from(&config_path)?
    } else {
        let config = Config::default();
        save_config_to(&config, &config_path)?;
        config
    };

    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = config;
    Ok(())
}

/// Reads and validates a config file.
pub fn load_config_from(path: &Path) -> CatalogChatResult<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| CatalogChatError::config_error(format!("Failed to read config file: {}", e)))?;

    let config: Config = serde_json::from_str(&config_str)
        .map_err(|e| CatalogChatError::config_error(format!("Failed to parse config: {}", e)))?;

    validate_config(&config)?;
    Ok(config)
}

pub fn save_config_to(config: &Config, path: &Path) -> CatalogChatResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CatalogChatError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(config)
        .map_err(|e| CatalogChatError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, config_str)
        .map_err(|e| CatalogChatError::config_error(format!("Failed to write config file: {}", e)))
}

fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("catalog-chat"))
}

fn get_config_path() -> CatalogChatResult<PathBuf> {
    config_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or_else(|| CatalogChatError::config_error("Could not determine home directory"))
}

pub fn validate_config(config: &Config) -> CatalogChatResult<()> {
    let endpoint = config.endpoint.trim();
    if endpoint.is_empty() {
        return Err(CatalogChatError::config_error("Endpoint is required"));
    }

    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(CatalogChatError::config_error(
            "Endpoint must start with http:// or https://",
        ));
    }

    if config.chat_path.trim().is_empty() {
        return Err(CatalogChatError::config_error("Chat path is required"));
    }

    if !LOG_LEVELS.contains(&config.log_level.to_ascii_lowercase().as_str()) {
        return Err(CatalogChatError::config_error(format!(
            "Unknown log level '{}'",
            config.log_level
        )));
    }

    Ok(())
}

pub fn get_config() -> Config {
    CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
