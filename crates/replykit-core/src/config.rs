//! Configuration for the chat endpoint and the local history.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::{Error, Result};

/// Default chat-completions endpoint of the hosted integration.
pub const DEFAULT_ENDPOINT: &str =
    "https://api-integrations.appmiaoda.com/app-8q45es7vhxq9/api-Xa6JZMByJlDa/v2/chat/completions";
/// Seconds to wait for the first content of a reply.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
/// Number of history items kept.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Env var overriding the application id.
pub const ENV_APP_ID: &str = "REPLYKIT_APP_ID";
/// Env var overriding the API key.
pub const ENV_API_KEY: &str = "REPLYKIT_API_KEY";
/// Env var overriding the endpoint URL.
pub const ENV_ENDPOINT: &str = "REPLYKIT_ENDPOINT";

/// Complete assistant configuration.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Chat endpoint settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Local history settings
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Full URL of the streaming chat-completions endpoint
    pub endpoint: String,
    /// Application id sent as `X-App-Id`
    pub app_id: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    /// Optional model name forwarded in the request body
    pub model: Option<String>,
    /// Seconds to wait for the first streamed content
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            app_id: String::new(),
            api_key: None,
            model: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ApiConfig {
    /// Timeout as a `Duration`.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Local history settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of items kept, newest first
    pub max_items: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_HISTORY,
        }
    }
}

impl AssistantConfig {
    /// Get the default config directory path (`~/.replykit`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".replykit"))
    }

    /// Load config from `path`, writing defaults there first if missing.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or written
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            let config = Self::default();
            config.save_to_file(path)?;
            info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("Failed to read config: {error}")))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Reply assistant configuration\n\
                      # This file is automatically generated on first run\n\
                      # Environment variables REPLYKIT_APP_ID, REPLYKIT_API_KEY and\n\
                      # REPLYKIT_ENDPOINT take precedence over the values below\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| Error::Config(format!("Failed to write config: {error}")))
    }

    /// Applies `REPLYKIT_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(app_id) = env::var(ENV_APP_ID) {
            self.api.app_id = app_id;
        }
        if let Ok(api_key) = env::var(ENV_API_KEY) {
            self.api.api_key = Some(api_key);
        }
        if let Ok(endpoint) = env::var(ENV_ENDPOINT) {
            self.api.endpoint = endpoint;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AssistantConfig::default();
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.history.max_items, 50);
        assert!(config.api.api_key.is_none());
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let created = AssistantConfig::load_or_create_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, AssistantConfig::default());

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Reply assistant configuration"));
        assert!(contents.contains("[api]"));

        let reloaded = AssistantConfig::load_or_create_at(&path).unwrap();
        assert_eq!(reloaded, created);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[api]\napp_id = \"app-1\"\ntimeout_seconds = 5\n").unwrap();

        let config = AssistantConfig::load_from_file(&path).unwrap();
        assert_eq!(config.api.app_id, "app-1");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.history.max_items, DEFAULT_MAX_HISTORY);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[api\n").unwrap();

        let result = AssistantConfig::load_from_file(&path);
        assert!(matches!(result, Err(Error::Toml(_))));
    }
}
