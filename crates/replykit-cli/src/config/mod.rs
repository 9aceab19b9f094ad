//! Data folder resolution and configuration loading for the CLI
//!
//! The data folder holds `config.toml`, `storage.json` and `debug.log`.

use replykit_core::{AssistantConfig, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the data folder
pub const ENV_FOLDER: &str = "REPLYKIT_FOLDER";
/// Config file name inside the data folder
pub const CONFIG_FILE: &str = "config.toml";

/// Get the data folder path.
///
/// Priority: explicit `--data-dir`, then `REPLYKIT_FOLDER`, then `~/.replykit`.
///
/// # Errors
/// Returns an error if no override is given and the home directory is unknown.
pub fn data_folder(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    match env::var_os(ENV_FOLDER) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => AssistantConfig::config_dir(),
    }
}

/// Load `config.toml` from `data_dir`, creating it with defaults if missing.
///
/// Broken config files are logged and replaced by defaults for this run.
/// Environment overrides are applied in both cases.
pub fn load_config(data_dir: &Path) -> AssistantConfig {
    let path = data_dir.join(CONFIG_FILE);
    AssistantConfig::load_or_create_at(&path)
        .unwrap_or_else(|error| {
            warn!("Failed to load config from {}: {error}", path.display());
            warn!("Using default configuration");
            AssistantConfig::default()
        })
        .with_env_overrides()
}
