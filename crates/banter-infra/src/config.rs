//! Backend configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.banter/` in production)
//! and deserializes it into [`BackendConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use banter_types::config::BackendConfig;

/// The per-user data directory holding `config.toml` and the persisted
/// session token.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".banter"))
        .unwrap_or_else(|| PathBuf::from(".banter"))
}

/// Load backend configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`BackendConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_backend_config(data_dir: &Path) -> BackendConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return BackendConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return BackendConfig::default();
        }
    };

    match toml::from_str::<BackendConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BackendConfig::default()
        }
    }
}
