//! Client configuration loader.
//!
//! Reads `jyotish.toml` from the given directory and deserializes it into
//! [`ClientConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::Path;

use jyotish_types::config::ClientConfig;

/// Load client configuration from `{dir}/jyotish.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
pub async fn load_client_config(dir: &Path) -> ClientConfig {
    let config_path = dir.join("jyotish.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no jyotish.toml at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}
