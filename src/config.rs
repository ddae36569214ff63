use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use crate::models::StatusLog;

const CONFIG_PATH: &str = "Config.toml";

pub async fn load_config() -> anyhow::Result<Config> {
    let contents = fs::read_to_string(CONFIG_PATH).await?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    pub bind: String,
}

#[derive(Clone, Deserialize)]
pub struct ServiceConfig {
    pub label: String,
    pub endpoint: String,
}

#[derive(Clone, Deserialize)]
pub struct StatusConfig {
    pub log: String,
    pub services: Vec<ServiceConfig>,
}

#[derive(Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub status: StatusConfig,
}

/// Loads the curated status log. A missing or unreadable document is not an
/// error: the engine falls back to an empty log that shows nothing.
pub async fn load_status_log(path: &str) -> StatusLog {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path, error = %err, "status log unavailable, using empty defaults");
            return StatusLog::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(log) => log,
        Err(err) => {
            warn!(path, error = %err, "status log malformed, using empty defaults");
            StatusLog::default()
        }
    }
}
