//! Configuration types for the homework watcher
//!
//! Non-secret settings come from an optional JSON file; secrets always come from
//! the environment (see [`crate::credentials`]).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Grading API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Treat a response without `current_date` as malformed
    #[serde(default)]
    pub require_current_date: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            require_current_date: false,
        }
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_base_url")]
    pub api_base_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_telegram_api_base_url(),
        }
    }
}

/// Which homework records of a response get turned into messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkSelection {
    /// Every record in the response, in response order
    #[default]
    All,
    /// Only the first record, which the API reports as the most recent
    Latest,
}

/// Polling loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_period")]
    pub retry_period_seconds: u64,
    #[serde(default)]
    pub homeworks: HomeworkSelection,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_period_seconds: default_retry_period(),
            homeworks: HomeworkSelection::default(),
        }
    }
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> u64 {
    600
}

fn default_timeout() -> u64 {
    30
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::WatcherError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content).map_err(|e| {
        crate::WatcherError::Config(format!("Failed to parse config file {:?}: {}", path, e))
    })?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reject values that would make the watcher spin or never finish a request
    pub fn validate(&self) -> crate::Result<()> {
        if self.polling.retry_period_seconds == 0 {
            return Err(crate::WatcherError::Config(
                "polling.retry_period_seconds must be at least 1".to_string(),
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(crate::WatcherError::Config(
                "http.timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
