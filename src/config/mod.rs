use crate::constants::{self, env_vars};
use crate::data_fetcher::retry::RetryPolicy;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing sync settings.
///
/// Every field has a default so the tool can run unattended without a
/// config file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the stats API, without a trailing endpoint name.
    pub stats_base_url: String,
    /// Directory holding per-season tables, the ledger and the run log.
    pub data_dir: String,
    /// Directory holding the all-seasons tables.
    pub combined_dir: String,
    /// Path to the tracing log file. If not specified, logs go to a default location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests.
    pub http_timeout_seconds: u64,
    /// Season type passed to the game log endpoint, e.g. "Regular Season" or "Playoffs".
    pub season_type: String,
    /// Additional attempts after a failed request.
    pub max_retries: u32,
    /// Delay before the first retry, in seconds.
    pub initial_retry_delay_seconds: f64,
    /// Multiplier applied to the retry delay after every failed attempt.
    pub backoff_factor: f64,
    /// Pause after a category exhausted its retries, in seconds.
    pub failure_pause_seconds: f64,
    /// Pause between games, in milliseconds.
    pub game_pause_millis: u64,
    /// Pause before requesting the league schedule, in seconds.
    pub schedule_pause_seconds: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stats_base_url: constants::DEFAULT_STATS_BASE_URL.to_string(),
            data_dir: paths::get_default_data_dir(),
            combined_dir: paths::get_default_combined_dir(),
            log_file_path: None,
            http_timeout_seconds: constants::DEFAULT_HTTP_TIMEOUT_SECONDS,
            season_type: constants::DEFAULT_SEASON_TYPE.to_string(),
            max_retries: constants::retry::MAX_RETRIES,
            initial_retry_delay_seconds: constants::retry::INITIAL_DELAY_SECONDS,
            backoff_factor: constants::retry::BACKOFF_FACTOR,
            failure_pause_seconds: constants::pacing::FAILURE_PAUSE_SECONDS,
            game_pause_millis: constants::pacing::GAME_PAUSE_MILLIS,
            schedule_pause_seconds: constants::pacing::SCHEDULE_PAUSE_SECONDS,
        }
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

impl Config {
    /// Loads configuration from the default config file location.
    /// Falls back to defaults when no config file exists.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `NBA_SYNC_STATS_URL` - Override stats API base URL
    /// - `NBA_SYNC_DATA_DIR` - Override per-season data directory
    /// - `NBA_SYNC_COMBINED_DIR` - Override combined tables directory
    /// - `NBA_SYNC_LOG_FILE` - Override log file path
    /// - `NBA_SYNC_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies the `NBA_SYNC_*` environment overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(env_vars::STATS_URL) {
            self.stats_base_url = url;
        }

        if let Ok(dir) = std::env::var(env_vars::DATA_DIR) {
            self.data_dir = dir;
        }

        if let Ok(dir) = std::env::var(env_vars::COMBINED_DIR) {
            self.combined_dir = dir;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Retry policy wrapping every upstream call.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: seconds(self.initial_retry_delay_seconds),
            backoff_factor: self.backoff_factor,
        }
    }

    pub fn failure_pause(&self) -> Duration {
        seconds(self.failure_pause_seconds)
    }

    pub fn game_pause(&self) -> Duration {
        Duration::from_millis(self.game_pause_millis)
    }

    pub fn schedule_pause(&self) -> Duration {
        seconds(self.schedule_pause_seconds)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if !Path::new(&config_path).exists() {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
            println!("(Using defaults)");
        }

        let config = Config::load().await?;
        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        println!("────────────────────────────────────");
        println!("Stats API:");
        println!("{}", config.stats_base_url);
        println!("────────────────────────────────────");
        println!("Season Data Directory:");
        println!("{}", config.data_dir);
        println!("────────────────────────────────────");
        println!("Combined Data Directory:");
        println!("{}", config.combined_dir);
        println!("────────────────────────────────────");
        println!("Season Type:");
        println!("{}", config.season_type);
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Retries:");
        println!(
            "{} retries, {}s initial delay, x{} backoff",
            config.max_retries, config.initial_retry_delay_seconds, config.backoff_factor
        );
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{}", constants::LOG_FILE_NAME);
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and strips a trailing
    /// slash from the stats base URL.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let normalized = Config {
            stats_base_url: self.stats_base_url.trim_end_matches('/').to_string(),
            ..self.clone()
        };
        let content = toml::to_string_pretty(&normalized)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
data_dir = "/data/NBA/byYearData"
combined_dir = "/data/NBA/combinedData"
log_file_path = "/custom/log/path"
max_retries = 2
"#;
        tokio::fs::write(&config_path, config_content).await.unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.data_dir, "/data/NBA/byYearData");
        assert_eq!(config.combined_dir, "/data/NBA/combinedData");
        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        assert_eq!(config.max_retries, 2);
        // Unspecified fields fall back to defaults
        assert_eq!(config.stats_base_url, constants::DEFAULT_STATS_BASE_URL);
        assert_eq!(config.backoff_factor, constants::retry::BACKOFF_FACTOR);
    }

    #[tokio::test]
    async fn test_config_load_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "").await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let original_config = Config {
            stats_base_url: "https://stats.example.com/stats/".to_string(),
            data_dir: "/srv/nba/by_year".to_string(),
            log_file_path: Some("/custom/log/path".to_string()),
            ..Config::default()
        };
        original_config
            .save_to_path(&config_path_str)
            .await
            .unwrap();
        assert!(config_path.exists());

        let loaded_config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(loaded_config.stats_base_url, "https://stats.example.com/stats");
        assert_eq!(loaded_config.data_dir, "/srv/nba/by_year");
        assert_eq!(loaded_config.log_file_path, original_config.log_file_path);
    }

    #[test]
    fn test_config_without_log_file_path_serialization() {
        let config = Config::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();
        assert!(toml_string.contains("stats_base_url = \"https://stats.nba.com/stats\""));
        assert!(!toml_string.contains("log_file_path"));
    }

    #[tokio::test]
    async fn test_config_load_from_nonexistent_path() {
        let result = Config::load_from_path("/nonexistent/path/config.toml").await;
        assert!(matches!(result.unwrap_err(), AppError::Io(_)));
    }

    #[tokio::test]
    async fn test_config_malformed_toml_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("malformed_config.toml");

        let malformed_content = r#"
data_dir = "/data
[invalid_section
"#;
        tokio::fs::write(&config_path, malformed_content)
            .await
            .unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config {
            max_retries: 3,
            initial_retry_delay_seconds: 1.5,
            backoff_factor: 3.0,
            ..Config::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(1500));
        assert_eq!(policy.backoff_factor, 3.0);
    }

    #[test]
    fn test_pacing_durations() {
        let config = Config::default();
        assert_eq!(config.failure_pause(), Duration::from_secs(32));
        assert_eq!(config.game_pause(), Duration::from_millis(700));
        assert_eq!(config.schedule_pause(), Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var(env_vars::DATA_DIR, "/tmp/nba/by_year");
            std::env::set_var(env_vars::HTTP_TIMEOUT, "12");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var(env_vars::DATA_DIR);
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
        }

        assert_eq!(config.data_dir, "/tmp/nba/by_year");
        assert_eq!(config.http_timeout_seconds, 12);
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains(constants::APP_DIR_NAME));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let log_dir_path = Config::get_log_dir_path();
        assert!(log_dir_path.contains(constants::APP_DIR_NAME));
        assert!(log_dir_path.ends_with("logs"));
    }
}
