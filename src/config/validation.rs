use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Stats base URL cannot be empty and must carry an http(s) scheme
/// - Data and combined directories cannot be empty
/// - Season type cannot be empty
/// - Backoff factor must be at least 1 and delays finite and non-negative
/// - HTTP timeout must be at least one second
/// - If a log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let base_url = config.stats_base_url.trim();
    if base_url.is_empty() {
        return Err(AppError::config_error("Stats base URL cannot be empty"));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(AppError::config_error(
            "Stats base URL must start with http:// or https://",
        ));
    }

    if config.data_dir.trim().is_empty() {
        return Err(AppError::config_error("Data directory cannot be empty"));
    }
    if config.combined_dir.trim().is_empty() {
        return Err(AppError::config_error("Combined directory cannot be empty"));
    }
    if config.season_type.trim().is_empty() {
        return Err(AppError::config_error("Season type cannot be empty"));
    }

    if !config.backoff_factor.is_finite() || config.backoff_factor < 1.0 {
        return Err(AppError::config_error(format!(
            "Backoff factor must be at least 1.0, got {}",
            config.backoff_factor
        )));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "http_timeout_seconds must be at least 1",
        ));
    }

    for (name, value) in [
        ("initial_retry_delay_seconds", config.initial_retry_delay_seconds),
        ("failure_pause_seconds", config.failure_pause_seconds),
        ("schedule_pause_seconds", config.schedule_pause_seconds),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::config_error(format!(
                "{name} must be a non-negative number of seconds, got {value}"
            )));
        }
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_schemeless_base_url() {
        let config = Config {
            stats_base_url: "stats.nba.com/stats".to_string(),
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_rejects_empty_directories() {
        let config = Config {
            data_dir: "  ".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());

        let config = Config {
            combined_dir: String::new(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_shrinking_backoff() {
        let config = Config {
            backoff_factor: 0.5,
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_negative_delays() {
        let config = Config {
            failure_pause_seconds: -1.0,
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("failure_pause_seconds"));
    }

    #[test]
    fn test_rejects_zero_http_timeout() {
        let config = Config {
            http_timeout_seconds: 0,
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("http_timeout_seconds"));

        let config = Config {
            http_timeout_seconds: 1,
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_creates_log_parent_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("nested").join("sync.log");
        let config = Config {
            log_file_path: Some(log_path.to_string_lossy().to_string()),
            ..Config::default()
        };
        validate_config(&config).unwrap();
        assert!(temp_dir.path().join("nested").exists());
    }
}
