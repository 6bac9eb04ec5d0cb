//! Per-season run log, the persisted record of each sync run

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::constants::files::RUN_LOG_SUFFIX;
use crate::error::AppError;

/// Timestamp format of the run log lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RunLog { path: path.into() }
    }

    /// Run log of a season inside the data directory, e.g. `2023-24_log.txt`.
    pub fn for_season(data_dir: &Path, season: &str) -> Self {
        Self::new(data_dir.join(format!("{season}{RUN_LOG_SUFFIX}")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line, creating the file and its directory as needed.
    pub async fn append(&self, line: &str) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", line.trim_end()).as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }

    pub async fn started(&self) -> Result<(), AppError> {
        self.append(&format!("Started at {}", now())).await
    }

    pub async fn failure(&self, subject: &str, error: &AppError) -> Result<(), AppError> {
        self.append(&format!("Failed {subject}: {error}")).await
    }

    /// Writes the processed game ids and their count.
    pub async fn processed(&self, game_ids: &[String]) -> Result<(), AppError> {
        self.append(&format!("Processed game IDs: {}", game_ids.join(", ")))
            .await?;
        self.append(&format!("Total games processed: {}", game_ids.len()))
            .await
    }

    pub async fn finished(&self) -> Result<(), AppError> {
        self.append(&format!("Finished at {}", now())).await
    }
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_lines_are_appended_in_order() {
        let dir = tempdir().unwrap();
        let log = RunLog::for_season(&dir.path().join("by_year"), "2023-24");
        assert!(log.path().ends_with("2023-24_log.txt"));

        log.started().await.unwrap();
        log.failure("box for 0022300001", &AppError::api_not_found("http://x/boxscoretraditionalv3"))
            .await
            .unwrap();
        log.processed(&["0022300001".to_string(), "0022300002".to_string()])
            .await
            .unwrap();
        log.finished().await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Started at "));
        assert!(lines[1].starts_with("Failed box for 0022300001: API request not found"));
        assert_eq!(lines[2], "Processed game IDs: 0022300001, 0022300002");
        assert_eq!(lines[3], "Total games processed: 2");
        assert!(lines[4].starts_with("Finished at "));
    }
}
