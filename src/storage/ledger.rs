//! Checked-games ledger
//!
//! A line-delimited, append-only record of fetched games. A bare game id
//! means every per-game category of that game is stored; a line
//! `<game_id>,<category>` records one category of a game whose other
//! categories are still outstanding.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::constants::files::LEDGER_PREFIX;
use crate::data_fetcher::game_fetcher::{FetchOutcome, FetchPlan};
use crate::data_fetcher::models::Category;
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    path: PathBuf,
    completed: HashSet<String>,
    partial: HashSet<(String, Category)>,
}

impl Ledger {
    /// Ledger location for a season, e.g. `checked_games2023-24.txt`.
    pub fn path_for(data_dir: &Path, season: &str) -> PathBuf {
        data_dir.join(format!("{LEDGER_PREFIX}{season}.txt"))
    }

    /// Loads the ledger at `path`. A missing file is an empty ledger.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let mut ledger = Ledger {
            path,
            ..Default::default()
        };
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.split_once(',') {
                None => {
                    ledger.completed.insert(line.to_string());
                }
                Some((game_id, key)) => match key.parse::<Category>() {
                    Ok(category) => {
                        ledger.partial.insert((game_id.trim().to_string(), category));
                    }
                    Err(e) => warn!("Ignoring ledger line '{line}': {e}"),
                },
            }
        }
        info!(
            "Loaded ledger {}: {} complete games, {} partial entries",
            ledger.path.display(),
            ledger.completed.len(),
            ledger.partial.len()
        );
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether every per-game category of `game_id` is stored.
    pub fn is_complete(&self, game_id: &str) -> bool {
        self.completed.contains(game_id)
            || Category::PER_GAME
                .iter()
                .all(|c| self.partial.contains(&(game_id.to_string(), *c)))
    }

    pub fn is_done(&self, game_id: &str, category: Category) -> bool {
        self.completed.contains(game_id) || self.partial.contains(&(game_id.to_string(), category))
    }

    /// Per-game categories still missing for each of `game_ids`. Games with
    /// nothing missing are left out.
    pub fn plan(&self, game_ids: &[String]) -> FetchPlan {
        let mut plan = FetchPlan::default();
        for game_id in game_ids {
            let pending: Vec<Category> = Category::PER_GAME
                .into_iter()
                .filter(|c| !self.is_done(game_id, *c))
                .collect();
            if !pending.is_empty() {
                plan.push(game_id.clone(), pending);
            }
        }
        plan
    }

    /// Appends the successes of a fetch: a bare id for every game that is now
    /// complete and a pair line for each stored category of the others.
    /// Returns the number of lines written.
    pub async fn record(&mut self, outcome: &FetchOutcome) -> Result<usize, AppError> {
        let mut lines = Vec::new();
        for game_id in &outcome.completed_games {
            if self.completed.insert(game_id.clone()) {
                lines.push(game_id.clone());
            }
        }
        for (game_id, category) in &outcome.succeeded {
            if self.completed.contains(game_id) {
                continue;
            }
            if self.partial.insert((game_id.clone(), *category)) {
                lines.push(format!("{game_id},{category}"));
            }
        }

        if lines.is_empty() {
            return Ok(0);
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        // new entries start on their own line
        let needs_separator = match fs::read(&self.path).await {
            Ok(existing) => existing.last().is_some_and(|b| *b != b'\n'),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let mut content = String::new();
        if needs_separator {
            content.push('\n');
        }
        content.push_str(&lines.join("\n"));
        content.push('\n');
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        info!("Recorded {} ledger entries in {}", lines.len(), self.path.display());
        Ok(lines.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_ledger_plans_everything() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::load(Ledger::path_for(dir.path(), "2023-24"))
            .await
            .unwrap();

        let plan = ledger.plan(&ids(&["1", "2"]));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.pending("1"), Some(Category::PER_GAME.as_slice()));
    }

    #[tokio::test]
    async fn test_bare_and_pair_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checked_games2023-24.txt");
        std::fs::write(&path, "1\n2,box\n2,shotchart\n\n3,bogus\n").unwrap();

        let ledger = Ledger::load(&path).await.unwrap();
        assert!(ledger.is_complete("1"));
        assert!(ledger.is_done("2", Category::Box));
        assert!(!ledger.is_done("2", Category::PlayByPlay));

        let plan = ledger.plan(&ids(&["1", "2", "3"]));
        assert_eq!(plan.game_ids().collect::<Vec<_>>(), vec!["2", "3"]);
        assert_eq!(
            plan.pending("2").unwrap(),
            [
                Category::PlayByPlay,
                Category::PlayerTracking,
                Category::AdvancedBox,
                Category::TeamAdvanced
            ]
        );
    }

    #[tokio::test]
    async fn test_record_appends_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checked_games2023-24.txt");
        std::fs::write(&path, "0\n").unwrap();
        let mut ledger = Ledger::load(&path).await.unwrap();

        let mut outcome = FetchOutcome::default();
        outcome.completed_games.push("1".to_string());
        for category in Category::PER_GAME {
            outcome.succeeded.insert(("1".to_string(), category));
        }
        outcome.succeeded.insert(("2".to_string(), Category::Box));

        assert_eq!(ledger.record(&outcome).await.unwrap(), 2);
        // nothing new the second time
        assert_eq!(ledger.record(&outcome).await.unwrap(), 0);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "0\n1\n2,box\n");

        let reloaded = Ledger::load(&path).await.unwrap();
        assert!(reloaded.is_complete("1"));
        assert!(reloaded.is_done("2", Category::Box));
        assert!(!reloaded.is_complete("2"));
    }

    #[tokio::test]
    async fn test_record_after_unterminated_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checked_games2023-24.txt");
        std::fs::write(&path, "0022300001").unwrap();
        let mut ledger = Ledger::load(&path).await.unwrap();

        let mut outcome = FetchOutcome::default();
        outcome.completed_games.push("0022300002".to_string());
        assert_eq!(ledger.record(&outcome).await.unwrap(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "0022300001\n0022300002\n");

        let reloaded = Ledger::load(&path).await.unwrap();
        assert!(reloaded.is_complete("0022300001"));
        assert!(reloaded.is_complete("0022300002"));
    }

    #[tokio::test]
    async fn test_all_pairs_count_as_complete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("l.txt");
        let lines: Vec<String> = Category::PER_GAME
            .iter()
            .map(|c| format!("9,{c}"))
            .collect();
        std::fs::write(&path, lines.join("\n")).unwrap();

        let ledger = Ledger::load(&path).await.unwrap();
        assert!(ledger.is_complete("9"));
        assert!(ledger.plan(&ids(&["9"])).is_empty());
    }
}
