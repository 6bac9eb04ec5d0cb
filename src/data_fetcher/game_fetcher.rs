//! Per-game statistics fetching
//!
//! Every pending category of every planned game is requested through the
//! retry policy. A category that still fails is written to the run log,
//! followed by a courtesy pause, and the run moves on: one bad game never
//! aborts a sync.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, instrument};

use super::api::{StatsClient, StatsRequest};
use super::models::{Category, Table, Team};
use super::retry::RetryPolicy;
use crate::config::Config;
use crate::constants::files::GAME_ID_COLUMN;
use crate::error::AppError;
use crate::storage::RunLog;

/// Games to fetch with their missing categories, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchPlan {
    games: Vec<(String, Vec<Category>)>,
}

impl FetchPlan {
    pub fn push(&mut self, game_id: String, categories: Vec<Category>) {
        self.games.push((game_id, categories));
    }

    /// Plan fetching every per-game category of each game.
    pub fn all_categories(game_ids: &[String]) -> Self {
        let mut plan = FetchPlan::default();
        for game_id in game_ids {
            plan.push(game_id.clone(), Category::PER_GAME.to_vec());
        }
        plan
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn game_ids(&self) -> impl Iterator<Item = &str> {
        self.games.iter().map(|(id, _)| id.as_str())
    }

    pub fn pending(&self, game_id: &str) -> Option<&[Category]> {
        self.games
            .iter()
            .find(|(id, _)| id == game_id)
            .map(|(_, categories)| categories.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Category])> {
        self.games
            .iter()
            .map(|(id, categories)| (id.as_str(), categories.as_slice()))
    }
}

/// A category that exhausted its retries.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    /// Game id, or the team for team game logs.
    pub subject: String,
    pub category: Category,
    pub message: String,
}

/// Everything a fetch pass produced.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Concatenated rows per category; categories never fetched are absent.
    pub tables: BTreeMap<Category, Table>,
    /// Stored (game, category) pairs.
    pub succeeded: BTreeSet<(String, Category)>,
    pub failures: Vec<FetchFailure>,
    /// Games whose planned categories all succeeded.
    pub completed_games: Vec<String>,
    /// Every game that was attempted, in order.
    pub processed_games: Vec<String>,
}

impl FetchOutcome {
    fn add_table(&mut self, category: Category, table: Table) {
        self.tables.entry(category).or_default().append(table);
    }

    /// Rows fetched for `category`; an empty table when there are none.
    pub fn table(&self, category: Category) -> Table {
        self.tables.get(&category).cloned().unwrap_or_default()
    }
}

/// Season and pacing of a fetch pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    pub season: String,
    pub season_type: String,
    pub retry: RetryPolicy,
    /// Pause after a category exhausted its retries.
    pub failure_pause: Duration,
    /// Pause after each game and each team.
    pub game_pause: Duration,
}

impl FetchSettings {
    pub fn from_config(config: &Config, season: &str, season_type: &str) -> Self {
        FetchSettings {
            season: season.to_string(),
            season_type: season_type.to_string(),
            retry: config.retry_policy(),
            failure_pause: config.failure_pause(),
            game_pause: config.game_pause(),
        }
    }
}

pub struct GameFetcher<'a> {
    client: &'a StatsClient,
    settings: &'a FetchSettings,
    run_log: &'a RunLog,
}

impl<'a> GameFetcher<'a> {
    pub fn new(client: &'a StatsClient, settings: &'a FetchSettings, run_log: &'a RunLog) -> Self {
        GameFetcher {
            client,
            settings,
            run_log,
        }
    }

    /// Fetches the planned categories of every game, then the season game
    /// log of each team in `teams`.
    ///
    /// Only I/O errors of the run log abort the pass; fetch errors end up in
    /// [`FetchOutcome::failures`].
    #[instrument(skip_all, fields(season = %self.settings.season, games = plan.len()))]
    pub async fn fetch(&self, plan: &FetchPlan, teams: &[Team]) -> Result<FetchOutcome, AppError> {
        let mut outcome = FetchOutcome::default();
        let total = plan.len();

        for (index, (game_id, categories)) in plan.iter().enumerate() {
            info!("Processing game {game_id} ({}/{total})", index + 1);
            let mut complete = true;

            for &category in categories {
                let Some(request) = StatsRequest::for_game(
                    category,
                    game_id,
                    &self.settings.season,
                    &self.settings.season_type,
                ) else {
                    continue;
                };

                match self.fetch_with_retry(&request, &format!("{category} for {game_id}")).await {
                    Ok(mut table) => {
                        table.set_column(GAME_ID_COLUMN, game_id);
                        info!("Fetched {} {category} rows for {game_id}", table.len());
                        outcome.add_table(category, table);
                        outcome.succeeded.insert((game_id.to_string(), category));
                    }
                    Err(e) => {
                        complete = false;
                        self.record_failure(&mut outcome, game_id, category, e).await?;
                    }
                }
            }

            if complete {
                outcome.completed_games.push(game_id.to_string());
            }
            outcome.processed_games.push(game_id.to_string());
            sleep(self.settings.game_pause).await;
        }

        for team in teams {
            let request = StatsRequest::team_game_logs(team.team_id, &self.settings.season);
            let subject = format!("{} ({})", team.full_name, team.team_id);
            let label = format!("{} for {subject}", Category::TeamGameLogs);

            match self.fetch_with_retry(&request, &label).await {
                Ok(table) => {
                    info!("Fetched {} game log rows for {}", table.len(), team.full_name);
                    outcome.add_table(Category::TeamGameLogs, table);
                }
                Err(e) => {
                    self.record_failure(&mut outcome, &subject, Category::TeamGameLogs, e)
                        .await?;
                }
            }
            sleep(self.settings.game_pause).await;
        }

        info!(
            "Fetch pass done: {} games, {} complete, {} failures",
            outcome.processed_games.len(),
            outcome.completed_games.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }

    async fn fetch_with_retry(&self, request: &StatsRequest, label: &str) -> Result<Table, AppError> {
        let client = self.client;
        self.settings
            .retry
            .run(label, move || client.fetch_table(request))
            .await
    }

    async fn record_failure(
        &self,
        outcome: &mut FetchOutcome,
        subject: &str,
        category: Category,
        e: AppError,
    ) -> Result<(), AppError> {
        error!("Failed {category} for {subject}: {e}");
        self.run_log
            .failure(&format!("{category} for {subject}"), &e)
            .await?;
        outcome.failures.push(FetchFailure {
            subject: subject.to_string(),
            category,
            message: e.to_string(),
        });
        sleep(self.settings.failure_pause).await;
        Ok(())
    }
}
