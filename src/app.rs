//! One sync run: enumerate the season's games, fetch what the ledger is
//! missing, store it, refresh the upcoming matchups and rebuild the combined
//! tables.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::constants::files::UPCOMING_MATCHUPS_SUFFIX;
use crate::data_fetcher::api::{StatsClient, upcoming_matchups};
use crate::data_fetcher::game_fetcher::{FetchFailure, FetchSettings, GameFetcher};
use crate::data_fetcher::models::{Category, NBA_TEAMS, Team};
use crate::error::AppError;
use crate::storage::{CombinedTable, Ledger, RunLog, UpdateSummary, combine_seasons, update_csv};

/// Everything a sync run needs besides the HTTP client.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub fetch: FetchSettings,
    pub data_dir: PathBuf,
    pub combined_dir: PathBuf,
    /// Teams whose season game log is fetched; empty to skip team logs.
    pub teams: Vec<Team>,
    /// Pause before the schedule request.
    pub schedule_pause: Duration,
    pub skip_schedule: bool,
    /// Only rebuild the combined tables from what is on disk.
    pub combine_only: bool,
}

impl SyncSettings {
    /// Settings for syncing `season` with every team and all steps enabled.
    pub fn from_config(config: &Config, season: &str) -> Self {
        SyncSettings {
            fetch: FetchSettings::from_config(config, season, &config.season_type),
            data_dir: PathBuf::from(&config.data_dir),
            combined_dir: PathBuf::from(&config.combined_dir),
            teams: NBA_TEAMS.to_vec(),
            schedule_pause: config.schedule_pause(),
            skip_schedule: false,
            combine_only: false,
        }
    }

    pub fn season(&self) -> &str {
        &self.fetch.season
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub season: String,
    /// Games listed in the season's game log.
    pub games_listed: usize,
    /// Listed games the ledger already had completely.
    pub games_skipped: usize,
    pub processed_games: Vec<String>,
    pub completed_games: Vec<String>,
    pub failures: Vec<FetchFailure>,
    /// Season tables written this run.
    pub season_tables: Vec<(Category, UpdateSummary)>,
    /// Upcoming matchups written, `None` when skipped or unavailable.
    pub upcoming_matchups: Option<usize>,
    pub combined: Vec<CombinedTable>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Season {}", self.season)?;
        writeln!(
            f,
            "  games: {} listed, {} already stored, {} processed, {} complete",
            self.games_listed,
            self.games_skipped,
            self.processed_games.len(),
            self.completed_games.len()
        )?;
        for (category, summary) in &self.season_tables {
            writeln!(
                f,
                "  {category}: {} rows ({} new)",
                summary.total_rows,
                summary.added_rows()
            )?;
        }
        match self.upcoming_matchups {
            Some(count) => writeln!(f, "  upcoming matchups: {count}")?,
            None => writeln!(f, "  upcoming matchups: not updated")?,
        }
        for table in &self.combined {
            writeln!(
                f,
                "  {}: {} rows from {} files",
                table.path.display(),
                table.summary.total_rows,
                table.source_files
            )?;
        }
        if !self.failures.is_empty() {
            writeln!(f, "  failures: {}", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "    {} for {}: {}", failure.category, failure.subject, failure.message)?;
            }
        }
        Ok(())
    }
}

/// Runs one sync as configured by `settings`.
///
/// Fetch failures of single games, teams or the schedule are recorded in the
/// run log and the summary. Failing to list the season's games or any file
/// error aborts the run.
#[instrument(skip_all, fields(season = %settings.season()))]
pub async fn run_sync(client: &StatsClient, settings: &SyncSettings) -> Result<RunSummary, AppError> {
    if settings.combine_only {
        let combined = combine_seasons(&settings.data_dir, &settings.combined_dir).await?;
        return Ok(RunSummary {
            season: settings.season().to_string(),
            combined,
            ..Default::default()
        });
    }

    let run_log = RunLog::for_season(&settings.data_dir, settings.season());
    run_log.started().await?;

    match sync_season(client, settings, &run_log).await {
        Ok(summary) => {
            run_log.finished().await?;
            Ok(summary)
        }
        Err(e) => {
            error!("Sync of {} aborted: {e}", settings.season());
            if let Err(log_err) = run_log.append(&format!("Aborted: {e}")).await {
                warn!("Could not write run log {}: {log_err}", run_log.path().display());
            }
            Err(e)
        }
    }
}

async fn sync_season(
    client: &StatsClient,
    settings: &SyncSettings,
    run_log: &RunLog,
) -> Result<RunSummary, AppError> {
    let season = settings.season();
    let fetch = &settings.fetch;
    let mut ledger = Ledger::load(Ledger::path_for(&settings.data_dir, season)).await?;

    let game_ids = fetch
        .retry
        .run(&format!("game log for {season}"), move || {
            client.fetch_game_ids(season, &fetch.season_type)
        })
        .await?;

    let plan = ledger.plan(&game_ids);
    info!(
        "{} of {} games need fetching for {season}",
        plan.len(),
        game_ids.len()
    );

    let outcome = GameFetcher::new(client, fetch, run_log)
        .fetch(&plan, &settings.teams)
        .await?;

    // Season tables are written before the ledger is appended.
    let mut season_tables = Vec::with_capacity(outcome.tables.len());
    for (category, table) in &outcome.tables {
        let path = settings.data_dir.join(category.season_file_name(season));
        season_tables.push((*category, update_csv(&path, table).await?));
    }
    ledger.record(&outcome).await?;
    run_log.processed(&outcome.processed_games).await?;

    let upcoming_matchups = if settings.skip_schedule {
        None
    } else {
        write_upcoming_matchups(client, settings, run_log).await?
    };

    let combined = combine_seasons(&settings.data_dir, &settings.combined_dir).await?;

    Ok(RunSummary {
        season: season.to_string(),
        games_listed: game_ids.len(),
        games_skipped: game_ids.len() - plan.len(),
        processed_games: outcome.processed_games,
        completed_games: outcome.completed_games,
        failures: outcome.failures,
        season_tables,
        upcoming_matchups,
        combined,
    })
}

/// Stores the matchups of the coming days. Schedule errors are logged and
/// yield `None`; only file errors propagate.
async fn write_upcoming_matchups(
    client: &StatsClient,
    settings: &SyncSettings,
    run_log: &RunLog,
) -> Result<Option<usize>, AppError> {
    let season = settings.season();
    sleep(settings.schedule_pause).await;

    let schedule = match client.fetch_schedule(season).await {
        Ok(schedule) => schedule,
        Err(e) => {
            error!("Failed to fetch schedule for {season}: {e}");
            run_log.failure(&format!("schedule for {season}"), &e).await?;
            return Ok(None);
        }
    };

    let matchups = upcoming_matchups(&schedule, Utc::now());
    let path = settings
        .data_dir
        .join(format!("{season}{UPCOMING_MATCHUPS_SUFFIX}"));
    update_csv(&path, &matchups).await?;
    info!("Stored {} upcoming matchups", matchups.len());
    Ok(Some(matchups.len()))
}
