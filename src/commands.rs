use crate::cli::Args;
use nba_season_sync::app::{RunSummary, SyncSettings, run_sync};
use nba_season_sync::config::Config;
use nba_season_sync::data_fetcher::StatsClient;
use nba_season_sync::data_fetcher::api::{current_season, parse_season_label};
use nba_season_sync::data_fetcher::models::{Team, find_by_abbreviation};
use nba_season_sync::error::AppError;
use tracing::info;

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-data-dir, --set-combined-dir,
/// --set-log-file, --clear-log-file).
///
/// Starts from the stored config (or defaults when there is none), applies the
/// changes and saves the result.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let config_path = Config::get_config_path();
    let mut config = if std::path::Path::new(&config_path).exists() {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    if let Some(data_dir) = &args.new_data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(combined_dir) = &args.new_combined_dir {
        config.combined_dir = combined_dir.clone();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Resolves team abbreviations, rejecting unknown ones.
fn resolve_teams(abbreviations: &[String]) -> Result<Vec<Team>, AppError> {
    abbreviations
        .iter()
        .map(|abbr| {
            find_by_abbreviation(abbr.trim())
                .copied()
                .ok_or_else(|| AppError::config_error(format!("Unknown team abbreviation '{abbr}'")))
        })
        .collect()
}

/// Combines the loaded config with the one-shot command line overrides.
pub fn build_sync_settings(args: &Args, mut config: Config) -> Result<SyncSettings, AppError> {
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(combined_dir) = &args.combined_dir {
        config.combined_dir = combined_dir.clone();
    }
    if let Some(season_type) = &args.season_type {
        config.season_type = season_type.clone();
    }
    config.validate()?;

    let season = match &args.season {
        Some(label) => {
            parse_season_label(label)?;
            label.trim().to_string()
        }
        None => current_season(),
    };

    let mut settings = SyncSettings::from_config(&config, &season);
    settings.combine_only = args.combine_only;
    settings.skip_schedule = args.skip_schedule;
    if args.skip_team_logs {
        settings.teams.clear();
    } else if !args.teams.is_empty() {
        settings.teams = resolve_teams(&args.teams)?;
    }
    Ok(settings)
}

/// Runs a sync with the loaded config and the command line overrides.
pub async fn handle_sync_command(args: &Args) -> Result<RunSummary, AppError> {
    let config = Config::load().await?;
    let client = StatsClient::from_config(&config)?;
    let settings = build_sync_settings(args, config)?;

    info!(
        "Syncing season {} into {}",
        settings.season(),
        settings.data_dir.display()
    );
    run_sync(&client, &settings).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["nba_season_sync"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let settings = build_sync_settings(
            &args(&[
                "--season",
                "2022-23",
                "--data-dir",
                "/tmp/nba/by_year",
                "--season-type",
                "Playoffs",
                "--skip-schedule",
            ]),
            Config::default(),
        )
        .unwrap();

        assert_eq!(settings.season(), "2022-23");
        assert_eq!(settings.fetch.season_type, "Playoffs");
        assert_eq!(settings.data_dir, std::path::PathBuf::from("/tmp/nba/by_year"));
        assert!(settings.skip_schedule);
        assert_eq!(settings.teams.len(), 30);
    }

    #[test]
    fn test_invalid_season_is_rejected() {
        let result = build_sync_settings(&args(&["--season", "2022-24"]), Config::default());
        assert!(matches!(result, Err(AppError::InvalidSeason { .. })));
    }

    #[test]
    fn test_team_selection() {
        let settings =
            build_sync_settings(&args(&["--teams", "lal,GSW"]), Config::default()).unwrap();
        let ids: Vec<u32> = settings.teams.iter().map(|t| t.team_id).collect();
        assert_eq!(ids, vec![1610612747, 1610612744]);

        let none = build_sync_settings(&args(&["--skip-team-logs"]), Config::default()).unwrap();
        assert!(none.teams.is_empty());

        let unknown = build_sync_settings(&args(&["--teams", "XYZ"]), Config::default());
        assert!(unknown.is_err());
    }
}
