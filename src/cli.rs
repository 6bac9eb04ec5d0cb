use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Whether the arguments ask for a configuration operation instead of a sync.
pub fn is_config_operation(args: &Args) -> bool {
    args.list_config
        || args.new_data_dir.is_some()
        || args.new_combined_dir.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}

/// NBA season statistics sync
///
/// Fetches box scores, play-by-play, shot charts, player tracking and
/// advanced statistics for every game of a season from the NBA stats API,
/// keeps them as per-season CSV tables and rebuilds combined all-seasons
/// tables.
///
/// Games already recorded in the season's checked-games ledger are skipped,
/// so the tool can be run repeatedly (e.g. from cron) to pick up new games.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Season to sync, e.g. 2023-24. Defaults to the season in progress.
    #[arg(long = "season", short = 's', help_heading = "Sync")]
    pub season: Option<String>,

    /// Season type to enumerate games for, e.g. "Regular Season" or "Playoffs".
    #[arg(long = "season-type", help_heading = "Sync")]
    pub season_type: Option<String>,

    /// Directory for the per-season tables, ledger and run log (this run only).
    #[arg(long = "data-dir", help_heading = "Sync")]
    pub data_dir: Option<String>,

    /// Directory for the combined tables (this run only).
    #[arg(long = "combined-dir", help_heading = "Sync")]
    pub combined_dir: Option<String>,

    /// Only rebuild the combined tables from the season tables on disk.
    #[arg(long = "combine-only", help_heading = "Sync")]
    pub combine_only: bool,

    /// Don't fetch the league schedule for upcoming matchups.
    #[arg(long = "skip-schedule", help_heading = "Sync")]
    pub skip_schedule: bool,

    /// Don't fetch the team game logs.
    #[arg(long = "skip-team-logs", help_heading = "Sync", conflicts_with = "teams")]
    pub skip_team_logs: bool,

    /// Fetch team game logs only for these teams, given as comma separated
    /// abbreviations (e.g. LAL,GSW).
    #[arg(long = "teams", value_delimiter = ',', help_heading = "Sync")]
    pub teams: Vec<String>,

    /// Update the season data directory in config.
    #[arg(long = "set-data-dir", help_heading = "Configuration")]
    pub new_data_dir: Option<String>,

    /// Update the combined data directory in config.
    #[arg(long = "set-combined-dir", help_heading = "Configuration")]
    pub new_combined_dir: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Logging")]
    pub log_file: Option<String>,

    /// Log only to the log file, not to stdout.
    #[arg(long = "quiet", short = 'q', help_heading = "Logging")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["nba_season_sync"]);
        assert!(args.season.is_none());
        assert!(args.teams.is_empty());
        assert!(!is_config_operation(&args));
    }

    #[test]
    fn test_teams_are_comma_separated() {
        let args = Args::parse_from(["nba_season_sync", "--season", "2023-24", "--teams", "LAL,GSW"]);
        assert_eq!(args.season.as_deref(), Some("2023-24"));
        assert_eq!(args.teams, vec!["LAL", "GSW"]);
    }

    #[test]
    fn test_skip_team_logs_conflicts_with_teams() {
        let result =
            Args::try_parse_from(["nba_season_sync", "--skip-team-logs", "--teams", "LAL"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_operations() {
        let args = Args::parse_from(["nba_season_sync", "--set-data-dir", "/tmp/nba"]);
        assert!(is_config_operation(&args));
        let args = Args::parse_from(["nba_season_sync", "--clear-log-file"]);
        assert!(is_config_operation(&args));
    }
}
