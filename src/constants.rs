//! Application-wide constants and configuration defaults
//!
//! Centralizes the upstream endpoint names, file naming, and the default
//! timings used by the retry and courtesy-delay logic.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 4;

/// Base URL of the NBA stats API
pub const DEFAULT_STATS_BASE_URL: &str = "https://stats.nba.com/stats";

/// League identifier of the NBA on the stats API
pub const NBA_LEAGUE_ID: &str = "00";

/// Season type used when enumerating games
pub const DEFAULT_SEASON_TYPE: &str = "Regular Season";

/// Month in which a new season label takes over (October)
pub const SEASON_ROLLOVER_MONTH: u32 = 10;

/// Number of days ahead covered by the upcoming matchups table
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Name used for the config/data/log directories and the log file
pub const APP_DIR_NAME: &str = "nba_season_sync";

/// Default tracing log file name
pub const LOG_FILE_NAME: &str = "nba_season_sync.log";

/// Retry configuration
pub mod retry {
    /// Additional attempts after the first failure
    pub const MAX_RETRIES: u32 = 4;

    /// Delay before the first retry (seconds)
    pub const INITIAL_DELAY_SECONDS: f64 = 32.0;

    /// Multiplier applied to the delay after each retry
    pub const BACKOFF_FACTOR: f64 = 2.0;
}

/// Courtesy delays honoring the upstream's implicit rate limit
pub mod pacing {
    /// Pause after a category exhausted its retries (seconds)
    pub const FAILURE_PAUSE_SECONDS: f64 = 32.0;

    /// Pause between games (milliseconds)
    pub const GAME_PAUSE_MILLIS: u64 = 700;

    /// Pause before the schedule request (seconds)
    pub const SCHEDULE_PAUSE_SECONDS: f64 = 30.0;
}

/// Stats API endpoint names
pub mod endpoints {
    pub const LEAGUE_GAME_LOG: &str = "leaguegamelog";
    pub const BOX_SCORE_TRADITIONAL_V3: &str = "boxscoretraditionalv3";
    pub const PLAY_BY_PLAY_V3: &str = "playbyplayv3";
    pub const SHOT_CHART_DETAIL: &str = "shotchartdetail";
    pub const BOX_SCORE_PLAYER_TRACK_V3: &str = "boxscoreplayertrackv3";
    pub const BOX_SCORE_ADVANCED_V3: &str = "boxscoreadvancedv3";
    pub const BOX_SCORE_ADVANCED_V2: &str = "boxscoreadvancedv2";
    pub const TEAM_GAME_LOGS: &str = "teamgamelogs";
    pub const SCHEDULE_LEAGUE_V2: &str = "scheduleleaguev2";
}

/// Request headers the stats API expects from a browser
pub mod headers {
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";
    pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
    pub const REFERER: &str = "https://www.nba.com/";
    pub const ORIGIN: &str = "https://www.nba.com";
}

/// File naming inside the data directories
pub mod files {
    /// Column injected into every per-game table
    pub const GAME_ID_COLUMN: &str = "GAME_ID";

    /// Prefix of the all-seasons tables
    pub const COMBINED_PREFIX: &str = "combined";

    /// Suffix of the upcoming matchups table
    pub const UPCOMING_MATCHUPS_SUFFIX: &str = "_upcoming_matchups.csv";

    /// Suffix of the per-season run log
    pub const RUN_LOG_SUFFIX: &str = "_log.txt";

    /// Prefix of the checked-games ledger
    pub const LEDGER_PREFIX: &str = "checked_games";
}

/// Environment variable names
pub mod env_vars {
    /// Override for the stats API base URL
    pub const STATS_URL: &str = "NBA_SYNC_STATS_URL";

    /// Override for the per-season data directory
    pub const DATA_DIR: &str = "NBA_SYNC_DATA_DIR";

    /// Override for the combined tables directory
    pub const COMBINED_DIR: &str = "NBA_SYNC_COMBINED_DIR";

    /// Override for the tracing log file path
    pub const LOG_FILE: &str = "NBA_SYNC_LOG_FILE";

    /// Override for the HTTP timeout in seconds
    pub const HTTP_TIMEOUT: &str = "NBA_SYNC_HTTP_TIMEOUT";
}
