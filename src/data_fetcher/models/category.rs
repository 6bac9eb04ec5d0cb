use crate::constants::endpoints;
use std::fmt;
use std::str::FromStr;

/// Kind of statistics table kept per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Box,
    PlayByPlay,
    ShotChart,
    PlayerTracking,
    AdvancedBox,
    TeamAdvanced,
    TeamGameLogs,
}

impl Category {
    /// Categories fetched once per game, in fetch order.
    pub const PER_GAME: [Category; 6] = [
        Category::Box,
        Category::PlayByPlay,
        Category::ShotChart,
        Category::PlayerTracking,
        Category::AdvancedBox,
        Category::TeamAdvanced,
    ];

    /// Every stored category.
    pub const ALL: [Category; 7] = [
        Category::ShotChart,
        Category::PlayerTracking,
        Category::AdvancedBox,
        Category::PlayByPlay,
        Category::Box,
        Category::TeamAdvanced,
        Category::TeamGameLogs,
    ];

    /// Stable key used in the checked-games ledger.
    pub fn key(self) -> &'static str {
        match self {
            Category::Box => "box",
            Category::PlayByPlay => "play_by_play",
            Category::ShotChart => "shotchart",
            Category::PlayerTracking => "playertracking",
            Category::AdvancedBox => "advanced_box",
            Category::TeamAdvanced => "team_advanced",
            Category::TeamGameLogs => "team_game_logs",
        }
    }

    /// File name suffix of the per-season and combined tables.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Category::Box => "_box_data.csv",
            Category::PlayByPlay => "_play_by_play.csv",
            Category::ShotChart => "_shotchart_data.csv",
            Category::PlayerTracking => "_playertracking_data.csv",
            Category::AdvancedBox => "_advanced_box_data.csv",
            Category::TeamAdvanced => "_team_advanced.csv",
            Category::TeamGameLogs => "_team_game_logs.csv",
        }
    }

    /// Upstream endpoint the category is read from.
    pub fn endpoint(self) -> &'static str {
        match self {
            Category::Box => endpoints::BOX_SCORE_TRADITIONAL_V3,
            Category::PlayByPlay => endpoints::PLAY_BY_PLAY_V3,
            Category::ShotChart => endpoints::SHOT_CHART_DETAIL,
            Category::PlayerTracking => endpoints::BOX_SCORE_PLAYER_TRACK_V3,
            Category::AdvancedBox => endpoints::BOX_SCORE_ADVANCED_V3,
            Category::TeamAdvanced => endpoints::BOX_SCORE_ADVANCED_V2,
            Category::TeamGameLogs => endpoints::TEAM_GAME_LOGS,
        }
    }

    pub fn is_per_game(self) -> bool {
        self != Category::TeamGameLogs
    }

    /// Classifies a file name by its longest matching suffix, so that
    /// `_advanced_box_data.csv` never counts as `_box_data.csv`.
    pub fn from_file_name(file_name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| file_name.ends_with(c.file_suffix()))
            .max_by_key(|c| c.file_suffix().len())
    }

    /// Per-season table name, e.g. `2023-24_box_data.csv`.
    pub fn season_file_name(self, season: &str) -> String {
        format!("{season}{}", self.file_suffix())
    }

    /// All-seasons table name, e.g. `combined_box_data.csv`.
    pub fn combined_file_name(self) -> String {
        format!(
            "{}{}",
            crate::constants::files::COMBINED_PREFIX,
            self.file_suffix()
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}
