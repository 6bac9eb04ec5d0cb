use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of `gameDate` in the league schedule, e.g. `10/22/2024 00:00:00`.
pub const GAME_DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(rename = "leagueSchedule")]
    pub league_schedule: LeagueSchedule,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeagueSchedule {
    #[serde(rename = "seasonYear", default)]
    pub season_year: Option<String>,
    #[serde(rename = "gameDates", default)]
    pub game_dates: Vec<GameDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDate {
    #[serde(rename = "gameDate")]
    pub game_date: String,
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledGame {
    #[serde(rename = "gameId", default)]
    pub game_id: Option<String>,
    #[serde(rename = "gameDateTimeUTC", default)]
    pub game_date_time_utc: Option<String>,
    #[serde(rename = "homeTeam")]
    pub home_team: ScheduleTeam,
    #[serde(rename = "awayTeam")]
    pub away_team: ScheduleTeam,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTeam {
    #[serde(rename = "teamId")]
    pub team_id: i64,
    #[serde(rename = "teamTricode", default)]
    pub team_tricode: Option<String>,
}

impl ScheduledGame {
    /// Tip-off time: `gameDateTimeUTC` when the API provides it, otherwise
    /// the enclosing `gameDate` read as UTC.
    pub fn start_time(&self, game_date: &str) -> Option<DateTime<Utc>> {
        if let Some(raw) = &self.game_date_time_utc
            && let Ok(parsed) = DateTime::parse_from_rfc3339(raw)
        {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(game_date, GAME_DATE_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

impl ScheduleResponse {
    /// Every game of the schedule paired with its start time; games whose
    /// time can't be parsed are skipped.
    pub fn games_with_start(&self) -> impl Iterator<Item = (&ScheduledGame, DateTime<Utc>)> {
        self.league_schedule.game_dates.iter().flat_map(|date| {
            date.games
                .iter()
                .filter_map(|game| game.start_time(&date.game_date).map(|t| (game, t)))
        })
    }
}
