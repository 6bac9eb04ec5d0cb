//! Upcoming matchups from the league schedule

use chrono::{DateTime, Duration, Utc};

use crate::constants::UPCOMING_WINDOW_DAYS;
use crate::data_fetcher::models::{ScheduleResponse, Table};

pub const HOME_TEAM_COLUMN: &str = "home_teamId";
pub const AWAY_TEAM_COLUMN: &str = "away_teamId";

/// Home/away team pairs of the games starting within the next
/// [`UPCOMING_WINDOW_DAYS`] days of `now`, both bounds inclusive.
pub fn upcoming_matchups(schedule: &ScheduleResponse, now: DateTime<Utc>) -> Table {
    let window_end = now + Duration::days(UPCOMING_WINDOW_DAYS);
    let rows = schedule
        .games_with_start()
        .filter(|(_, start)| *start >= now && *start <= window_end)
        .map(|(game, _)| {
            vec![
                game.home_team.team_id.to_string(),
                game.away_team.team_id.to_string(),
            ]
        })
        .collect();

    Table::with_rows(
        vec![HOME_TEAM_COLUMN.to_string(), AWAY_TEAM_COLUMN.to_string()],
        rows,
    )
}
