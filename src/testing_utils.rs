//! Builders for stats API response bodies used by tests

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::data_fetcher::models::schedule::GAME_DATE_FORMAT;

/// Test utilities for creating mock stats API responses
pub struct StatsFixtures;

impl StatsFixtures {
    /// League game log with one row per team and game, so every game id
    /// appears twice.
    pub fn league_game_log(game_ids: &[&str]) -> Value {
        let rows: Vec<Value> = game_ids
            .iter()
            .flat_map(|id| {
                [
                    json!(["22023", 1610612743, "DEN", id, "2023-10-24", "DEN vs. LAL", "W", 119]),
                    json!(["22023", 1610612747, "LAL", id, "2023-10-24", "LAL @ DEN", "L", 107]),
                ]
            })
            .collect();
        json!({
            "resource": "leaguegamelog",
            "resultSets": [{
                "name": "LeagueGameLog",
                "headers": ["SEASON_ID", "TEAM_ID", "TEAM_ABBREVIATION", "GAME_ID",
                            "GAME_DATE", "MATCHUP", "WL", "PTS"],
                "rowSet": rows
            }]
        })
    }

    /// V3 box score with one player per team below `root`.
    pub fn box_score_v3(root: &str, game_id: &str) -> Value {
        let player = |person_id: u32, name: &str, points: u32| {
            json!({
                "personId": person_id,
                "firstName": name,
                "familyName": "Player",
                "position": "F",
                "statistics": {"minutes": "34:10", "points": points, "assists": 5}
            })
        };
        json!({
            "meta": {"version": 1},
            root: {
                "gameId": game_id,
                "homeTeamId": 1610612743,
                "awayTeamId": 1610612747,
                "homeTeam": {
                    "teamId": 1610612743,
                    "teamTricode": "DEN",
                    "players": [player(203999, "Home", 29)]
                },
                "awayTeam": {
                    "teamId": 1610612747,
                    "teamTricode": "LAL",
                    "players": [player(2544, "Away", 21)]
                }
            }
        })
    }

    pub fn play_by_play(game_id: &str) -> Value {
        json!({
            "meta": {"version": 1},
            "game": {
                "gameId": game_id,
                "actions": [
                    {"actionNumber": 2, "clock": "PT12M00.00S", "period": 1,
                     "actionType": "period", "description": "Period Start"},
                    {"actionNumber": 4, "clock": "PT11M41.00S", "period": 1,
                     "actionType": "Made Shot", "description": "Jokic 2' Layup", "shotDistance": 2}
                ]
            }
        })
    }

    pub fn shot_chart(game_id: &str) -> Value {
        json!({
            "resultSets": [
                {
                    "name": "Shot_Chart_Detail",
                    "headers": ["GRID_TYPE", "GAME_ID", "GAME_EVENT_ID", "PLAYER_ID",
                                "SHOT_MADE_FLAG", "LOC_X", "LOC_Y"],
                    "rowSet": [
                        ["Shot Chart Detail", game_id, 4, 203999, 1, -5, 12],
                        ["Shot Chart Detail", game_id, 9, 2544, 0, 220, 40]
                    ]
                },
                {"name": "LeagueAverages", "headers": ["GRID_TYPE", "FGA"], "rowSet": []}
            ]
        })
    }

    /// Advanced V2 box score: players in `resultSets[0]`, teams in `[1]`.
    pub fn team_advanced(game_id: &str) -> Value {
        json!({
            "resultSets": [
                {
                    "name": "PlayerStats",
                    "headers": ["GAME_ID", "TEAM_ID", "PLAYER_ID", "OFF_RATING"],
                    "rowSet": [[game_id, 1610612743, 203999, 120.1]]
                },
                {
                    "name": "TeamStats",
                    "headers": ["GAME_ID", "TEAM_ID", "TEAM_ABBREVIATION", "OFF_RATING", "PACE"],
                    "rowSet": [
                        [game_id, 1610612743, "DEN", 114.2, 99.5],
                        [game_id, 1610612747, "LAL", 104.0, 99.5]
                    ]
                }
            ]
        })
    }

    pub fn team_game_logs(team_id: u32, game_ids: &[&str]) -> Value {
        let rows: Vec<Value> = game_ids
            .iter()
            .map(|id| json!(["2023-24", team_id, id, "2023-10-24", "W", 119]))
            .collect();
        json!({
            "resultSets": [{
                "name": "TeamGameLogs",
                "headers": ["SEASON_YEAR", "TEAM_ID", "GAME_ID", "GAME_DATE", "WL", "PTS"],
                "rowSet": rows
            }]
        })
    }

    /// League schedule with one game date per `(start, home, away)` entry.
    pub fn schedule(games: &[(DateTime<Utc>, i64, i64)]) -> Value {
        let game_dates: Vec<Value> = games
            .iter()
            .enumerate()
            .map(|(i, (start, home, away))| {
                json!({
                    "gameDate": start.format(GAME_DATE_FORMAT).to_string(),
                    "games": [{
                        "gameId": format!("00223{:05}", i + 1),
                        "gameDateTimeUTC": start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                        "homeTeam": {"teamId": home, "teamTricode": "HOM"},
                        "awayTeam": {"teamId": away, "teamTricode": "AWY"}
                    }]
                })
            })
            .collect();
        json!({
            "meta": {"version": 1},
            "leagueSchedule": {
                "seasonYear": "2023-24",
                "leagueId": "00",
                "gameDates": game_dates
            }
        })
    }
}

#[cfg(test)]
impl StatsFixtures {
    /// Mounts successful responses for all per-game endpoints of `game_id`.
    pub async fn mount_game(server: &wiremock::MockServer, game_id: &str) {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, ResponseTemplate};

        let responses = [
            ("/boxscoretraditionalv3", Self::box_score_v3("boxScoreTraditional", game_id)),
            ("/playbyplayv3", Self::play_by_play(game_id)),
            ("/shotchartdetail", Self::shot_chart(game_id)),
            ("/boxscoreplayertrackv3", Self::box_score_v3("boxScorePlayerTrack", game_id)),
            ("/boxscoreadvancedv3", Self::box_score_v3("boxScoreAdvanced", game_id)),
            ("/boxscoreadvancedv2", Self::team_advanced(game_id)),
        ];
        for (endpoint, body) in responses {
            Mock::given(method("GET"))
                .and(path(endpoint))
                .and(query_param("GameID", game_id))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(server)
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::{Extraction, ScheduleResponse};

    #[test]
    fn test_fixtures_match_extractions() {
        let box_score = Extraction::BoxScorePlayers("boxScoreTraditional")
            .extract(&StatsFixtures::box_score_v3("boxScoreTraditional", "1"), "u")
            .unwrap();
        assert_eq!(box_score.len(), 2);

        let actions = Extraction::PlayByPlayActions
            .extract(&StatsFixtures::play_by_play("1"), "u")
            .unwrap();
        assert_eq!(actions.len(), 2);

        let schedule: ScheduleResponse =
            serde_json::from_value(StatsFixtures::schedule(&[(Utc::now(), 1, 2)])).unwrap();
        assert_eq!(schedule.games_with_start().count(), 1);
    }
}
