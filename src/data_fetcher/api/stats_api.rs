//! Typed access to the stats API endpoints used by a sync run

use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, instrument};

use crate::config::Config;
use crate::constants::{NBA_LEAGUE_ID, endpoints, files::GAME_ID_COLUMN};
use crate::data_fetcher::models::{Category, Extraction, ScheduleResponse, Table};
use crate::error::AppError;

use super::fetch_utils::fetch;
use super::http_client::create_http_client_with_timeout;
use super::urls::{build_endpoint_url, describe_request};

/// One stats API call: endpoint, query parameters and where the rows live.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRequest {
    pub endpoint: &'static str,
    pub params: Vec<(&'static str, String)>,
    pub extraction: Extraction,
}

fn params(pairs: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

/// Period/range parameters shared by the box score endpoints.
const FULL_GAME_RANGE: [(&str, &str); 5] = [
    ("StartPeriod", "0"),
    ("EndPeriod", "0"),
    ("StartRange", "0"),
    ("EndRange", "0"),
    ("RangeType", "0"),
];

impl StatsRequest {
    /// League game log of a season, the source of the season's game ids.
    pub fn league_game_log(season: &str, season_type: &str) -> Self {
        StatsRequest {
            endpoint: endpoints::LEAGUE_GAME_LOG,
            params: params(&[
                ("Counter", "0"),
                ("Direction", "ASC"),
                ("LeagueID", NBA_LEAGUE_ID),
                ("PlayerOrTeam", "T"),
                ("Season", season),
                ("SeasonType", season_type),
                ("Sorter", "DATE"),
            ]),
            extraction: Extraction::ResultSet(0),
        }
    }

    /// Request for one per-game category. Returns `None` for categories that
    /// are not fetched per game.
    pub fn for_game(
        category: Category,
        game_id: &str,
        season: &str,
        season_type: &str,
    ) -> Option<Self> {
        let endpoint = category.endpoint();
        let request = match category {
            Category::Box => StatsRequest {
                endpoint,
                params: Self::v3_box_params(game_id),
                extraction: Extraction::BoxScorePlayers("boxScoreTraditional"),
            },
            Category::PlayByPlay => StatsRequest {
                endpoint,
                params: params(&[("GameID", game_id), ("StartPeriod", "0"), ("EndPeriod", "0")]),
                extraction: Extraction::PlayByPlayActions,
            },
            Category::ShotChart => StatsRequest {
                endpoint,
                params: params(&[
                    ("ContextMeasure", "FGA"),
                    ("GameID", game_id),
                    ("LastNGames", "0"),
                    ("LeagueID", NBA_LEAGUE_ID),
                    ("Month", "0"),
                    ("OpponentTeamID", "0"),
                    ("Period", "0"),
                    ("PlayerID", "0"),
                    ("Season", season),
                    ("SeasonType", season_type),
                    ("TeamID", "0"),
                ]),
                extraction: Extraction::ResultSet(0),
            },
            Category::PlayerTracking => StatsRequest {
                endpoint,
                params: params(&[("GameID", game_id), ("LeagueID", NBA_LEAGUE_ID)]),
                extraction: Extraction::BoxScorePlayers("boxScorePlayerTrack"),
            },
            Category::AdvancedBox => StatsRequest {
                endpoint,
                params: Self::v3_box_params(game_id),
                extraction: Extraction::BoxScorePlayers("boxScoreAdvanced"),
            },
            Category::TeamAdvanced => {
                let mut p = params(&[("GameID", game_id)]);
                p.extend(params(&FULL_GAME_RANGE));
                StatsRequest {
                    endpoint,
                    params: p,
                    // resultSets[1] holds the team rows, [0] the players
                    extraction: Extraction::ResultSet(1),
                }
            }
            Category::TeamGameLogs => return None,
        };
        Some(request)
    }

    /// Season game log of one team.
    pub fn team_game_logs(team_id: u32, season: &str) -> Self {
        StatsRequest {
            endpoint: endpoints::TEAM_GAME_LOGS,
            params: vec![
                ("LeagueID", NBA_LEAGUE_ID.to_string()),
                ("Season", season.to_string()),
                ("TeamID", team_id.to_string()),
            ],
            extraction: Extraction::ResultSet(0),
        }
    }

    fn v3_box_params(game_id: &str) -> Vec<(&'static str, String)> {
        let mut p = params(&[("GameID", game_id), ("LeagueID", NBA_LEAGUE_ID)]);
        p.extend(
            FULL_GAME_RANGE
                .iter()
                .map(|(k, v)| (lower_first(k), v.to_string())),
        );
        p
    }

    /// Short identifier used in log lines.
    pub fn describe(&self) -> String {
        describe_request(self.endpoint, &self.params)
    }
}

/// The V3 endpoints spell their range parameters in camelCase.
fn lower_first(key: &'static str) -> &'static str {
    match key {
        "StartPeriod" => "startPeriod",
        "EndPeriod" => "endPeriod",
        "StartRange" => "startRange",
        "EndRange" => "endRange",
        "RangeType" => "rangeType",
        other => other,
    }
}

/// Client for the stats API bound to one base URL.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        StatsClient {
            client,
            base_url: base_url.into(),
        }
    }

    /// Builds a client with the configured timeout and base URL.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self::new(client, config.stats_base_url.clone()))
    }

    /// Performs a request and extracts its rows.
    #[instrument(skip_all, fields(endpoint = %request.describe()))]
    pub async fn fetch_table(&self, request: &StatsRequest) -> Result<Table, AppError> {
        let url = build_endpoint_url(&self.base_url, request.endpoint);
        let body: Value = fetch(&self.client, &url, &request.params).await?;
        request.extraction.extract(&body, &url)
    }

    /// Unique game identifiers of a season, in game log order.
    #[instrument(skip(self))]
    pub async fn fetch_game_ids(
        &self,
        season: &str,
        season_type: &str,
    ) -> Result<Vec<String>, AppError> {
        let request = StatsRequest::league_game_log(season, season_type);
        let table = self.fetch_table(&request).await?;
        let values = table.column_values(GAME_ID_COLUMN).ok_or_else(|| {
            AppError::api_unexpected_structure(
                format!("game log has no {GAME_ID_COLUMN} column"),
                build_endpoint_url(&self.base_url, request.endpoint),
            )
        })?;

        let mut seen = HashSet::new();
        let game_ids: Vec<String> = values
            .filter(|id| !id.is_empty() && seen.insert(*id))
            .map(str::to_string)
            .collect();
        info!("Found {} games for season {season}", game_ids.len());
        Ok(game_ids)
    }

    /// Full league schedule of a season.
    #[instrument(skip(self))]
    pub async fn fetch_schedule(&self, season: &str) -> Result<ScheduleResponse, AppError> {
        let url = build_endpoint_url(&self.base_url, endpoints::SCHEDULE_LEAGUE_V2);
        let query = [
            ("Season", season.to_string()),
            ("LeagueID", NBA_LEAGUE_ID.to_string()),
        ];
        fetch(&self.client, &url, &query).await
    }
}
