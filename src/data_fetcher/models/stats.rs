//! Shapes of the stats API responses and their conversion into tables
//!
//! The API answers in two styles. Older endpoints return `resultSets`, each a
//! list of `headers` and a `rowSet` of positional rows. The V3 box score and
//! play-by-play endpoints return nested objects which are flattened here into
//! one row per player or per action.

use super::table::{Table, cell_text};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tabular block of a `resultSets` style response.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    pub headers: Vec<String>,
    #[serde(rename = "rowSet")]
    pub row_set: Vec<Vec<Value>>,
}

impl From<ResultSet> for Table {
    fn from(set: ResultSet) -> Self {
        let rows = set
            .row_set
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        Table::with_rows(set.headers, rows)
    }
}

/// Where the rows of an endpoint's response live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// `resultSets[n]` (or a singular `resultSet`).
    ResultSet(usize),
    /// Players of both teams below the named V3 box score root.
    BoxScorePlayers(&'static str),
    /// `game.actions` of the V3 play-by-play.
    PlayByPlayActions,
}

impl Extraction {
    /// Converts a parsed response body into a table.
    pub fn extract(self, body: &Value, url: &str) -> Result<Table, AppError> {
        match self {
            Extraction::ResultSet(index) => extract_result_set(body, index, url),
            Extraction::BoxScorePlayers(root) => extract_box_score_players(body, root, url),
            Extraction::PlayByPlayActions => extract_play_by_play(body, url),
        }
    }
}

fn extract_result_set(body: &Value, index: usize, url: &str) -> Result<Table, AppError> {
    let set = match (body.get("resultSets"), body.get("resultSet")) {
        (Some(Value::Array(sets)), _) => sets.get(index),
        (_, Some(Value::Array(sets))) => sets.get(index),
        (_, Some(single @ Value::Object(_))) if index == 0 => Some(single),
        _ => None,
    }
    .ok_or_else(|| {
        AppError::api_unexpected_structure(format!("result set {index} is missing"), url)
    })?;

    let set: ResultSet = serde_json::from_value(set.clone())
        .map_err(|e| AppError::api_unexpected_structure(e.to_string(), url))?;
    Ok(set.into())
}

/// Scalar fields of an object as (key, cell) pairs, in response order.
fn scalar_fields(object: &Map<String, Value>) -> impl Iterator<Item = (String, String)> + '_ {
    object
        .iter()
        .filter(|(_, v)| !v.is_object() && !v.is_array())
        .map(|(k, v)| (k.clone(), cell_text(v)))
}

fn extract_box_score_players(body: &Value, root: &str, url: &str) -> Result<Table, AppError> {
    let root_obj = body.get(root).and_then(Value::as_object).ok_or_else(|| {
        AppError::api_unexpected_structure(format!("'{root}' object is missing"), url)
    })?;
    let game_id = root_obj.get("gameId").map(cell_text).unwrap_or_default();

    let mut table = Table::default();
    for side in ["homeTeam", "awayTeam"] {
        let Some(team) = root_obj.get(side).and_then(Value::as_object) else {
            continue;
        };
        let team_fields: Vec<(String, String)> = scalar_fields(team).collect();
        let players = team
            .get("players")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for player in players.iter().filter_map(Value::as_object) {
            let mut record = vec![("gameId".to_string(), game_id.clone())];
            record.extend(team_fields.iter().cloned());
            record.extend(scalar_fields(player));
            if let Some(stats) = player.get("statistics").and_then(Value::as_object) {
                record.extend(scalar_fields(stats));
            }
            table.push_record(record);
        }
    }
    Ok(table)
}

fn extract_play_by_play(body: &Value, url: &str) -> Result<Table, AppError> {
    let game = body
        .get("game")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::api_unexpected_structure("'game' object is missing", url))?;
    let game_id = game.get("gameId").map(cell_text).unwrap_or_default();
    let actions = game
        .get("actions")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::api_unexpected_structure("'game.actions' is missing", url))?;

    let mut table = Table::default();
    for action in actions.iter().filter_map(Value::as_object) {
        let mut record = vec![("gameId".to_string(), game_id.clone())];
        record.extend(scalar_fields(action));
        table.push_record(record);
    }
    Ok(table)
}
