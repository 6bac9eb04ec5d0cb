//! URL building utilities for stats API endpoints

/// Builds the URL of a stats endpoint. Query parameters are attached by the
/// request builder.
///
/// # Example
/// ```
/// use nba_season_sync::data_fetcher::api::build_endpoint_url;
///
/// let url = build_endpoint_url("https://stats.nba.com/stats/", "leaguegamelog");
/// assert_eq!(url, "https://stats.nba.com/stats/leaguegamelog");
/// ```
pub fn build_endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{endpoint}", base_url.trim_end_matches('/'))
}

/// Builds a human-readable request key for logs, e.g.
/// `teamgamelogs?TeamID=1610612747&Season=2023-24`.
///
/// # Example
/// ```
/// use nba_season_sync::data_fetcher::api::describe_request;
///
/// let key = describe_request("playbyplayv3", &[("GameID", "0022300001".to_string())]);
/// assert_eq!(key, "playbyplayv3?GameID=0022300001");
/// ```
pub fn describe_request(endpoint: &str, params: &[(&str, String)]) -> String {
    let relevant: Vec<String> = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .filter(|(k, _)| matches!(*k, "GameID" | "TeamID" | "Season" | "SeasonType"))
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    if relevant.is_empty() {
        endpoint.to_string()
    } else {
        format!("{endpoint}?{}", relevant.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        assert_eq!(
            build_endpoint_url("http://127.0.0.1:9000/", "scheduleleaguev2"),
            "http://127.0.0.1:9000/scheduleleaguev2"
        );
    }

    #[test]
    fn test_describe_request_keeps_identifying_params() {
        let params = vec![
            ("GameID", "0022300001".to_string()),
            ("LeagueID", "00".to_string()),
            ("StartPeriod", "0".to_string()),
        ];
        assert_eq!(
            describe_request("boxscoreadvancedv2", &params),
            "boxscoreadvancedv2?GameID=0022300001"
        );
        assert_eq!(describe_request("scheduleleaguev2", &[]), "scheduleleaguev2");
    }
}
