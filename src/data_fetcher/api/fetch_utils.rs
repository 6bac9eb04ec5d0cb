//! Generic HTTP fetching with status mapping and JSON error classification

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

use crate::error::AppError;

/// Performs a single GET against `url` with `params` and parses the JSON body.
///
/// Retrying is left to the caller's [`RetryPolicy`](crate::data_fetcher::retry::RetryPolicy);
/// this function makes exactly one request.
///
/// # Errors
/// * Network timeouts and connection failures map to `NetworkTimeout` /
///   `NetworkConnection`
/// * Non-success statuses map through [`AppError::from_status`]
/// * Unparsable bodies become `ApiNoData`, `ApiMalformedJson` or
///   `ApiUnexpectedStructure`
#[instrument(skip(client, params))]
pub(super) async fn fetch<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
) -> Result<T, AppError> {
    info!("Fetching data from URL: {url}");

    let response = match client.get(url).query(params).send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Request failed for URL {}: {}", url, e);
            return Err(if e.is_timeout() {
                AppError::network_timeout(url)
            } else if e.is_connect() {
                AppError::network_connection(url, e.to_string())
            } else {
                AppError::ApiFetch(e)
            });
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");
        error!("HTTP {} - {} (URL: {})", status_code, reason, url);
        return Err(AppError::from_status(status_code, reason, url));
    }

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(if e.is_timeout() {
                AppError::network_timeout(url)
            } else {
                AppError::ApiFetch(e)
            });
        }
    };

    debug!("Response length: {} bytes", response_text.len());

    match serde_json::from_str::<T>(&response_text) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            error!(
                "Response text (first 200 chars): {}",
                &response_text.chars().take(200).collect::<String>()
            );

            if response_text.trim().is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !response_text.trim_start().starts_with('{')
                && !response_text.trim_start().starts_with('[')
            {
                Err(AppError::api_malformed_json(
                    "Response is not valid JSON",
                    url,
                ))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header_exists, method, path, query_param},
    };

    #[tokio::test]
    async fn test_fetch_sends_query_and_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/leaguegamelog"))
            .and(query_param("SeasonType", "Regular Season"))
            .and(header_exists("referer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&mock_server)
            .await;

        let url = format!("{}/leaguegamelog", mock_server.uri());
        let body: Value = fetch(
            &create_test_http_client(),
            &url,
            &[("SeasonType", "Regular Season".to_string())],
        )
        .await
        .unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_fetch_maps_status_codes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let missing = fetch::<Value>(&client, &format!("{}/missing", mock_server.uri()), &[]).await;
        assert!(matches!(missing.unwrap_err(), AppError::ApiNotFound { .. }));

        let busy = fetch::<Value>(&client, &format!("{}/busy", mock_server.uri()), &[]).await;
        assert!(matches!(
            busy.unwrap_err(),
            AppError::ApiServiceUnavailable { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_classifies_bad_bodies() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let empty = fetch::<Value>(&client, &format!("{}/empty", mock_server.uri()), &[]).await;
        assert!(matches!(empty.unwrap_err(), AppError::ApiNoData { .. }));

        let html = fetch::<Value>(&client, &format!("{}/html", mock_server.uri()), &[]).await;
        assert!(matches!(html.unwrap_err(), AppError::ApiMalformedJson { .. }));
    }
}
