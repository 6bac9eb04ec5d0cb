//! HTTP client creation and configuration utilities

use crate::constants::headers;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};
use std::time::Duration;

/// Headers the stats API requires; requests without a browser-like
/// User-Agent and nba.com Referer/Origin are silently dropped upstream.
fn stats_api_headers() -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(USER_AGENT, HeaderValue::from_static(headers::USER_AGENT));
    map.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    map.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(headers::ACCEPT_LANGUAGE),
    );
    map.insert(REFERER, HeaderValue::from_static(headers::REFERER));
    map.insert(ORIGIN, HeaderValue::from_static(headers::ORIGIN));
    map.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    map
}

/// Creates an HTTP client for the stats API with the given request timeout.
///
/// # Features
/// * Per-request timeout (default: 30 seconds, configurable via config/env)
/// * Small idle connection pool, requests are strictly sequential
/// * Browser-like default headers
pub fn create_http_client_with_timeout(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .default_headers(stats_api_headers())
        .build()
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS)
        .expect("Failed to create test HTTP client")
}
