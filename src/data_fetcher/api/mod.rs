mod fetch_utils;
pub mod http_client;
pub mod schedule_api;
pub mod season_utils;
pub mod stats_api;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::create_http_client_with_timeout;
pub use schedule_api::upcoming_matchups;
pub use season_utils::{current_season, parse_season_label, season_for_date, season_label};
pub use stats_api::{StatsClient, StatsRequest};
