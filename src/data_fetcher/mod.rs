pub mod api;
pub mod game_fetcher;
pub mod models;
pub mod retry;

pub use api::{StatsClient, current_season};
pub use game_fetcher::{FetchOutcome, FetchPlan, GameFetcher};
pub use models::{Category, Table};
pub use retry::RetryPolicy;
