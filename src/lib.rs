//! NBA season statistics sync library
//!
//! This library fetches per-game statistics from the NBA stats API, keeps
//! them as incremental per-season CSV tables, and folds the seasons into
//! combined all-seasons tables.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nba_season_sync::app::{SyncSettings, run_sync};
//! use nba_season_sync::data_fetcher::{StatsClient, current_season};
//! use nba_season_sync::{AppError, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let client = StatsClient::from_config(&config)?;
//!
//!     // Sync the season in progress
//!     let settings = SyncSettings::from_config(&config, &current_season());
//!     let summary = run_sync(&client, &settings).await?;
//!
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod storage;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use app::{RunSummary, SyncSettings, run_sync};
pub use config::Config;
pub use data_fetcher::models::{Category, ScheduleResponse, Table};
pub use error::AppError;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
