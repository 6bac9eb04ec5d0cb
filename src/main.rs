// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Args, is_config_operation};
use commands::{handle_config_update_command, handle_list_config_command, handle_sync_command};
use nba_season_sync::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Handle configuration operations before any logging or network setup
    if args.list_config {
        return handle_list_config_command().await;
    }
    if is_config_operation(&args) {
        return handle_config_update_command(&args).await;
    }

    let (log_file_path, _guard) = logging::setup_logging(&args).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    let summary = handle_sync_command(&args).await?;
    print!("{summary}");
    Ok(())
}
