// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::Args;
use footstats::config::Config;
use footstats::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Validate argument combinations
    if args.summary && args.transfers.is_some() {
        return Err(AppError::config_error(
            "Cannot use both --summary and --transfers in one run",
        ));
    }

    let (log_file_path, _guard) = logging::setup_logging(&args).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    // Handle configuration operations first
    if args.list_config {
        Config::display().await?;
        return Ok(());
    }

    if args.new_source_domain.is_some() || args.new_log_file_path.is_some() || args.clear_log_file_path
    {
        let mut config = Config::load().await.unwrap_or_default();

        if let Some(new_domain) = args.new_source_domain {
            config.source_domain = new_domain;
        }

        if let Some(new_log_path) = args.new_log_file_path {
            config.log_file_path = Some(new_log_path);
        } else if args.clear_log_file_path {
            config.log_file_path = None;
            println!("Custom log file path cleared. Using default location.");
        }

        config.save().await?;
        println!("Config updated successfully!");
        return Ok(());
    }

    // Load config first to fail early if there's an issue
    let config = Config::load().await?;

    if args.summary {
        return commands::run_summary(&args, &config).await;
    }
    if let Some(transfers_path) = args.transfers.clone() {
        return commands::run_transfers(&args, &config, &transfers_path).await;
    }
    commands::run_scrape(&args, &config).await
}
