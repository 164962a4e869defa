use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Football Statistics Scraper
///
/// Fetches per-player statistics tables from the configured site (or from
/// saved pages), extracts normalized player records, reconciles the
/// per-category tables into one wide table and exports a deterministic CSV.
///
/// Auxiliary modes:
/// - --summary computes top/bottom players and per-team summary statistics
///   over an exported table
/// - --transfers joins a transfer-value CSV against the exported table
#[derive(Parser, Debug)]
#[command(author = "Niko Salonen", about, long_about = None, version)]
#[command(styles = get_styles())]
pub struct Args {
    /// Write the exported statistics table to this file.
    /// Defaults to the configured output path, or result.csv.
    #[arg(short = 'o', long = "output", help_heading = "Scrape Options")]
    pub output: Option<String>,

    /// Read saved pages (<table>.html) from this directory instead of the
    /// network. Useful for offline runs and reproducible tests.
    #[arg(long = "input-dir", help_heading = "Scrape Options")]
    pub input_dir: Option<String>,

    /// Minimum minutes played for a row to be kept. Rows from tables
    /// without playing-time columns are exempt.
    #[arg(long = "min-minutes", help_heading = "Scrape Options")]
    pub min_minutes: Option<u32>,

    /// Compute summary statistics over an exported table instead of
    /// scraping.
    #[arg(long = "summary", help_heading = "Analysis")]
    pub summary: bool,

    /// Statistics CSV read by the summary and transfer modes.
    /// Defaults to the scrape output location.
    #[arg(long = "stats-file", help_heading = "Analysis")]
    pub stats_file: Option<String>,

    /// Where the top/bottom 3 report is written.
    #[arg(long = "top-file", help_heading = "Analysis")]
    pub top_file: Option<String>,

    /// Where the per-team median/mean/std summary CSV is written.
    #[arg(long = "summary-file", help_heading = "Analysis")]
    pub summary_file: Option<String>,

    /// Join this transfer-value CSV against the exported table instead of
    /// scraping.
    #[arg(long = "transfers", value_name = "CSV", help_heading = "Transfers")]
    pub transfers: Option<String>,

    /// Where the filtered transfer CSV is written.
    #[arg(long = "transfers-output", help_heading = "Transfers")]
    pub transfers_output: Option<String>,

    /// Keep only players with strictly more than this many minutes.
    #[arg(long = "transfer-min-minutes", help_heading = "Transfers")]
    pub transfer_min_minutes: Option<f64>,

    /// Update the source domain in config.
    #[arg(long = "config", value_name = "DOMAIN", help_heading = "Configuration")]
    pub new_source_domain: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug mode, which mirrors the log output to stdout.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
