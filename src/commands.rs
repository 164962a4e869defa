use std::path::PathBuf;

use chrono::{Datelike, Utc};
use tracing::info;

use crate::cli::Args;
use footstats::config::Config;
use footstats::constants::{DEFAULT_TRANSFER_MIN_MINUTES, output};
use footstats::error::AppError;
use footstats::export;
use footstats::ingest::{self, PageSource, http::create_http_client};
use footstats::reconciler::{DEFAULT_PROJECTION, project, reconcile};
use footstats::{analysis, transfers};

/// Statistics CSV location shared by every mode: explicit flag first, then
/// the configured output path, then the default file name.
fn stats_path(explicit: Option<&String>, config: &Config) -> String {
    explicit
        .cloned()
        .or_else(|| config.output_path.clone())
        .unwrap_or_else(|| output::RESULT_FILE.to_string())
}

/// Full scrape run: fetch every source table, reconcile, project onto the
/// declared schema and export the CSV.
pub async fn run_scrape(args: &Args, config: &Config) -> Result<(), AppError> {
    let schema = &*DEFAULT_PROJECTION;
    let wanted = schema.wanted_fields();
    let min_minutes = args.min_minutes.unwrap_or(config.min_minutes);
    let current_year = Utc::now().year();

    let source = match &args.input_dir {
        Some(dir) => {
            info!("reading saved pages from {dir}");
            PageSource::Local {
                dir: PathBuf::from(dir),
            }
        }
        None => PageSource::Remote {
            client: create_http_client(config.http_timeout_seconds)?,
            domain: config.source_domain.clone(),
            competition_path: config.competition_path.clone(),
            competition_slug: config.competition_slug.clone(),
            politeness_delay_ms: config.politeness_delay_ms,
        },
    };

    let tables = ingest::fetch_all(&source, &wanted, min_minutes, current_year).await;
    let reconciled = reconcile(tables)?;
    let (final_table, report) = project(&reconciled, schema);

    let output_path = stats_path(args.output.as_ref(), config);
    export::write_csv(&final_table, schema.len(), &output_path).await?;

    println!(
        "Exported {} players x {} columns to {output_path}",
        final_table.rows.len(),
        final_table.column_count()
    );
    if !report.is_clean() {
        println!(
            "Diagnostics: {} unresolved statistics, {} resolved through suffixed columns, {} scraped columns dropped (see log for details)",
            report.unresolved.len(),
            report.suffixed.len(),
            report.dropped.len()
        );
    }
    Ok(())
}

/// Summary mode: top/bottom 3 players and per-team median/mean/std over an
/// exported table.
pub async fn run_summary(args: &Args, config: &Config) -> Result<(), AppError> {
    let input = stats_path(args.stats_file.as_ref(), config);
    let top_output = args
        .top_file
        .clone()
        .unwrap_or_else(|| output::TOP_BOTTOM_FILE.to_string());
    let summary_output = args
        .summary_file
        .clone()
        .unwrap_or_else(|| output::SUMMARY_FILE.to_string());

    analysis::run_summary(&input, &top_output, &summary_output).await?;
    println!("Summary written to {top_output} and {summary_output}");
    Ok(())
}

/// Transfer mode: join a transfer-value CSV against the exported table.
pub async fn run_transfers(
    args: &Args,
    config: &Config,
    transfers_path: &str,
) -> Result<(), AppError> {
    let stats = stats_path(args.stats_file.as_ref(), config);
    let output_path = args
        .transfers_output
        .clone()
        .unwrap_or_else(|| output::TRANSFERS_FILE.to_string());
    let min_minutes = args
        .transfer_min_minutes
        .unwrap_or(DEFAULT_TRANSFER_MIN_MINUTES);

    transfers::run_transfer_join(transfers_path, &stats, &output_path, min_minutes).await?;
    println!("Filtered transfers written to {output_path}");
    Ok(())
}
