//! Transfer-value join: filters a transfer-market CSV down to the players
//! who logged real playing time in the exported statistics table, and
//! annotates them with their total minutes.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::analysis::clean_numeric;
use crate::csv;
use crate::error::AppError;

/// Column the joined minutes land in
const MINUTES_OUTPUT_COLUMN: &str = "Total_Minutes_Played";

/// Accepted alias for the player column in transfer CSVs
const PLAYER_ALIAS: &str = "player_name";

/// Statistics-side column names that carry minutes played, by preference
const MINUTES_CANDIDATES: [&str; 3] = ["Playing_Time_Min", "Min", "minutes"];

fn find_player_column(header: &[String], file: &str) -> Result<usize, AppError> {
    header
        .iter()
        .position(|h| h == "Player" || h == PLAYER_ALIAS)
        .ok_or_else(|| AppError::missing_column("Player", file))
}

/// Locate the minutes column: known names first, then a heuristic over the
/// remaining headers.
fn find_minutes_column(header: &[String]) -> Option<usize> {
    for candidate in MINUTES_CANDIDATES {
        if let Some(i) = header.iter().position(|h| h == candidate) {
            return Some(i);
        }
    }
    header.iter().position(|h| {
        let lower = h.to_lowercase();
        lower.contains("min") && (lower.contains("time") || lower.contains("play") || lower == "min")
    })
}

fn format_minutes(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Join transfer rows with minutes played and keep players above the floor.
///
/// # Arguments
/// * `transfers_path` - CSV with player/team/price columns (`player_name`
///   is accepted as an alias of `Player`)
/// * `stats_path` - the exported statistics CSV
/// * `output_path` - where the filtered CSV is written
/// * `min_minutes` - keep players with strictly more minutes than this
///
/// # Errors
/// Missing player or minutes columns are typed errors. An empty join
/// result is a warning; the output file is still written with its header.
pub async fn run_transfer_join(
    transfers_path: &str,
    stats_path: &str,
    output_path: &str,
    min_minutes: f64,
) -> Result<(), AppError> {
    let transfers_text = tokio::fs::read_to_string(transfers_path).await?;
    let (transfers_header, transfers_rows) = csv::split_header(csv::parse(&transfers_text));
    let stats_text = tokio::fs::read_to_string(stats_path).await?;
    let (stats_header, stats_rows) = csv::split_header(csv::parse(&stats_text));

    let transfer_player = find_player_column(&transfers_header, transfers_path)?;
    let stats_player = stats_header
        .iter()
        .position(|h| h == "Player")
        .ok_or_else(|| AppError::missing_column("Player", stats_path))?;
    let minutes_column = find_minutes_column(&stats_header)
        .ok_or_else(|| AppError::missing_column("minutes", stats_path))?;
    if !MINUTES_CANDIDATES.contains(&stats_header[minutes_column].as_str()) {
        warn!(
            "no standard minutes column found; using heuristic column '{}'",
            stats_header[minutes_column]
        );
    }
    info!(
        "using column '{}' from {stats_path} for the minutes filter",
        stats_header[minutes_column]
    );

    // First occurrence wins when a player appears twice above the floor
    let mut minutes_by_player: HashMap<&str, f64> = HashMap::new();
    for row in &stats_rows {
        let (Some(player), Some(value)) = (row.get(stats_player), row.get(minutes_column)) else {
            continue;
        };
        if let Some(minutes) = clean_numeric(value)
            && minutes > min_minutes
        {
            minutes_by_player.entry(player.as_str()).or_insert(minutes);
        }
    }
    info!(
        "{} players in {stats_path} with more than {min_minutes} minutes",
        minutes_by_player.len()
    );

    // Player leads, transfer columns follow, minutes close the row
    let mut out_header = vec!["Player".to_string()];
    let passthrough: Vec<usize> = (0..transfers_header.len())
        .filter(|&i| i != transfer_player)
        .collect();
    for &i in &passthrough {
        out_header.push(transfers_header[i].clone());
    }
    out_header.push(MINUTES_OUTPUT_COLUMN.to_string());

    let mut out_rows = vec![out_header];
    let mut kept = 0usize;
    for row in &transfers_rows {
        let Some(player) = row.get(transfer_player) else {
            continue;
        };
        let Some(&minutes) = minutes_by_player.get(player.as_str()) else {
            continue;
        };
        let mut out_row = vec![player.clone()];
        for &i in &passthrough {
            out_row.push(row.get(i).cloned().unwrap_or_default());
        }
        out_row.push(format_minutes(minutes));
        out_rows.push(out_row);
        kept += 1;
    }

    if kept == 0 {
        warn!(
            "no player in {transfers_path} clears the {min_minutes}-minute floor; writing header only"
        );
    }
    tokio::fs::write(output_path, csv::to_csv_string(&out_rows)).await?;
    info!(
        "kept {kept} of {} transfer rows, written to {output_path}",
        transfers_rows.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_find_minutes_column_prefers_known_names() {
        let header = strings(&["Player", "minutes", "Playing_Time_Min"]);
        assert_eq!(find_minutes_column(&header), Some(2));
        let header = strings(&["Player", "minutes"]);
        assert_eq!(find_minutes_column(&header), Some(1));
    }

    #[test]
    fn test_find_minutes_column_heuristic() {
        let header = strings(&["Player", "Time_Minutes_Total"]);
        assert_eq!(find_minutes_column(&header), Some(1));
        let header = strings(&["Player", "Goals"]);
        assert_eq!(find_minutes_column(&header), None);
    }

    #[test]
    fn test_player_alias_accepted() {
        let header = strings(&["player_name", "price"]);
        assert_eq!(find_player_column(&header, "t.csv").unwrap(), 0);
        let header = strings(&["team", "price"]);
        assert!(find_player_column(&header, "t.csv").is_err());
    }

    async fn write_fixtures(dir: &tempfile::TempDir) -> (String, String) {
        let transfers = dir.path().join("transfers.csv");
        let stats = dir.path().join("result.csv");
        tokio::fs::write(
            &transfers,
            "player_name,team,price,skill/pot\nA. Smith,X FC,€40M,85.0/90.0\nB. Bench,X FC,€5M,70.0/80.0\nC. Gone,Z FC,€10M,75.0/75.0\n",
        )
        .await
        .unwrap();
        tokio::fs::write(
            &stats,
            "Player,Team,Playing_Time_Min,Performance_Gls\nA. Smith,X FC,2700,12\nB. Bench,X FC,350,1\n",
        )
        .await
        .unwrap();
        (
            transfers.to_string_lossy().to_string(),
            stats.to_string_lossy().to_string(),
        )
    }

    #[tokio::test]
    async fn test_transfer_join_filters_and_annotates() {
        let dir = tempfile::tempdir().unwrap();
        let (transfers, stats) = write_fixtures(&dir).await;
        let output = dir.path().join("out.csv");
        run_transfer_join(&transfers, &stats, &output.to_string_lossy(), 900.0)
            .await
            .unwrap();

        let text = tokio::fs::read_to_string(&output).await.unwrap();
        let (header, rows) = csv::split_header(csv::parse(&text));
        assert_eq!(
            header,
            strings(&["Player", "team", "price", "skill/pot", "Total_Minutes_Played"])
        );
        // Only A. Smith clears 900 minutes; C. Gone has no statistics row
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "A. Smith");
        assert_eq!(rows[0][4], "2700");
    }

    #[tokio::test]
    async fn test_transfer_join_empty_result_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let (transfers, stats) = write_fixtures(&dir).await;
        let output = dir.path().join("out.csv");
        run_transfer_join(&transfers, &stats, &output.to_string_lossy(), 10_000.0)
            .await
            .unwrap();
        let text = tokio::fs::read_to_string(&output).await.unwrap();
        let (header, rows) = csv::split_header(csv::parse(&text));
        assert_eq!(header[0], "Player");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_transfer_join_missing_player_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let transfers = dir.path().join("transfers.csv");
        tokio::fs::write(&transfers, "name,price\nA,1\n").await.unwrap();
        let stats = dir.path().join("result.csv");
        tokio::fs::write(&stats, "Player,minutes\nA,1000\n").await.unwrap();
        let output = dir.path().join("out.csv");
        let result = run_transfer_join(
            &transfers.to_string_lossy(),
            &stats.to_string_lossy(),
            &output.to_string_lossy(),
            900.0,
        )
        .await;
        assert!(matches!(result, Err(AppError::MissingColumn { .. })));
    }
}
