//! Summary statistics over the exported wide table: top/bottom players per
//! statistic and per-team mean/median/standard deviation.

use tracing::{info, warn};

use crate::constants::{IDENTITY_COLUMNS, NUMERIC_COLUMN_RATIO};
use crate::csv;
use crate::error::AppError;

/// Parse a statistic value, tolerating percent signs and thousands
/// separators. `"N/a"` and friends simply fail to parse.
pub fn clean_numeric(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace('%', "").replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation; undefined for fewer than two values.
fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn format_stat(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => String::new(),
    }
}

/// Columns that participate in summary statistics: everything outside the
/// exclusion list where more than 10% of values parse as numbers. Returned
/// sorted by column name.
fn numeric_columns(header: &[String], rows: &[Vec<String>], exclude: &[String]) -> Vec<usize> {
    let mut columns: Vec<usize> = Vec::new();
    for (i, name) in header.iter().enumerate() {
        if exclude.contains(name) {
            continue;
        }
        let total = rows.len();
        if total == 0 {
            continue;
        }
        let parsed = rows
            .iter()
            .filter(|r| r.get(i).map(|v| clean_numeric(v).is_some()).unwrap_or(false))
            .count();
        if parsed as f64 / total as f64 > NUMERIC_COLUMN_RATIO {
            columns.push(i);
        }
    }
    columns.sort_by(|&a, &b| header[a].cmp(&header[b]));
    columns
}

/// Render the plain-text top/bottom 3 report.
fn top_bottom_report(
    header: &[String],
    rows: &[Vec<String>],
    stat_columns: &[usize],
    player_column: usize,
) -> String {
    let mut out = String::new();
    out.push_str("Top and Bottom 3 Players per Statistic\n");
    out.push_str("=======================================\n\n");

    for &column in stat_columns {
        let mut scored: Vec<(&str, f64)> = rows
            .iter()
            .filter_map(|r| {
                let value = r.get(column).and_then(|v| clean_numeric(v))?;
                Some((r.get(player_column)?.as_str(), value))
            })
            .collect();

        out.push_str(&format!("--- {} ---\n", header[column]));
        if scored.is_empty() {
            out.push_str("No valid numeric data for this statistic.\n\n");
            continue;
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        out.push_str("Top 3:\n");
        for (player, score) in scored.iter().take(3) {
            out.push_str(&format!("  - {player}: {score:.2}\n"));
        }
        out.push_str("\nBottom 3:\n");
        for (player, score) in scored.iter().rev().take(3) {
            out.push_str(&format!("  - {player}: {score:.2}\n"));
        }
        out.push_str("\n---------------------------------------\n\n");
    }
    out
}

/// Build the per-team summary table: `Team` first, then `Median of X`,
/// `Mean of X`, `Std of X` per statistic; the `all` row leads and teams
/// follow alphabetically.
fn summary_rows(
    header: &[String],
    rows: &[Vec<String>],
    stat_columns: &[usize],
    team_column: Option<usize>,
) -> Vec<Vec<String>> {
    let mut out_header = vec!["Team".to_string()];
    for &column in stat_columns {
        let stat = &header[column];
        out_header.push(format!("Median of {stat}"));
        out_header.push(format!("Mean of {stat}"));
        out_header.push(format!("Std of {stat}"));
    }

    let mut teams: Vec<&str> = Vec::new();
    if let Some(tc) = team_column {
        for row in rows {
            if let Some(team) = row.get(tc) {
                let team = team.as_str();
                if !team.eq_ignore_ascii_case("all") && !teams.contains(&team) {
                    teams.push(team);
                }
            }
        }
        teams.sort_unstable();
    }

    let mut table = vec![out_header];
    let mut push_group = |label: &str, group: Vec<&Vec<String>>| {
        let mut row = vec![label.to_string()];
        for &column in stat_columns {
            let values: Vec<f64> = group
                .iter()
                .filter_map(|r| r.get(column).and_then(|v| clean_numeric(v)))
                .collect();
            row.push(format_stat(median(&values), 3));
            row.push(format_stat(mean(&values), 3));
            row.push(format_stat(std_dev(&values), 3));
        }
        table.push(row);
    };

    push_group("all", rows.iter().collect());
    if let Some(tc) = team_column {
        for team in teams {
            let group: Vec<&Vec<String>> = rows
                .iter()
                .filter(|r| r.get(tc).map(|t| t == team).unwrap_or(false))
                .collect();
            push_group(team, group);
        }
    }
    table
}

/// Run the full summary over an exported statistics CSV.
///
/// Writes the top/bottom 3 report to `top_output` and the per-team
/// median/mean/std table to `summary_output`.
pub async fn run_summary(
    input: &str,
    top_output: &str,
    summary_output: &str,
) -> Result<(), AppError> {
    let text = tokio::fs::read_to_string(input).await?;
    let (header, rows) = csv::split_header(csv::parse(&text));
    if header.is_empty() || rows.is_empty() {
        return Err(AppError::NoRecords(format!("{input} is empty")));
    }
    info!("loaded {} players x {} columns from {input}", rows.len(), header.len());

    let player_column = header
        .iter()
        .position(|h| h == "Player")
        .ok_or_else(|| AppError::missing_column("Player", input))?;
    let team_column = header.iter().position(|h| h == "Team");
    if team_column.is_none() {
        warn!("no 'Team' column in {input}; per-team statistics will be skipped");
    }

    // Playing time identifies players, it is not a statistic to rank
    let mut exclude: Vec<String> = IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect();
    if header.iter().any(|h| h == "Playing_Time_Min") {
        exclude.push("Playing_Time_Min".to_string());
    } else if header.iter().any(|h| h == "Playing_Time_MP") {
        exclude.push("Playing_Time_MP".to_string());
    }

    let stat_columns = numeric_columns(&header, &rows, &exclude);
    if stat_columns.is_empty() {
        return Err(AppError::NoRecords(format!(
            "no numeric statistic columns identified in {input}"
        )));
    }
    info!("identified {} numeric statistic columns", stat_columns.len());

    let report = top_bottom_report(&header, &rows, &stat_columns, player_column);
    tokio::fs::write(top_output, report).await?;
    info!("top/bottom 3 report written to {top_output}");

    let summary = summary_rows(&header, &rows, &stat_columns, team_column);
    tokio::fs::write(summary_output, csv::to_csv_string(&summary)).await?;
    info!("median/mean/std summary written to {summary_output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_numeric() {
        assert_eq!(clean_numeric("5"), Some(5.0));
        assert_eq!(clean_numeric("71.4%"), Some(71.4));
        assert_eq!(clean_numeric("1,234"), Some(1234.0));
        assert_eq!(clean_numeric("N/a"), None);
        assert_eq!(clean_numeric(""), None);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_std_dev_is_sample_std() {
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = std_dev(&values).unwrap();
        assert!((s - 2.13809).abs() < 1e-4);
        assert_eq!(std_dev(&[1.0]), None);
    }

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_numeric_columns_respects_ratio_and_exclusions() {
        let header = strings(&["Player", "Team", "Gls", "Notes"]);
        let rows = vec![
            strings(&["A", "X", "5", "left club"]),
            strings(&["B", "X", "N/a", "loan"]),
            strings(&["C", "Y", "2", "captain"]),
        ];
        let exclude = vec!["Player".to_string(), "Team".to_string()];
        let columns = numeric_columns(&header, &rows, &exclude);
        assert_eq!(columns, vec![2]);
    }

    #[test]
    fn test_top_bottom_report_format() {
        let header = strings(&["Player", "Gls"]);
        let rows = vec![
            strings(&["A", "1"]),
            strings(&["B", "3"]),
            strings(&["C", "2"]),
            strings(&["D", "N/a"]),
        ];
        let report = top_bottom_report(&header, &rows, &[1], 0);
        assert!(report.contains("--- Gls ---"));
        let top_pos = report.find("  - B: 3.00").unwrap();
        let bottom_pos = report.find("  - A: 1.00").unwrap();
        assert!(top_pos < bottom_pos);
    }

    #[test]
    fn test_summary_rows_all_first_then_teams() {
        let header = strings(&["Player", "Team", "Gls"]);
        let rows = vec![
            strings(&["A", "Y FC", "2"]),
            strings(&["B", "X FC", "4"]),
            strings(&["C", "X FC", "6"]),
        ];
        let table = summary_rows(&header, &rows, &[2], Some(1));
        assert_eq!(table[0], strings(&["Team", "Median of Gls", "Mean of Gls", "Std of Gls"]));
        assert_eq!(table[1][0], "all");
        assert_eq!(table[1][1], "4.000");
        assert_eq!(table[2][0], "X FC");
        assert_eq!(table[2][2], "5.000");
        assert_eq!(table[3][0], "Y FC");
        // A single player per team has no sample deviation
        assert_eq!(table[3][3], "");
    }

    #[tokio::test]
    async fn test_run_summary_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("result.csv");
        let top = dir.path().join("top_3.txt");
        let summary = dir.path().join("results2.csv");
        let csv_text = "Player,Team,Gls,Ast\nA,X FC,5,2\nB,X FC,1,4\nC,Y FC,3,N/a\n";
        tokio::fs::write(&input, csv_text).await.unwrap();

        run_summary(
            &input.to_string_lossy(),
            &top.to_string_lossy(),
            &summary.to_string_lossy(),
        )
        .await
        .unwrap();

        let report = tokio::fs::read_to_string(&top).await.unwrap();
        assert!(report.contains("--- Ast ---"));
        assert!(report.contains("--- Gls ---"));

        let summary_text = tokio::fs::read_to_string(&summary).await.unwrap();
        let (header, rows) = csv::split_header(csv::parse(&summary_text));
        assert_eq!(header[0], "Team");
        assert_eq!(rows[0][0], "all");
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_run_summary_empty_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        tokio::fs::write(&input, "").await.unwrap();
        let result = run_summary(
            &input.to_string_lossy(),
            &dir.path().join("t.txt").to_string_lossy(),
            &dir.path().join("s.csv").to_string_lossy(),
        )
        .await;
        assert!(matches!(result, Err(AppError::NoRecords(_))));
    }
}
