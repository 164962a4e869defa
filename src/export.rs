//! Export of the final table as a deterministic, flat-named CSV.
//!
//! Composite (Category, Sub-Category, Statistic) labels are flattened into
//! single-level names, cleaned of characters that make downstream tools
//! unhappy, and de-duplicated with numeric suffixes. Identity columns lead,
//! the remaining columns follow in alphabetical order.

use std::collections::HashSet;

use tracing::info;

use crate::constants::IDENTITY_COLUMNS;
use crate::csv;
use crate::error::AppError;
use crate::reconciler::{ColumnLabel, FinalTable};

/// Clean one label part for use inside a flat column name.
fn clean_part(part: &str) -> String {
    // "+/-" must go first; its characters would otherwise be rewritten
    // one at a time
    let part = part.trim().replace("+/-", "_Net");
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        match c {
            ' ' | '/' | '-' => out.push('_'),
            '%' => out.push_str("Pct"),
            '#' => out.push_str("Num"),
            '&' => out.push_str("_and_"),
            '(' | ')' | ':' | '.' | '[' | ']' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Flatten one column label into a single-level name.
pub fn flatten_label(label: &ColumnLabel) -> String {
    match label {
        ColumnLabel::Identity(name) => name.clone(),
        ColumnLabel::Stat(triple) => {
            let parts: Vec<String> = [&triple.category, &triple.subcategory, &triple.statistic]
                .iter()
                .map(|p| clean_part(p))
                .filter(|p| !p.is_empty())
                .collect();
            parts.join("_")
        }
    }
}

/// Flatten every label, resolving duplicate flat names with numeric
/// suffixes (`X`, `X_1`, `X_2`, ...).
fn flatten_headers(table: &FinalTable) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(table.labels.len());
    for (i, label) in table.labels.iter().enumerate() {
        let mut base = flatten_label(label);
        if base.is_empty() {
            base = format!("col_{i}");
        }
        let mut name = base.clone();
        let mut counter = 1;
        while !seen.insert(name.clone()) {
            name = format!("{base}_{counter}");
            counter += 1;
        }
        names.push(name);
    }
    names
}

/// Render the final table as CSV text.
///
/// # Arguments
/// * `table` - the projected final table
/// * `schema_len` - number of declared schema triples, for the structural
///   invariant check
///
/// # Errors
/// `AppError::SchemaMismatch` when the flattened column count does not
/// match the declared schema size plus the two identity key columns. That
/// is a programmer error, not a data error, and aborts the export.
pub fn render_csv(table: &FinalTable, schema_len: usize) -> Result<String, AppError> {
    let expected = 2 + schema_len;
    if table.column_count() != expected {
        return Err(AppError::SchemaMismatch {
            expected,
            actual: table.column_count(),
        });
    }

    let headers = flatten_headers(table);
    for row in &table.rows {
        if row.len() != headers.len() {
            return Err(AppError::SchemaMismatch {
                expected: headers.len(),
                actual: row.len(),
            });
        }
    }

    // Identity columns first, the rest alphabetical
    let mut order: Vec<usize> = Vec::with_capacity(headers.len());
    for identity in IDENTITY_COLUMNS {
        if let Some(i) = headers.iter().position(|h| h == identity) {
            order.push(i);
        }
    }
    let mut rest: Vec<usize> = (0..headers.len()).filter(|i| !order.contains(i)).collect();
    rest.sort_by(|&a, &b| headers[a].cmp(&headers[b]));
    order.extend(rest);

    let mut out_rows: Vec<Vec<String>> =
        Vec::with_capacity(table.rows.len() + 1);
    out_rows.push(order.iter().map(|&i| headers[i].clone()).collect());
    for row in &table.rows {
        out_rows.push(order.iter().map(|&i| row[i].clone()).collect());
    }

    Ok(csv::to_csv_string(&out_rows))
}

/// Render and write the final table to disk.
pub async fn write_csv(table: &FinalTable, schema_len: usize, path: &str) -> Result<(), AppError> {
    let content = render_csv(table, schema_len)?;
    tokio::fs::write(path, content).await?;
    info!(
        "exported {} players x {} columns to {path}",
        table.rows.len(),
        table.column_count()
    );
    Ok(())
}
