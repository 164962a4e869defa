//! Table Reconciler: combines per-category record lists into one wide table
//! keyed uniquely by (Player, Team), then projects it onto a declared
//! schema.
//!
//! Merge order is semantically significant: the standard table goes first
//! and the goalkeeping table second, so their values stay authoritative
//! when a later table carries the same field-key (`goals` appears in both
//! the standard and shooting tables). Colliding incoming columns are kept
//! under a disambiguated name and never overwrite anything.

pub mod schema;
pub mod table;

pub use schema::{
    ColumnLabel, DEFAULT_PROJECTION, FinalTable, ProjectionReport, SchemaProjection, StatTriple,
    project,
};
pub use table::{ColumnMeta, PlayerKey, ReconciledTable};

use std::collections::HashMap;

use tracing::{info, warn};

use crate::constants::NOT_AVAILABLE;
use crate::error::AppError;
use crate::extractor::PlayerRecord;

/// One source table's extracted records, tagged with the table's name.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub name: String,
    pub records: Vec<PlayerRecord>,
}

impl SourceTable {
    pub fn new(name: impl Into<String>, records: Vec<PlayerRecord>) -> Self {
        SourceTable {
            name: name.into(),
            records,
        }
    }
}

/// Core record fields exposed as reconciled columns, in output order.
/// Player and Team are the row key, not columns.
const CORE_COLUMNS: [&str; 5] = ["nationality", "Position", "Age", "minutes", "minutes_90s"];

fn core_value<'a>(record: &'a PlayerRecord, column: &str) -> Option<&'a str> {
    match column {
        "nationality" => Some(&record.nation),
        "Position" => Some(&record.position),
        "Age" => Some(&record.age),
        "minutes" => Some(&record.minutes),
        "minutes_90s" => Some(&record.minutes_90s),
        _ => None,
    }
}

/// Within one table, keep a single record per (Player, Team): the one with
/// the numerically greatest minutes, ties going to the first encountered.
fn dedup_records(records: Vec<PlayerRecord>) -> Vec<PlayerRecord> {
    let mut kept: Vec<PlayerRecord> = Vec::with_capacity(records.len());
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    for record in records {
        match index.get(&record.key()) {
            Some(&i) => {
                if record.minutes_value() > kept[i].minutes_value() {
                    kept[i] = record;
                }
            }
            None => {
                index.insert(record.key(), kept.len());
                kept.push(record);
            }
        }
    }
    kept
}

/// Union of column keys a table contributes: the core fields, then every
/// pass-through statistic key in first-encounter order.
fn table_columns(records: &[PlayerRecord]) -> Vec<String> {
    let mut columns: Vec<String> = CORE_COLUMNS.iter().map(|c| c.to_string()).collect();
    for record in records {
        for (key, _) in &record.stats {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Merge priority: standard first, keepers second, then encounter order.
fn merge_order(tables: Vec<SourceTable>) -> Vec<SourceTable> {
    let mut standard = None;
    let mut keepers = None;
    let mut rest = Vec::with_capacity(tables.len());
    for table in tables {
        match table.name.as_str() {
            "standard" => standard = Some(table),
            "keepers" => keepers = Some(table),
            _ => rest.push(table),
        }
    }
    let mut ordered = Vec::with_capacity(rest.len() + 2);
    ordered.extend(standard);
    ordered.extend(keepers);
    ordered.extend(rest);
    ordered
}

/// Combine every source table into one wide table by full outer join on
/// (Player, Team).
///
/// An empty source table degrades to a warning and is omitted from the
/// merge. The only fatal condition is that no table produced any record.
pub fn reconcile(tables: Vec<SourceTable>) -> Result<ReconciledTable, AppError> {
    let mut accumulator = ReconciledTable::default();

    for source in merge_order(tables) {
        if source.records.is_empty() {
            warn!("source table '{}' produced no records, omitting it from the merge", source.name);
            continue;
        }

        let records = dedup_records(source.records);
        let columns = table_columns(&records);
        let rows: Vec<(PlayerKey, Vec<String>)> = records
            .into_iter()
            .map(|record| {
                let key = PlayerKey::new(record.player.clone(), record.team.clone());
                let values = columns
                    .iter()
                    .map(|column| {
                        core_value(&record, column)
                            .or_else(|| record.stat(column))
                            .unwrap_or(NOT_AVAILABLE)
                            .to_string()
                    })
                    .collect();
                (key, values)
            })
            .collect();

        accumulator.merge_table(&source.name, &columns, rows);
        info!(
            "merged '{}': now {} players x {} columns",
            source.name,
            accumulator.len(),
            accumulator.column_count()
        );
    }

    if accumulator.is_empty() {
        return Err(AppError::NoRecords(
            "every source table was empty or failed".to_string(),
        ));
    }
    Ok(accumulator)
}
