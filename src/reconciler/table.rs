//! The growing wide-table accumulator the reconciler merges source tables
//! into.
//!
//! Column provenance (base field-key plus owning table) is tracked
//! explicitly, so collision handling and the projection's suffix fallback
//! are direct lookups instead of string-prefix scans.

use std::collections::HashMap;

use crate::constants::{NOT_AVAILABLE, SUFFIX_DELIMITER};

/// (Player, Team) identity of one merged row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerKey {
    pub player: String,
    pub team: String,
}

impl PlayerKey {
    pub fn new(player: impl Into<String>, team: impl Into<String>) -> Self {
        PlayerKey {
            player: player.into(),
            team: team.into(),
        }
    }
}

/// Provenance of one merged column.
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    /// Final column name, disambiguated on collision (`goals__shooting`)
    pub name: String,
    /// Original field-key before any disambiguation
    pub base: String,
    /// Source table that contributed the column
    pub table: String,
}

impl ColumnMeta {
    /// Whether this column needed a disambiguation suffix.
    pub fn is_suffixed(&self) -> bool {
        self.name != self.base
    }
}

/// Union of all source tables, keyed uniquely by (Player, Team).
#[derive(Debug, Default)]
pub struct ReconciledTable {
    columns: Vec<ColumnMeta>,
    column_index: HashMap<String, usize>,
    keys: Vec<PlayerKey>,
    key_index: HashMap<PlayerKey, usize>,
    rows: Vec<Vec<String>>,
}

impl ReconciledTable {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of merged (Player, Team) rows.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn keys(&self) -> &[PlayerKey] {
        &self.keys
    }

    /// Column index by exact (possibly suffixed) name.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    /// First suffixed column, in column order, whose base field-key matches.
    pub fn find_suffixed(&self, base: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.base == base && c.is_suffixed())
    }

    pub fn value(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    pub fn row(&self, row: usize) -> &[String] {
        &self.rows[row]
    }

    /// Merge one source table by full outer join on (Player, Team).
    ///
    /// Column names already present keep their accumulator column untouched;
    /// the incoming column is registered under `<key>__<table>`. Cells with
    /// no value on either side default to the `"N/a"` sentinel.
    ///
    /// `rows` must supply one value per entry of `column_keys`, in order.
    pub fn merge_table(
        &mut self,
        table: &str,
        column_keys: &[String],
        rows: Vec<(PlayerKey, Vec<String>)>,
    ) {
        let mut new_columns = Vec::with_capacity(column_keys.len());
        for key in column_keys {
            let name = if self.column_index.contains_key(key) {
                format!("{key}{SUFFIX_DELIMITER}{table}")
            } else {
                key.clone()
            };
            let index = self.columns.len();
            self.column_index.insert(name.clone(), index);
            self.columns.push(ColumnMeta {
                name,
                base: key.clone(),
                table: table.to_string(),
            });
            new_columns.push(index);
        }

        // Left side of the outer join: rows the incoming table knows
        // nothing about get the sentinel in every new column
        for row in &mut self.rows {
            row.resize(self.columns.len(), NOT_AVAILABLE.to_string());
        }

        for (key, values) in rows {
            debug_assert_eq!(values.len(), new_columns.len());
            let row_index = match self.key_index.get(&key) {
                Some(&i) => i,
                None => {
                    // Right side of the outer join: a fresh key gets the
                    // sentinel in every pre-existing column
                    let i = self.rows.len();
                    self.rows
                        .push(vec![NOT_AVAILABLE.to_string(); self.columns.len()]);
                    self.keys.push(key.clone());
                    self.key_index.insert(key, i);
                    i
                }
            };
            for (slot, value) in new_columns.iter().zip(values) {
                self.rows[row_index][*slot] = value;
            }
        }
    }
}
