//! Record Extractor: turns one raw source row into a normalized
//! [`PlayerRecord`], or rejects it.
//!
//! A row is rejected when it is not a data row at all (repeated header,
//! spacer, mid-season continuation), when it carries no player name, or when
//! it fails the minutes gate. Everything else degrades per field: a cell that
//! cannot be normalized becomes `"N/a"`, never an error.

pub mod fields;
pub mod record;
pub mod row;

pub use record::PlayerRecord;
pub use row::{RawCell, RawRow, RowClass};

use std::collections::HashSet;

use crate::constants::NOT_AVAILABLE;
use fields::{derive_age, first_position, link_label_or_text, nationality_code, text_or_not_available};

/// Set of field-keys the caller wants extracted. An empty set means
/// "everything the row has".
pub type FieldSet = HashSet<String>;

/// Field-keys required for identity and gating, independent of any schema.
pub const BASE_FIELD_KEYS: [&str; 8] = [
    "player",
    "team",
    "nationality",
    "position",
    "age",
    "birth_year",
    "minutes",
    "minutes_90s",
];

/// The base field-keys as an owned set, ready to be extended with a
/// schema's keys.
pub fn base_field_set() -> FieldSet {
    BASE_FIELD_KEYS.iter().map(|k| k.to_string()).collect()
}

/// Header label that marks a repeated in-table header row
const PLAYER_HEADER_LABEL: &str = "Player";

/// Minutes played for gating purposes, derived from the row's playing-time
/// cells. `None` means the row carries no playing-time cells at all and is
/// exempt from the gate; `Some(-1.0)` means a cell exists but no number
/// could be derived from it.
fn gate_minutes(minutes_text: Option<&str>, minutes_90s_text: Option<&str>) -> Option<f64> {
    let minutes_str = minutes_text.map(|t| t.replace(',', ""));
    let n90_str = minutes_90s_text.map(|t| t.replace(',', ""));
    if minutes_str.is_none() && n90_str.is_none() {
        return None;
    }

    let mut played = -1.0f64;
    if let Some(m) = minutes_str.as_deref()
        && !m.is_empty()
        && m.bytes().all(|b| b.is_ascii_digit())
    {
        played = m.parse().unwrap_or(-1.0);
    } else if let Some(n) = n90_str.as_deref()
        && !n.is_empty()
    {
        played = n.parse::<f64>().map(|v| v * 90.0).unwrap_or(-1.0);
    }
    Some(played)
}

/// Extract a normalized player record from one raw source row.
///
/// # Arguments
/// * `row` - one table row as emitted by the page layer
/// * `wanted` - field-keys to extract; pass an empty set to take every key
/// * `min_minutes` - minutes gate threshold
/// * `current_year` - reference year for age derivation
///
/// # Returns
/// `Some(PlayerRecord)` with all seven core fields populated, or `None`
/// when the row is rejected.
///
/// # Notes
/// - A row whose playing-time cells are wholly absent is exempt from the
///   minutes gate; some statistical tables omit those columns entirely.
/// - Each field-key is processed at most once per row; malformed markup
///   occasionally repeats a column and the first occurrence wins.
pub fn extract(
    row: &RawRow,
    wanted: &FieldSet,
    min_minutes: u32,
    current_year: i32,
) -> Option<PlayerRecord> {
    if row.class.is_non_data() {
        return None;
    }
    if !row.cells.iter().any(|c| !c.key.is_empty()) {
        return None;
    }

    let player_name = row.cell_text("player").unwrap_or("");
    if player_name.is_empty()
        || player_name == NOT_AVAILABLE
        || player_name == PLAYER_HEADER_LABEL
    {
        return None;
    }

    let minutes_str = row
        .cell_text("minutes")
        .map(|t| t.replace(',', ""))
        .unwrap_or_default();
    let n90_str = row
        .cell_text("minutes_90s")
        .map(|t| t.replace(',', ""))
        .unwrap_or_default();
    if let Some(played) = gate_minutes(row.cell_text("minutes"), row.cell_text("minutes_90s"))
        && played < f64::from(min_minutes)
    {
        return None;
    }

    let mut team: Option<String> = None;
    let mut nation: Option<String> = None;
    let mut position: Option<String> = None;
    let mut age: Option<String> = None;
    let mut age_derived = false;
    let mut minutes: Option<String> = None;
    let mut minutes_90s: Option<String> = None;
    let mut stats: Vec<(String, String)> = Vec::new();
    let mut processed: HashSet<&str> = HashSet::new();

    for cell in &row.cells {
        let key = cell.key.as_str();
        if key.is_empty() {
            continue;
        }
        if !wanted.is_empty() && !wanted.contains(key) {
            continue;
        }
        if !processed.insert(key) {
            continue;
        }

        match key {
            // Identity was already taken above; the cell itself adds nothing
            "player" => {}
            "team" => team = Some(link_label_or_text(&cell.text, cell.link_label.as_deref())),
            "nationality" => {
                nation = Some(nationality_code(&cell.text, cell.link_label.as_deref()));
            }
            "age" | "birth_year" => match derive_age(&cell.text, current_year) {
                Some(derived) => {
                    age = Some(derived);
                    age_derived = true;
                }
                None => {
                    // Keep the raw text only while no derivation has succeeded
                    if !age_derived && age.as_deref().is_none_or(|a| a == NOT_AVAILABLE) {
                        age = Some(text_or_not_available(&cell.text));
                    }
                }
            },
            "position" => position = Some(first_position(&cell.text)),
            "minutes" => {
                minutes = Some(if minutes_str.is_empty() {
                    "0".to_string()
                } else {
                    minutes_str.clone()
                });
            }
            "minutes_90s" => {
                minutes_90s = Some(if n90_str.is_empty() {
                    "0.0".to_string()
                } else {
                    n90_str.clone()
                });
            }
            _ => stats.push((key.to_string(), text_or_not_available(&cell.text))),
        }
    }

    // Backfill: a second lookup directly against the row for any core field
    // the cell loop left unset, so every record carries all seven.
    let team = team.unwrap_or_else(|| {
        row.cell("team")
            .map(|c| link_label_or_text(&c.text, c.link_label.as_deref()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    });
    let nation = nation.unwrap_or_else(|| {
        row.cell("nationality")
            .map(|c| nationality_code(&c.text, c.link_label.as_deref()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    });
    let position =
        position.unwrap_or_else(|| first_position(row.cell_text("position").unwrap_or("")));
    let age = if !age_derived && age.as_deref().is_none_or(|a| a == NOT_AVAILABLE) {
        row.cell_text("age")
            .and_then(|t| derive_age(t, current_year))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    } else {
        age.unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    let minutes = minutes.unwrap_or_else(|| {
        if minutes_str.is_empty() {
            "0".to_string()
        } else {
            minutes_str.clone()
        }
    });
    let minutes_90s = minutes_90s.unwrap_or_else(|| {
        if n90_str.is_empty() {
            "0.0".to_string()
        } else {
            n90_str.clone()
        }
    });

    Some(PlayerRecord {
        player: player_name.to_string(),
        team,
        nation,
        position,
        age,
        minutes,
        minutes_90s,
        stats,
    })
}
