//! Schema projection: the caller-declared mapping from desired output
//! columns to source field-keys, and its application to a reconciled table.

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::constants::NOT_AVAILABLE;
use crate::extractor::{FieldSet, base_field_set};
use crate::reconciler::table::ReconciledTable;

/// One declared output column: a (Category, Sub-Category, Statistic) triple
/// mapped to a source field-key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatTriple {
    pub category: String,
    pub subcategory: String,
    pub statistic: String,
    pub field_key: String,
}

impl StatTriple {
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        statistic: impl Into<String>,
        field_key: impl Into<String>,
    ) -> Self {
        StatTriple {
            category: category.into(),
            subcategory: subcategory.into(),
            statistic: statistic.into(),
            field_key: field_key.into(),
        }
    }

    /// Human-readable label for diagnostics.
    pub fn label(&self) -> String {
        let parts: Vec<&str> = [
            self.category.as_str(),
            self.subcategory.as_str(),
            self.statistic.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
        parts.join(" / ")
    }
}

/// Ordered list of declared output columns.
#[derive(Debug, Clone, Default)]
pub struct SchemaProjection {
    pub triples: Vec<StatTriple>,
}

impl SchemaProjection {
    pub fn new(triples: Vec<StatTriple>) -> Self {
        SchemaProjection { triples }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Field-keys the extractor must collect for this schema: the declared
    /// keys plus the mandatory identity keys.
    pub fn wanted_fields(&self) -> FieldSet {
        let mut wanted = base_field_set();
        for triple in &self.triples {
            wanted.insert(triple.field_key.clone());
        }
        wanted
    }
}

/// The declared output schema, mirroring the statistics the site's category
/// tables expose. Identity triples (Nation, Position, Age) lead; the rest
/// map one statistic each to its source field-key.
const DEFAULT_SCHEMA_ENTRIES: &[(&str, &str, &str, &str)] = &[
    ("", "", "Nation", "nationality"),
    ("", "", "Position", "Position"),
    ("", "", "Age", "Age"),
    ("Playing Time", "", "MP", "games"),
    ("Playing Time", "", "Starts", "games_starts"),
    ("Playing Time", "", "Min", "minutes"),
    ("Performance", "", "Gls", "goals"),
    ("Performance", "", "Ast", "assists"),
    ("Performance", "", "CrdY", "cards_yellow"),
    ("Performance", "", "CrdR", "cards_red"),
    ("Expected", "", "xG", "xg"),
    ("Expected", "", "xAG", "xg_assist"),
    ("Progression", "", "PrgC", "progressive_carries"),
    ("Progression", "", "PrgP", "progressive_passes"),
    ("Progression", "", "PrgR", "progressive_passes_received"),
    ("Per 90 Minutes", "", "Gls", "goals_per90"),
    ("Per 90 Minutes", "", "Ast", "assists_per90"),
    ("Per 90 Minutes", "", "xG", "xg_per90"),
    ("Per 90 Minutes", "", "xGA", "xg_assist_per90"),
    ("Goalkeeping", "Performance", "GA90", "gk_goals_against_per90"),
    ("Goalkeeping", "Performance", "Save%", "gk_save_pct"),
    ("Goalkeeping", "Performance", "CS%", "gk_clean_sheets_pct"),
    ("Goalkeeping", "Penalty Kicks", "Save%", "gk_pens_save_pct"),
    ("Shooting", "Standard", "SoT%", "shots_on_target_pct"),
    ("Shooting", "Standard", "SoT/90", "shots_on_target_per90"),
    ("Shooting", "Standard", "G/Sh", "goals_per_shot"),
    ("Shooting", "Standard", "Dist", "average_shot_distance"),
    ("Passing", "Total", "Cmp", "passes_completed"),
    ("Passing", "Total", "Cmp%", "passes_pct"),
    ("Passing", "Total", "TotDist", "passes_total_distance"),
    ("Passing", "Short", "Cmp%", "passes_pct_short"),
    ("Passing", "Medium", "Cmp%", "passes_pct_medium"),
    ("Passing", "Long", "Cmp%", "passes_pct_long"),
    ("Passing", "Expected", "KP", "assisted_shots"),
    ("Passing", "Expected", "1/3", "passes_into_final_third"),
    ("Passing", "Expected", "PPA", "passes_into_penalty_area"),
    ("Passing", "Expected", "CrsPA", "crosses_into_penalty_area"),
    ("Passing", "Expected", "PrgP", "progressive_passes"),
    ("Goal and Shot Creation", "SCA", "SCA", "sca"),
    ("Goal and Shot Creation", "SCA", "SCA90", "sca_per90"),
    ("Goal and Shot Creation", "GCA", "GCA", "gca"),
    ("Goal and Shot Creation", "GCA", "GCA90", "gca_per90"),
    ("Defensive Actions", "Tackles", "Tkl", "tackles"),
    ("Defensive Actions", "Tackles", "TklW", "tackles_won"),
    ("Defensive Actions", "Challenges", "Att", "challenges"),
    ("Defensive Actions", "Challenges", "Lost", "challenges_lost"),
    ("Defensive Actions", "Blocks", "Blocks", "blocks"),
    ("Defensive Actions", "Blocks", "Sh", "blocked_shots"),
    ("Defensive Actions", "Blocks", "Pass", "blocked_passes"),
    ("Defensive Actions", "Blocks", "Int", "interceptions"),
    ("Possession", "Touches", "Touches", "touches"),
    ("Possession", "Touches", "Def Pen", "touches_def_pen_area"),
    ("Possession", "Touches", "Def 3rd", "touches_def_3rd"),
    ("Possession", "Touches", "Mid 3rd", "touches_mid_3rd"),
    ("Possession", "Touches", "Att 3rd", "touches_att_3rd"),
    ("Possession", "Touches", "Att Pen", "touches_att_pen_area"),
    ("Possession", "Take-Ons", "Att", "take_ons"),
    ("Possession", "Take-Ons", "Succ%", "take_ons_won_pct"),
    ("Possession", "Take-Ons", "Tkld%", "take_ons_tackled_pct"),
    ("Possession", "Carries", "Carries", "carries"),
    ("Possession", "Carries", "PrgDist", "carries_progressive_distance"),
    ("Possession", "Carries", "ProgC", "progressive_carries"),
    ("Possession", "Carries", "1/3", "carries_into_final_third"),
    ("Possession", "Carries", "CPA", "carries_into_penalty_area"),
    ("Possession", "Carries", "Mis", "miscontrols"),
    ("Possession", "Carries", "Dis", "dispossessed"),
    ("Possession", "Receiving", "Rec", "passes_received"),
    ("Possession", "Receiving", "PrgR", "progressive_passes_received"),
    ("Miscellaneous Stats", "Performance", "Fls", "fouls"),
    ("Miscellaneous Stats", "Performance", "Fld", "fouled"),
    ("Miscellaneous Stats", "Performance", "Off", "offsides"),
    ("Miscellaneous Stats", "Performance", "Crs", "crosses"),
    ("Miscellaneous Stats", "Performance", "Recov", "ball_recoveries"),
    ("Miscellaneous Stats", "Aerial Duels", "Won", "aerials_won"),
    ("Miscellaneous Stats", "Aerial Duels", "Lost", "aerials_lost"),
    ("Miscellaneous Stats", "Aerial Duels", "Won%", "aerials_won_pct"),
];

/// The built-in projection used when no explicit schema is supplied.
pub static DEFAULT_PROJECTION: Lazy<SchemaProjection> = Lazy::new(|| {
    SchemaProjection::new(
        DEFAULT_SCHEMA_ENTRIES
            .iter()
            .map(|(cat, sub, stat, key)| StatTriple::new(*cat, *sub, *stat, *key))
            .collect(),
    )
});

/// One column of the final table: either an identity column or a projected
/// statistic triple.
#[derive(Debug, Clone)]
pub enum ColumnLabel {
    Identity(String),
    Stat(StatTriple),
}

/// Terminal, exportable artifact: one row per (Player, Team), one column
/// per declared triple plus the identity columns.
#[derive(Debug, Default)]
pub struct FinalTable {
    pub labels: Vec<ColumnLabel>,
    pub rows: Vec<Vec<String>>,
}

impl FinalTable {
    pub fn column_count(&self) -> usize {
        self.labels.len()
    }
}

/// Diagnostics accumulated while projecting. Everything here is a warning,
/// never an error.
#[derive(Debug, Default)]
pub struct ProjectionReport {
    /// Declared triples with no matching source column
    pub unresolved: Vec<String>,
    /// Triples resolved through a disambiguated column
    pub suffixed: Vec<String>,
    /// Source columns no declared triple consumed
    pub dropped: Vec<String>,
}

impl ProjectionReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.suffixed.is_empty() && self.dropped.is_empty()
    }
}

/// Identity statistics pulled to the front of the declared order
const PRIORITY_STATISTICS: [&str; 3] = ["Nation", "Position", "Age"];

/// Order the schema's triples for output: identity triples first in their
/// fixed order, then the rest sorted lexicographically for determinism.
fn ordered_triples(schema: &SchemaProjection) -> Vec<&StatTriple> {
    let mut priority: Vec<&StatTriple> = Vec::new();
    for name in PRIORITY_STATISTICS {
        if let Some(triple) = schema
            .triples
            .iter()
            .find(|t| t.category.is_empty() && t.subcategory.is_empty() && t.statistic == name)
        {
            priority.push(triple);
        }
    }
    let mut rest: Vec<&StatTriple> = schema
        .triples
        .iter()
        .filter(|t| !priority.iter().any(|p| std::ptr::eq(*p, *t)))
        .collect();
    rest.sort();
    priority.extend(rest);
    priority
}

/// Project a reconciled table onto a declared schema.
///
/// Every declared triple always yields a column: verbatim field-key match
/// first, then the first disambiguated column with the same base, then a
/// column of `"N/a"` recorded as unresolved. Rows are sorted by player
/// name, case-insensitively. Never aborts.
pub fn project(table: &ReconciledTable, schema: &SchemaProjection) -> (FinalTable, ProjectionReport) {
    let triples = ordered_triples(schema);
    let mut report = ProjectionReport::default();

    // Resolve each triple to a source column up front
    let mut resolved: Vec<Option<usize>> = Vec::with_capacity(triples.len());
    let mut consumed_columns = vec![false; table.column_count()];
    let mut consumed_bases: Vec<&str> = Vec::new();
    for triple in &triples {
        let column = table.find_column(&triple.field_key).or_else(|| {
            let suffixed = table.find_suffixed(&triple.field_key);
            if let Some(i) = suffixed {
                report.suffixed.push(format!(
                    "used disambiguated column '{}' for {} (field-key: {})",
                    table.columns()[i].name,
                    triple.label(),
                    triple.field_key
                ));
            }
            suffixed
        });
        match column {
            Some(i) => {
                consumed_columns[i] = true;
                consumed_bases.push(&triple.field_key);
            }
            None => {
                report.unresolved.push(format!(
                    "missing statistic {} (field-key: {})",
                    triple.label(),
                    triple.field_key
                ));
            }
        }
        resolved.push(column);
    }

    // A column is only "dropped" when neither it nor a sibling sharing its
    // base field-key was consumed; the suffixed twin of a resolved column
    // is not noise worth reporting.
    for (i, meta) in table.columns().iter().enumerate() {
        if !consumed_columns[i] && !consumed_bases.iter().any(|b| *b == meta.base) {
            report.dropped.push(meta.name.clone());
        }
    }

    let mut labels: Vec<ColumnLabel> = vec![
        ColumnLabel::Identity("Player".to_string()),
        ColumnLabel::Identity("Team".to_string()),
    ];
    labels.extend(triples.iter().map(|t| ColumnLabel::Stat((*t).clone())));

    // Sort rows by player name, case-insensitive; the sort is stable so
    // equal names keep their merge order
    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by_key(|&i| table.keys()[i].player.to_lowercase());

    let mut rows = Vec::with_capacity(table.len());
    for i in order {
        let key = &table.keys()[i];
        let mut row = Vec::with_capacity(labels.len());
        row.push(key.player.clone());
        row.push(key.team.clone());
        for column in &resolved {
            row.push(match column {
                Some(c) => table.value(i, *c).to_string(),
                None => NOT_AVAILABLE.to_string(),
            });
        }
        rows.push(row);
    }

    for message in &report.unresolved {
        warn!("{message}");
    }
    for message in &report.suffixed {
        warn!("{message}");
    }
    if !report.dropped.is_empty() {
        debug!(
            "{} scraped columns not in the declared schema were dropped: {}",
            report.dropped.len(),
            report.dropped.join(", ")
        );
    }

    (FinalTable { labels, rows }, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::table::PlayerKey;

    fn sample_table() -> ReconciledTable {
        let mut table = ReconciledTable::default();
        table.merge_table(
            "standard",
            &["goals".to_string(), "minutes".to_string()],
            vec![
                (PlayerKey::new("Zed Last", "Y FC"), vec!["2".to_string(), "800".to_string()]),
                (PlayerKey::new("A. Smith", "X FC"), vec!["5".to_string(), "1000".to_string()]),
            ],
        );
        table
    }

    fn schema(entries: &[(&str, &str, &str, &str)]) -> SchemaProjection {
        SchemaProjection::new(
            entries
                .iter()
                .map(|(c, s, st, k)| StatTriple::new(*c, *s, *st, *k))
                .collect(),
        )
    }

    #[test]
    fn test_default_projection_shape() {
        let projection = &*DEFAULT_PROJECTION;
        assert!(!projection.is_empty());
        // Identity triples come from the same mapping
        assert!(projection.triples.iter().any(|t| t.statistic == "Nation"));
        // Schema keys plus identity keys form the wanted set
        let wanted = projection.wanted_fields();
        assert!(wanted.contains("player"));
        assert!(wanted.contains("birth_year"));
        assert!(wanted.contains("gk_save_pct"));
    }

    #[test]
    fn test_project_column_count_invariant() {
        let table = sample_table();
        let s = schema(&[
            ("Performance", "", "Gls", "goals"),
            ("Playing Time", "", "Min", "minutes"),
            ("Expected", "", "xG", "xg"),
        ]);
        let (final_table, report) = project(&table, &s);
        assert_eq!(final_table.column_count(), 2 + s.len());
        // xg exists nowhere, so it is unresolved but still a column
        assert_eq!(report.unresolved.len(), 1);
        for row in &final_table.rows {
            assert_eq!(row.len(), final_table.column_count());
        }
    }

    #[test]
    fn test_project_sorts_rows_by_player_case_insensitive() {
        let table = sample_table();
        let s = schema(&[("Performance", "", "Gls", "goals")]);
        let (final_table, _) = project(&table, &s);
        assert_eq!(final_table.rows[0][0], "A. Smith");
        assert_eq!(final_table.rows[1][0], "Zed Last");
    }

    #[test]
    fn test_project_round_trip_preserves_values() {
        let table = sample_table();
        let s = schema(&[
            ("Performance", "", "Gls", "goals"),
            ("Playing Time", "", "Min", "minutes"),
        ]);
        let (final_table, report) = project(&table, &s);
        assert!(report.unresolved.is_empty());
        assert!(report.dropped.is_empty());
        let smith = &final_table.rows[0];
        assert_eq!(smith[2..], ["5".to_string(), "1000".to_string()]);
    }

    #[test]
    fn test_project_unresolved_fills_not_available() {
        let table = sample_table();
        let s = schema(&[("Expected", "", "xG", "xg")]);
        let (final_table, report) = project(&table, &s);
        assert_eq!(report.unresolved.len(), 1);
        for row in &final_table.rows {
            assert_eq!(row[2], "N/a");
        }
    }

    #[test]
    fn test_suffixed_twin_of_resolved_column_is_not_dropped() {
        let mut table = sample_table();
        table.merge_table(
            "shooting",
            &["goals".to_string(), "shots".to_string()],
            vec![(
                PlayerKey::new("A. Smith", "X FC"),
                vec!["5".to_string(), "20".to_string()],
            )],
        );
        let s = schema(&[
            ("Performance", "", "Gls", "goals"),
            ("Shooting", "Standard", "Sh", "shots"),
            ("Playing Time", "", "Min", "minutes"),
        ]);
        let (final_table, report) = project(&table, &s);
        // goals resolves verbatim to the standard table's column
        assert!(report.suffixed.is_empty());
        // goals__shooting exists but is a twin of a consumed base, not noise
        assert!(report.dropped.is_empty());
        let smith = final_table
            .rows
            .iter()
            .find(|r| r[0] == "A. Smith")
            .unwrap();
        assert_eq!(smith[2], "5");
    }

    #[test]
    fn test_verbatim_match_wins_over_suffixed_twin() {
        let mut table = ReconciledTable::default();
        table.merge_table(
            "standard",
            &["shots_total".to_string()],
            vec![(PlayerKey::new("A. Smith", "X FC"), vec!["10".to_string()])],
        );
        table.merge_table(
            "shooting",
            &["shots_total".to_string()],
            vec![(PlayerKey::new("A. Smith", "X FC"), vec!["12".to_string()])],
        );
        let s = schema(&[("Shooting", "Standard", "Sh", "shots_total")]);
        let (final_table, report) = project(&table, &s);
        // The earliest-merged value is authoritative; the suffix path is a
        // fallback and stays unused while the bare name exists
        assert!(report.suffixed.is_empty());
        assert_eq!(final_table.rows[0][2], "10");
    }

    #[test]
    fn test_identity_triples_lead_and_rest_sorted() {
        let s = schema(&[
            ("Performance", "", "Gls", "goals"),
            ("", "", "Age", "Age"),
            ("", "", "Nation", "nationality"),
            ("Defensive Actions", "Tackles", "Tkl", "tackles"),
            ("", "", "Position", "Position"),
        ]);
        let table = sample_table();
        let (final_table, _) = project(&table, &s);
        let names: Vec<String> = final_table
            .labels
            .iter()
            .map(|l| match l {
                ColumnLabel::Identity(name) => name.clone(),
                ColumnLabel::Stat(t) => t.statistic.clone(),
            })
            .collect();
        assert_eq!(
            names,
            vec!["Player", "Team", "Nation", "Position", "Age", "Tkl", "Gls"]
        );
    }
}
