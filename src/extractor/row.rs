//! Raw source-row representation handed to the extractor.
//!
//! A [`RawRow`] is one `<tr>` of one statistics table, reduced to an ordered
//! list of keyed cells. The page layer guarantees a cell for every data cell
//! the row contains; everything beyond that (missing fields, embedded links,
//! composite text) is the extractor's problem.

/// Qualitative classification of a table row, taken from the row's class
/// attribute. Only `Normal` rows can become player records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowClass {
    #[default]
    Normal,
    /// Repeated in-table header row
    HeaderSeparator,
    /// Continuation row of a player who switched teams mid-season
    Partial,
    /// Visual spacer with no data
    Spacer,
}

impl RowClass {
    /// Rows that never carry player data
    pub fn is_non_data(self) -> bool {
        !matches!(self, RowClass::Normal)
    }
}

/// One keyed cell of a source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    /// Machine name of the statistic, e.g. `goals` or `nationality`
    pub key: String,
    /// Flattened cell text, whitespace-normalized
    pub text: String,
    /// Label of the first hyperlink embedded in the cell, if any
    pub link_label: Option<String>,
}

impl RawCell {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        RawCell {
            key: key.into(),
            text: text.into(),
            link_label: None,
        }
    }

    pub fn with_link(key: impl Into<String>, text: impl Into<String>, link: impl Into<String>) -> Self {
        RawCell {
            key: key.into(),
            text: text.into(),
            link_label: Some(link.into()),
        }
    }
}

/// One raw row of one source table.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub class: RowClass,
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        RawRow {
            class: RowClass::Normal,
            cells,
        }
    }

    pub fn with_class(class: RowClass, cells: Vec<RawCell>) -> Self {
        RawRow { class, cells }
    }

    /// First cell carrying the given field-key. Source markup occasionally
    /// repeats a column; the first occurrence wins everywhere.
    pub fn cell(&self, key: &str) -> Option<&RawCell> {
        self.cells.iter().find(|c| c.key == key)
    }

    /// Text of the first cell carrying the given field-key, trimmed.
    pub fn cell_text(&self, key: &str) -> Option<&str> {
        self.cell(key).map(|c| c.text.trim())
    }
}
