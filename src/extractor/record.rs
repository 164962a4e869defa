//! Normalized per-player output of the extractor.

use crate::constants::NOT_AVAILABLE;

/// One player's normalized statistics for a single source table.
///
/// The seven core fields are always populated, to a real value or the
/// `"N/a"` / `"0"` defaults. Statistics that are not promoted to named
/// fields ride along in `stats`, in first-occurrence order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player: String,
    pub team: String,
    pub nation: String,
    pub position: String,
    pub age: String,
    pub minutes: String,
    pub minutes_90s: String,
    /// Pass-through statistic fields keyed by their source field-key
    pub stats: Vec<(String, String)>,
}

impl PlayerRecord {
    /// Pass-through statistic value by field-key.
    pub fn stat(&self, key: &str) -> Option<&str> {
        self.stats
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Minutes played as a number for ordering purposes. Unparseable
    /// minutes count as zero.
    pub fn minutes_value(&self) -> f64 {
        self.minutes.replace(',', "").parse::<f64>().unwrap_or(0.0)
    }

    /// (Player, Team) dedup key.
    pub fn key(&self) -> (String, String) {
        (self.player.clone(), self.team.clone())
    }
}

impl Default for PlayerRecord {
    fn default() -> Self {
        PlayerRecord {
            player: String::new(),
            team: NOT_AVAILABLE.to_string(),
            nation: NOT_AVAILABLE.to_string(),
            position: NOT_AVAILABLE.to_string(),
            age: NOT_AVAILABLE.to_string(),
            minutes: "0".to_string(),
            minutes_90s: "0.0".to_string(),
            stats: Vec::new(),
        }
    }
}
