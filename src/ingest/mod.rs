//! Page ingestion: fetches each statistics page (or reads a local
//! snapshot), locates its table and reduces it to extracted player records.
//!
//! One failed table degrades to an empty record list and a warning; the
//! reconciler decides later whether losing every table is fatal.

pub mod html;
pub mod http;
pub mod snapshot;

use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use tracing::{info, warn};

use crate::constants::POLITENESS_JITTER_MS;
use crate::error::AppError;
use crate::extractor::{self, FieldSet, PlayerRecord, base_field_set};
use crate::reconciler::SourceTable;

/// Coordinates of one source table on the statistics site.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Short name used for merge ordering and column disambiguation
    pub name: &'static str,
    /// URL path segment between the competition path and the page slug
    pub segment: &'static str,
    /// DOM id of the table on the page
    pub table_id: &'static str,
}

/// Every statistics category fetched per run, in fetch order. Merge
/// priority is decided later by name, not by this order.
pub const SOURCE_TABLES: [TableSpec; 8] = [
    TableSpec { name: "standard", segment: "stats", table_id: "stats_standard" },
    TableSpec { name: "shooting", segment: "shooting", table_id: "stats_shooting" },
    TableSpec { name: "passing", segment: "passing", table_id: "stats_passing" },
    TableSpec { name: "gca", segment: "gca", table_id: "stats_gca" },
    TableSpec { name: "defense", segment: "defense", table_id: "stats_defense" },
    TableSpec { name: "possession", segment: "possession", table_id: "stats_possession" },
    TableSpec { name: "misc", segment: "misc", table_id: "stats_misc" },
    TableSpec { name: "keepers", segment: "keepers", table_id: "stats_keeper" },
];

/// Where pages come from: the site itself, or a directory of saved pages.
pub enum PageSource {
    Remote {
        client: Client,
        domain: String,
        competition_path: String,
        competition_slug: String,
        politeness_delay_ms: u64,
    },
    Local { dir: PathBuf },
}

impl PageSource {
    /// URL of one table's page (remote sources only).
    pub fn table_url(&self, spec: &TableSpec) -> Option<String> {
        match self {
            PageSource::Remote {
                domain,
                competition_path,
                competition_slug,
                ..
            } => Some(format!(
                "{}/{}/{}/{}",
                domain.trim_end_matches('/'),
                competition_path.trim_matches('/'),
                spec.segment,
                competition_slug
            )),
            PageSource::Local { .. } => None,
        }
    }

    async fn page_html(&self, spec: &TableSpec) -> Result<(String, String), AppError> {
        match self {
            PageSource::Remote { client, .. } => {
                let url = self
                    .table_url(spec)
                    .unwrap_or_default();
                let body = http::fetch_page(client, &url).await?;
                Ok((body, url))
            }
            PageSource::Local { dir } => {
                let body = snapshot::load_table_html(dir, spec.name).await?;
                Ok((body, dir.join(format!("{}.html", spec.name)).display().to_string()))
            }
        }
    }

    /// Pause between remote fetches so the run reads like a human browsing,
    /// with a little jitter on top of the configured delay.
    async fn politeness_pause(&self) {
        if let PageSource::Remote {
            politeness_delay_ms, ..
        } = self
            && *politeness_delay_ms > 0
        {
            let jitter = SmallRng::from_os_rng().random_range(0..POLITENESS_JITTER_MS);
            tokio::time::sleep(Duration::from_millis(politeness_delay_ms + jitter)).await;
        }
    }
}

/// Reduce one page's HTML to extracted player records.
///
/// When `wanted` is empty, the field-keys to extract are inferred from the
/// table's own header instead.
pub fn records_from_page(
    page_html: &str,
    spec: &TableSpec,
    location: &str,
    wanted: &FieldSet,
    min_minutes: u32,
    current_year: i32,
) -> Result<Vec<PlayerRecord>, AppError> {
    let table = html::locate_table(page_html, spec.table_id)
        .ok_or_else(|| AppError::table_not_found(spec.name, location))?;

    let inferred: FieldSet;
    let effective = if wanted.is_empty() {
        let mut keys = base_field_set();
        keys.extend(html::header_keys(table));
        inferred = keys;
        &inferred
    } else {
        wanted
    };

    let rows = html::parse_rows(table);
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in &rows {
        match extractor::extract(row, effective, min_minutes, current_year) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    info!(
        "table '{}': {} rows, {} records collected, {} rows skipped",
        spec.name,
        rows.len(),
        records.len(),
        skipped
    );
    Ok(records)
}

/// Fetch and extract every source table, in fetch order.
///
/// A table that fails to fetch or parse contributes an empty record list;
/// the run carries on with whatever the remaining tables yield.
pub async fn fetch_all(
    source: &PageSource,
    wanted: &FieldSet,
    min_minutes: u32,
    current_year: i32,
) -> Vec<SourceTable> {
    let mut tables = Vec::with_capacity(SOURCE_TABLES.len());
    for (i, spec) in SOURCE_TABLES.iter().enumerate() {
        if i > 0 {
            source.politeness_pause().await;
        }
        let records = match source.page_html(spec).await {
            Ok((page, location)) => {
                match records_from_page(&page, spec, &location, wanted, min_minutes, current_year) {
                    Ok(records) => records,
                    Err(e) => {
                        warn!("table '{}' skipped: {e}", spec.name);
                        Vec::new()
                    }
                }
            }
            Err(e) => {
                warn!("fetching table '{}' failed: {e}", spec.name);
                Vec::new()
            }
        };
        tables.push(SourceTable::new(spec.name, records));
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &'static str, table_id: &'static str) -> TableSpec {
        TableSpec {
            name,
            segment: name,
            table_id,
        }
    }

    const PAGE: &str = r#"<html><body>
        <table id="stats_standard" class="stats_table">
        <tbody>
          <tr>
            <td data-stat="player">A. Smith</td>
            <td data-stat="team"><a href="/t">X FC</a></td>
            <td data-stat="minutes">1,000</td>
            <td data-stat="goals">5</td>
          </tr>
          <tr>
            <td data-stat="player">B. Bench</td>
            <td data-stat="team"><a href="/t">X FC</a></td>
            <td data-stat="minutes">12</td>
            <td data-stat="goals">0</td>
          </tr>
        </tbody>
        </table></body></html>"#;

    #[test]
    fn test_records_from_page_applies_minutes_gate() {
        let records = records_from_page(
            PAGE,
            &spec("standard", "stats_standard"),
            "test",
            &FieldSet::new(),
            90,
            2025,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].player, "A. Smith");
        assert_eq!(records[0].minutes, "1000");
    }

    #[test]
    fn test_records_from_page_missing_table() {
        let result = records_from_page(
            "<html><body></body></html>",
            &spec("standard", "stats_standard"),
            "test",
            &FieldSet::new(),
            90,
            2025,
        );
        assert!(matches!(result, Err(AppError::TableNotFound { .. })));
    }

    #[test]
    fn test_table_url_layout() {
        let source = PageSource::Remote {
            client: Client::new(),
            domain: "https://example.com/".to_string(),
            competition_path: "en/comps/9".to_string(),
            competition_slug: "Premier-League-Stats".to_string(),
            politeness_delay_ms: 0,
        };
        let url = source.table_url(&spec("shooting", "stats_shooting")).unwrap();
        assert_eq!(url, "https://example.com/en/comps/9/shooting/Premier-League-Stats");
    }

    #[tokio::test]
    async fn test_fetch_all_local_degrades_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("standard.html"), PAGE)
            .await
            .unwrap();
        let source = PageSource::Local {
            dir: dir.path().to_path_buf(),
        };
        let tables = fetch_all(&source, &FieldSet::new(), 90, 2025).await;
        assert_eq!(tables.len(), SOURCE_TABLES.len());
        assert_eq!(tables[0].name, "standard");
        assert_eq!(tables[0].records.len(), 1);
        // Every other snapshot is missing and degrades to empty
        assert!(tables[1..].iter().all(|t| t.records.is_empty()));
    }
}
