//! Football Statistics Scraper Library
//!
//! This library fetches per-player football statistics tables from a
//! statistics site (or from saved pages), extracts normalized player
//! records, reconciles the per-category tables into one wide table keyed by
//! (Player, Team), and exports a deterministic CSV. Auxiliary modules
//! compute summary statistics and join transfer values.
//!
//! # Examples
//!
//! ```rust
//! use footstats::extractor::{self, FieldSet, RawCell, RawRow};
//! use footstats::reconciler::{self, SchemaProjection, SourceTable, StatTriple};
//!
//! // One raw row from the "standard" table
//! let row = RawRow::new(vec![
//!     RawCell::new("player", "A. Smith"),
//!     RawCell::new("team", "X FC"),
//!     RawCell::new("minutes", "1000"),
//!     RawCell::new("goals", "5"),
//! ]);
//! let record = extractor::extract(&row, &FieldSet::new(), 90, 2025)
//!     .expect("row passes the minutes gate");
//!
//! // Reconcile and project onto a one-statistic schema
//! let table = reconciler::reconcile(vec![SourceTable::new("standard", vec![record])]).unwrap();
//! let schema = SchemaProjection::new(vec![StatTriple::new("Performance", "", "Gls", "goals")]);
//! let (final_table, report) = reconciler::project(&table, &schema);
//!
//! assert!(report.unresolved.is_empty());
//! assert_eq!(final_table.rows[0], vec!["A. Smith", "X FC", "5"]);
//! ```

pub mod analysis;
pub mod config;
pub mod constants;
pub mod csv;
pub mod error;
pub mod export;
pub mod extractor;
pub mod ingest;
pub mod reconciler;
pub mod transfers;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use extractor::{FieldSet, PlayerRecord, RawCell, RawRow, RowClass, extract};
pub use reconciler::{
    DEFAULT_PROJECTION, FinalTable, ReconciledTable, SchemaProjection, SourceTable, StatTriple,
    project, reconcile,
};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
