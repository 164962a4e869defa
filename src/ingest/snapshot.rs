//! Local snapshot ingestion: reads saved `<table>.html` pages from a
//! directory instead of the network, for offline runs and tests.

use std::path::Path;

use tracing::debug;

use crate::error::AppError;

/// Read the saved page for one source table (`<name>.html` in `dir`).
pub async fn load_table_html(dir: &Path, name: &str) -> Result<String, AppError> {
    let path = dir.join(format!("{name}.html"));
    debug!("Reading snapshot: {}", path.display());
    Ok(tokio::fs::read_to_string(&path).await?)
}
