pub mod parsers;

use std::path::Path;

use crate::db::{import_persons, Db, ImportSummary};
use crate::error::{Result, KinmcpError};
use crate::person::PersonRecord;

pub use parsers::{ParserRegistry, Parser};
pub use parsers::csv::{to_csv, CSV_HEADERS};

/// Read a member file and parse it with the parser matching its extension
pub fn read_records(path: &Path, registry: &ParserRegistry) -> Result<Vec<PersonRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let content = std::fs::read_to_string(path)
        .map_err(KinmcpError::Io)?;

    registry.parse(&content, &path.display().to_string(), &extension)
}

/// Convenience function to import a single file
///
/// Orchestrates the full pipeline: read → parse → upsert
pub async fn import_file(
    db: &Db,
    path: &Path,
    registry: &ParserRegistry,
) -> Result<ImportSummary> {
    let records = read_records(path, registry)?;
    log::info!("Read {} records from {}", records.len(), path.display());
    import_persons(db, records).await
}
