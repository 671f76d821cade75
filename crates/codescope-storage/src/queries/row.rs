//! Column list and row mapping shared by every fragment query.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use codescope_core::constants::DEGENERATE_SCORE;
use codescope_core::models::{CodeFragment, Embedding};

/// Fragment columns, table aliased as `c`. Indices 0..=10 in [`row_to_fragment`].
pub const FRAGMENT_COLUMNS: &str = "c.id, c.tenant_id, c.repository_id, c.content, \
     c.file_name, c.file_path, c.file_size, c.commit_number, c.embedding, c.metadata, \
     c.created_at";

/// Number of columns in [`FRAGMENT_COLUMNS`].
pub const FRAGMENT_COLUMN_COUNT: usize = 11;

/// Map a row selected with [`FRAGMENT_COLUMNS`] first.
pub fn row_to_fragment(row: &Row<'_>) -> rusqlite::Result<CodeFragment> {
    let embedding: Option<Vec<u8>> = row.get(8)?;
    let metadata_raw: String = row.get(9)?;
    let created_raw: String = row.get(10)?;

    let metadata = serde_json::from_str(&metadata_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;
    let created_at = parse_timestamp(&created_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?;

    Ok(CodeFragment {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        repository_id: row.get(2)?,
        content: row.get(3)?,
        file_name: row.get(4)?,
        file_path: row.get(5)?,
        file_size: row.get(6)?,
        commit_number: row.get(7)?,
        embedding: embedding.map(|b| Embedding::from_bytes(&b)),
        metadata,
        created_at,
    })
}

/// Read an optional score column; `NULL` is the degenerate sentinel.
pub fn score_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(DEGENERATE_SCORE))
}

/// Fixed-width RFC 3339 (microseconds, `Z`), so text order is time order.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|d| d.with_timezone(&Utc))
}
