//! Insert, bulk insert, get, delete, count.

use rusqlite::{params, Connection, OptionalExtension};

use codescope_core::constants::MAX_BULK_BATCH_SIZE;
use codescope_core::errors::{CodescopeError, CodescopeResult};
use codescope_core::models::{CodeFragment, NewCodeFragment};

use super::row::{format_timestamp, row_to_fragment, FRAGMENT_COLUMNS};
use crate::to_storage_err;

const INSERT_SQL: &str = "INSERT INTO code_chunks (
        id, tenant_id, repository_id, content, file_name, file_path, file_size,
        commit_number, embedding, dimensions, metadata, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";

/// Validate, materialize and insert one fragment.
pub fn insert_fragment(
    conn: &Connection,
    new: &NewCodeFragment,
    dimensions: usize,
) -> CodescopeResult<CodeFragment> {
    new.validate(dimensions)?;
    let fragment = new.materialize();
    write_row(conn, &fragment)?;
    Ok(fragment)
}

/// Insert many fragments in one transaction. Nothing is written if any
/// fragment fails validation or insertion.
pub fn bulk_insert_fragments(
    conn: &Connection,
    news: &[NewCodeFragment],
    dimensions: usize,
) -> CodescopeResult<Vec<CodeFragment>> {
    for new in news {
        new.validate(dimensions)?;
    }
    if news.is_empty() {
        return Ok(Vec::new());
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut saved = Vec::with_capacity(news.len());
    for (batch_idx, batch) in news.chunks(MAX_BULK_BATCH_SIZE).enumerate() {
        for new in batch {
            let fragment = new.materialize();
            write_row(&tx, &fragment)?;
            saved.push(fragment);
        }
        tracing::debug!(batch = batch_idx, rows = batch.len(), "inserted fragment batch");
    }
    tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
    Ok(saved)
}

fn write_row(conn: &Connection, fragment: &CodeFragment) -> CodescopeResult<()> {
    let metadata = serde_json::to_string(&fragment.metadata)?;
    let (blob, dims) = match &fragment.embedding {
        Some(e) => (Some(e.to_bytes()), Some(e.dimensions() as i64)),
        None => (None, None),
    };
    conn.execute(
        INSERT_SQL,
        params![
            fragment.id,
            fragment.tenant_id,
            fragment.repository_id,
            fragment.content,
            fragment.file_name,
            fragment.file_path,
            fragment.file_size,
            fragment.commit_number,
            blob,
            dims,
            metadata,
            format_timestamp(&fragment.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Fetch a fragment by id.
pub fn get_fragment(conn: &Connection, id: &str) -> CodescopeResult<Option<CodeFragment>> {
    let sql = format!("SELECT {FRAGMENT_COLUMNS} FROM code_chunks c WHERE c.id = ?1");
    conn.query_row(&sql, params![id], row_to_fragment)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Delete a fragment by id.
pub fn delete_fragment(conn: &Connection, id: &str) -> CodescopeResult<()> {
    let rows = conn
        .execute("DELETE FROM code_chunks WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(CodescopeError::FragmentNotFound { id: id.to_string() });
    }
    Ok(())
}

/// Total number of stored fragments across all tenants.
pub fn count_fragments(conn: &Connection) -> CodescopeResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM code_chunks", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}
