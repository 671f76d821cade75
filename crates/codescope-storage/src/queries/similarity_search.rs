//! Single-query ranking, scored and ordered inside SQLite.

use rusqlite::{params, Connection};

use codescope_core::errors::CodescopeResult;
use codescope_core::models::{f32s_to_bytes, ScoreFields, ScoredFragment, TenantScope};

use super::row::{row_to_fragment, score_column, FRAGMENT_COLUMNS, FRAGMENT_COLUMN_COUNT};
use crate::to_storage_err;

/// Top `limit` in-scope fragments by cosine to `query`.
///
/// Order: score desc (degenerate last), `created_at` desc, insertion order.
pub fn rank_single(
    conn: &Connection,
    query: &[f32],
    scope: &TenantScope,
    limit: usize,
) -> CodescopeResult<Vec<ScoredFragment>> {
    let sql = format!(
        "SELECT {FRAGMENT_COLUMNS}, codescope_cosine(c.embedding, ?3) AS score
         FROM code_chunks c
         WHERE c.tenant_id = ?1 AND c.repository_id = ?2
         ORDER BY score DESC NULLS LAST, c.created_at DESC, c.seq ASC
         LIMIT ?4"
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![
                scope.tenant_id,
                scope.repository_id,
                f32s_to_bytes(query),
                limit as i64
            ],
            |row| {
                let fragment = row_to_fragment(row)?;
                let score = score_column(row, FRAGMENT_COLUMN_COUNT)?;
                Ok(ScoredFragment::new(fragment, ScoreFields::Single { score }))
            },
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
