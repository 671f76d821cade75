//! Multi-query sum-fusion ranking, scored and ordered inside SQLite.
//!
//! The per-query cosines of each candidate are fused by the
//! `codescope_fsum` / `codescope_fmax` functions in query order, so the
//! result carries the same bits as an in-process fold over the same values.

use rusqlite::{params, Connection};

use codescope_core::errors::CodescopeResult;
use codescope_core::models::{ScoreFields, ScoredFragment, TenantScope};

use super::row::{row_to_fragment, score_column, FRAGMENT_COLUMNS, FRAGMENT_COLUMN_COUNT};
use crate::pool::functions::pack_queries;
use crate::to_storage_err;

/// Top `limit` in-scope fragments by the sum of their valid per-query cosines.
///
/// Empty when `queries` is empty or any query is not `emb_dim` wide.
/// Order: fusion score desc (degenerate last), peak cosine desc,
/// `created_at` desc, insertion order.
pub fn rank_fusion(
    conn: &Connection,
    queries: &[Vec<f32>],
    scope: &TenantScope,
    emb_dim: usize,
    limit: usize,
) -> CodescopeResult<Vec<ScoredFragment>> {
    if queries.is_empty() || emb_dim == 0 || queries.iter().any(|q| q.len() != emb_dim) {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {FRAGMENT_COLUMNS},
                codescope_fsum(c.embedding, ?3, ?4) AS fusion_score,
                codescope_fmax(c.embedding, ?3, ?4) AS max_sim
         FROM code_chunks c
         WHERE c.tenant_id = ?1 AND c.repository_id = ?2
         ORDER BY fusion_score DESC NULLS LAST, max_sim DESC NULLS LAST,
                  c.created_at DESC, c.seq ASC
         LIMIT ?5"
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![
                scope.tenant_id,
                scope.repository_id,
                pack_queries(queries),
                emb_dim as i64,
                limit as i64
            ],
            |row| {
                let fragment = row_to_fragment(row)?;
                let fusion_score = score_column(row, FRAGMENT_COLUMN_COUNT)?;
                let max_sim = score_column(row, FRAGMENT_COLUMN_COUNT + 1)?;
                Ok(ScoredFragment::new(
                    fragment,
                    ScoreFields::Fusion {
                        fusion_score,
                        max_sim,
                    },
                ))
            },
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
