use std::sync::Arc;

use crate::errors::CodescopeResult;
use crate::models::{ScoredFragment, TenantScope};

/// A backend able to rank the fragments of one scope against query embeddings.
///
/// Callers are expected to have validated scope, limit and dimensions (the
/// retrieval gateway does). Implementations must still return an empty list
/// for an empty or dimensionally inconsistent fusion query rather than a
/// partial ranking. `Err` is reserved for backend failures.
pub trait IFragmentRanker: Send + Sync {
    /// Rows ordered by `score` desc, `created_at` desc, scan order; at most `limit`.
    fn rank_single(
        &self,
        embedding: &[f32],
        scope: &TenantScope,
        limit: usize,
    ) -> CodescopeResult<Vec<ScoredFragment>>;

    /// One row per fragment, ordered by `fusion_score` desc, `max_sim` desc,
    /// `created_at` desc, scan order; at most `limit`.
    fn rank_fusion(
        &self,
        embeddings: &[Vec<f32>],
        scope: &TenantScope,
        emb_dim: usize,
        limit: usize,
    ) -> CodescopeResult<Vec<ScoredFragment>>;

    /// Short name used in logs.
    fn backend_name(&self) -> &'static str;
}

impl<T: IFragmentRanker> IFragmentRanker for Arc<T> {
    fn rank_single(&self, embedding: &[f32], scope: &TenantScope, limit: usize) -> CodescopeResult<Vec<ScoredFragment>> {
        (**self).rank_single(embedding, scope, limit)
    }
    fn rank_fusion(&self, embeddings: &[Vec<f32>], scope: &TenantScope, emb_dim: usize, limit: usize) -> CodescopeResult<Vec<ScoredFragment>> {
        (**self).rank_fusion(embeddings, scope, emb_dim, limit)
    }
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
