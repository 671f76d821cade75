use crate::models::ScoredFragment;

/// Public retrieval contract. Never fails: invalid input and backend errors
/// both yield an empty list.
pub trait ISimilaritySearch: Send + Sync {
    /// Rank the scope's fragments against one query embedding.
    ///
    /// Empty when either id is blank, `limit <= 0`, or the embedding is empty
    /// or not of the deployment dimension.
    fn similarity_search(
        &self,
        embedding: &[f32],
        tenant_id: &str,
        repository_id: &str,
        limit: i64,
    ) -> Vec<ScoredFragment>;

    /// Rank the scope's fragments against several query embeddings with
    /// sum fusion.
    ///
    /// Empty when either id is blank, `limit <= 0`, `embeddings` is empty, or
    /// any embedding's length differs from `emb_dim`.
    fn fusion_search(
        &self,
        embeddings: &[Vec<f32>],
        tenant_id: &str,
        repository_id: &str,
        emb_dim: usize,
        limit: i64,
    ) -> Vec<ScoredFragment>;
}
