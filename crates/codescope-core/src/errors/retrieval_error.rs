/// Retrieval subsystem errors.
///
/// The search gateway never returns these to callers; they describe why a
/// request was turned into an empty result and are used in logs and by the
/// validation helpers.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("invalid scope: tenant_id and repository_id must both be present")]
    InvalidScope,

    #[error("invalid limit: {limit} (must be > 0)")]
    InvalidLimit { limit: i64 },

    #[error("empty query: no embeddings supplied")]
    EmptyQuery,
}
