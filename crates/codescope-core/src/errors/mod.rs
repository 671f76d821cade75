//! Error types. One enum per subsystem, all convertible into [`CodescopeError`].

mod config_error;
mod embedding_error;
mod retrieval_error;
mod storage_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

/// Top-level error for every codescope operation.
#[derive(Debug, thiserror::Error)]
pub enum CodescopeError {
    #[error("fragment not found: {id}")]
    FragmentNotFound { id: String },

    #[error("invalid fragment: {reason}")]
    InvalidFragment { reason: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),
}

pub type CodescopeResult<T> = Result<T, CodescopeError>;
