//! RetrievalGateway: the fail-soft search entry point.
//!
//! Validates scope, limit and dimensions, dispatches to the backend chosen at
//! construction, and turns every rejection or backend failure into an empty
//! result. Validation rejections log at `debug` (`warn` for dimension
//! mismatches); backend failures log at `error`.

use std::sync::Arc;

use tracing::{debug, error, warn};

use codescope_core::config::defaults::{
    DEFAULT_README_FILE_NAME, DEFAULT_REPO_LISTING_LIMIT, DEFAULT_SEARCH_LIMIT,
};
use codescope_core::errors::{CodescopeResult, EmbeddingError, RetrievalError};
use codescope_core::models::{CodeFragment, ScoredFragment, TenantScope};
use codescope_core::traits::{ICodeFragmentStorage, IFragmentRanker, ISimilaritySearch};
use codescope_core::CodescopeConfig;
use codescope_storage::StorageEngine;

use crate::reference::InMemoryFragmentStore;

pub struct RetrievalGateway {
    ranker: Arc<dyn IFragmentRanker>,
    storage: Arc<dyn ICodeFragmentStorage>,
    /// Deployment embedding dimension.
    dimensions: usize,
    default_limit: i64,
    repo_listing_limit: usize,
    readme_file_name: String,
}

impl RetrievalGateway {
    /// Gateway over an arbitrary ranker and store.
    pub fn new(
        ranker: Arc<dyn IFragmentRanker>,
        storage: Arc<dyn ICodeFragmentStorage>,
        dimensions: usize,
    ) -> Self {
        Self {
            ranker,
            storage,
            dimensions,
            default_limit: DEFAULT_SEARCH_LIMIT,
            repo_listing_limit: DEFAULT_REPO_LISTING_LIMIT,
            readme_file_name: DEFAULT_README_FILE_NAME.to_string(),
        }
    }

    /// Gateway over the SQLite backend.
    pub fn persistent(engine: Arc<StorageEngine>) -> Self {
        let dimensions = engine.dimensions();
        Self::new(engine.clone(), engine, dimensions)
    }

    /// Gateway over the in-memory reference backend.
    pub fn in_memory(store: Arc<InMemoryFragmentStore>) -> Self {
        let dimensions = store.dimensions();
        Self::new(store.clone(), store, dimensions)
    }

    /// Open the configured SQLite store and apply the retrieval settings.
    pub fn from_config(config: &CodescopeConfig) -> CodescopeResult<Self> {
        let engine = Arc::new(StorageEngine::from_config(config)?);
        Ok(Self::persistent(engine).with_retrieval_config(config))
    }

    pub fn with_retrieval_config(mut self, config: &CodescopeConfig) -> Self {
        self.default_limit = config.retrieval.default_limit;
        self.repo_listing_limit = config.retrieval.repo_listing_limit;
        self.readme_file_name = config.retrieval.readme_file_name.clone();
        self
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn backend_name(&self) -> &'static str {
        self.ranker.backend_name()
    }

    /// Alias of [`ISimilaritySearch::similarity_search`]; `None` uses the
    /// configured default limit.
    pub fn get_user_repo_chunks(
        &self,
        tenant_id: &str,
        repository_id: &str,
        query_embedding: &[f32],
        limit: Option<i64>,
    ) -> Vec<ScoredFragment> {
        self.similarity_search(
            query_embedding,
            tenant_id,
            repository_id,
            limit.unwrap_or(self.default_limit),
        )
    }

    /// Contents of the scope's README-like fragments, newest first.
    pub fn readme_chunks(&self, tenant_id: &str, repository_id: &str) -> Vec<String> {
        let scope = TenantScope::new(tenant_id, repository_id);
        if !scope.is_valid() {
            debug!(error = %RetrievalError::InvalidScope, "readme lookup rejected");
            return Vec::new();
        }
        self.storage
            .get_repo_file_chunks(&scope, &self.readme_file_name)
    }

    /// First fragments of a repository, capped at the configured listing limit.
    pub fn repository_listing(&self, repository_id: &str) -> CodescopeResult<Vec<CodeFragment>> {
        self.storage
            .find_all_by_repo_id_with_limit(repository_id, self.repo_listing_limit)
    }

    /// Scope and limit checks shared by both search modes.
    fn validate_request(
        tenant_id: &str,
        repository_id: &str,
        limit: i64,
    ) -> Result<(TenantScope, usize), RetrievalError> {
        let scope = TenantScope::new(tenant_id, repository_id);
        if !scope.is_valid() {
            return Err(RetrievalError::InvalidScope);
        }
        let limit = usize::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or(RetrievalError::InvalidLimit { limit })?;
        Ok((scope, limit))
    }
}

fn check_dimension(expected: usize, actual: usize) -> Result<(), EmbeddingError> {
    if expected != actual {
        return Err(EmbeddingError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

impl ISimilaritySearch for RetrievalGateway {
    fn similarity_search(
        &self,
        embedding: &[f32],
        tenant_id: &str,
        repository_id: &str,
        limit: i64,
    ) -> Vec<ScoredFragment> {
        let (scope, limit) = match Self::validate_request(tenant_id, repository_id, limit) {
            Ok(valid) => valid,
            Err(e) => {
                debug!(error = %e, "similarity search rejected");
                return Vec::new();
            }
        };
        if embedding.is_empty() {
            debug!(error = %RetrievalError::EmptyQuery, "similarity search rejected");
            return Vec::new();
        }
        if let Err(e) = check_dimension(self.dimensions, embedding.len()) {
            warn!(error = %e, "similarity search rejected");
            return Vec::new();
        }

        match self.ranker.rank_single(embedding, &scope, limit) {
            Ok(rows) => {
                debug!(
                    backend = self.ranker.backend_name(),
                    tenant_id,
                    repository_id,
                    limit,
                    rows = rows.len(),
                    "similarity search complete"
                );
                rows
            }
            Err(e) => {
                error!(
                    backend = self.ranker.backend_name(),
                    tenant_id,
                    repository_id,
                    limit,
                    error = %e,
                    "similarity search failed"
                );
                Vec::new()
            }
        }
    }

    fn fusion_search(
        &self,
        embeddings: &[Vec<f32>],
        tenant_id: &str,
        repository_id: &str,
        emb_dim: usize,
        limit: i64,
    ) -> Vec<ScoredFragment> {
        let (scope, limit) = match Self::validate_request(tenant_id, repository_id, limit) {
            Ok(valid) => valid,
            Err(e) => {
                debug!(error = %e, "fusion search rejected");
                return Vec::new();
            }
        };
        if embeddings.is_empty() {
            debug!(error = %RetrievalError::EmptyQuery, "fusion search rejected");
            return Vec::new();
        }
        let dims_ok = check_dimension(self.dimensions, emb_dim).and_then(|_| {
            embeddings
                .iter()
                .try_for_each(|e| check_dimension(emb_dim, e.len()))
        });
        if let Err(e) = dims_ok {
            warn!(queries = embeddings.len(), error = %e, "fusion search rejected");
            return Vec::new();
        }

        match self.ranker.rank_fusion(embeddings, &scope, emb_dim, limit) {
            Ok(rows) => {
                debug!(
                    backend = self.ranker.backend_name(),
                    tenant_id,
                    repository_id,
                    limit,
                    queries = embeddings.len(),
                    rows = rows.len(),
                    "fusion search complete"
                );
                rows
            }
            Err(e) => {
                error!(
                    backend = self.ranker.backend_name(),
                    tenant_id,
                    repository_id,
                    limit,
                    queries = embeddings.len(),
                    error = %e,
                    "fusion search failed"
                );
                Vec::new()
            }
        }
    }
}
