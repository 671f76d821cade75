//! StorageEngine: owns the ConnectionPool, implements ICodeFragmentStorage
//! and the persistent IFragmentRanker.

use std::path::Path;

use codescope_core::config::defaults::{DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_READ_POOL_SIZE};
use codescope_core::errors::CodescopeResult;
use codescope_core::models::{CodeFragment, NewCodeFragment, ScoredFragment, TenantScope};
use codescope_core::traits::{ICodeFragmentStorage, IFragmentRanker};
use codescope_core::CodescopeConfig;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{fragment_crud, fragment_query, fusion_search, similarity_search};

/// Path value that selects an in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// The persistent fragment store and ranking backend.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
    /// Deployment embedding dimension enforced on write.
    dimensions: usize,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, dimensions: usize) -> CodescopeResult<Self> {
        let pool = ConnectionPool::open(path, DEFAULT_READ_POOL_SIZE, DEFAULT_BUSY_TIMEOUT_MS)?;
        Self::with_pool(pool, true, dimensions)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory(dimensions: usize) -> CodescopeResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        Self::with_pool(pool, false, dimensions)
    }

    /// Open from configuration. A `db_path` of `:memory:` opens in memory.
    pub fn from_config(config: &CodescopeConfig) -> CodescopeResult<Self> {
        config.validate()?;
        let dimensions = config.embedding.dimensions;
        if config.storage.db_path == IN_MEMORY_PATH {
            return Self::open_in_memory(dimensions);
        }
        let pool = ConnectionPool::open(
            Path::new(&config.storage.db_path),
            config.storage.read_pool_size,
            config.storage.busy_timeout_ms,
        )?;
        Self::with_pool(pool, true, dimensions)
    }

    fn with_pool(pool: ConnectionPool, use_read_pool: bool, dimensions: usize) -> CodescopeResult<Self> {
        let engine = Self {
            pool,
            use_read_pool,
            dimensions,
        };
        engine.initialize()?;
        tracing::debug!(
            path = ?engine.pool.db_path,
            read_pool = engine.use_read_pool,
            dimensions,
            "storage engine opened"
        );
        Ok(engine)
    }

    /// Run migrations.
    fn initialize(&self) -> CodescopeResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Execute a read-only query on the best available connection.
    /// File-backed: uses the read pool (no writer contention).
    /// In-memory: uses the writer (read pool is isolated).
    fn with_reader<F, T>(&self, f: F) -> CodescopeResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> CodescopeResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl ICodeFragmentStorage for StorageEngine {
    fn save(&self, fragment: &NewCodeFragment) -> CodescopeResult<CodeFragment> {
        self.pool
            .writer
            .with_conn_sync(|conn| fragment_crud::insert_fragment(conn, fragment, self.dimensions))
    }

    fn bulk_save(&self, fragments: &[NewCodeFragment]) -> CodescopeResult<Vec<CodeFragment>> {
        self.pool.writer.with_conn_sync(|conn| {
            fragment_crud::bulk_insert_fragments(conn, fragments, self.dimensions)
        })
    }

    fn delete(&self, id: &str) -> CodescopeResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| fragment_crud::delete_fragment(conn, id))
    }

    fn get(&self, id: &str) -> CodescopeResult<Option<CodeFragment>> {
        self.with_reader(|conn| fragment_crud::get_fragment(conn, id))
    }

    fn find_all_by_repo_id_with_limit(
        &self,
        repository_id: &str,
        limit: usize,
    ) -> CodescopeResult<Vec<CodeFragment>> {
        self.with_reader(|conn| fragment_query::find_by_repository(conn, repository_id, limit))
    }

    fn get_repo_file_chunks(&self, scope: &TenantScope, file_name: &str) -> Vec<String> {
        match self.with_reader(|conn| fragment_query::file_chunks(conn, scope, file_name)) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    tenant_id = %scope.tenant_id,
                    repository_id = %scope.repository_id,
                    file_name,
                    error = %e,
                    "file chunk lookup failed"
                );
                Vec::new()
            }
        }
    }

    fn list_scope(&self, scope: &TenantScope) -> CodescopeResult<Vec<CodeFragment>> {
        self.with_reader(|conn| fragment_query::list_scope(conn, scope))
    }

    fn count(&self) -> CodescopeResult<usize> {
        self.with_reader(fragment_crud::count_fragments)
    }
}

impl IFragmentRanker for StorageEngine {
    fn rank_single(
        &self,
        embedding: &[f32],
        scope: &TenantScope,
        limit: usize,
    ) -> CodescopeResult<Vec<ScoredFragment>> {
        self.with_reader(|conn| similarity_search::rank_single(conn, embedding, scope, limit))
    }

    fn rank_fusion(
        &self,
        embeddings: &[Vec<f32>],
        scope: &TenantScope,
        emb_dim: usize,
        limit: usize,
    ) -> CodescopeResult<Vec<ScoredFragment>> {
        self.with_reader(|conn| {
            fusion_search::rank_fusion(conn, embeddings, scope, emb_dim, limit)
        })
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
