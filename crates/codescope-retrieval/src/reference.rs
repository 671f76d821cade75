//! In-memory fragment store: the reference backend.
//!
//! Fragments live in a `Vec` behind an `RwLock`; insertion order is scan
//! order. Ranking filters the scope and runs the in-process rankers, so for
//! the same fragments inserted in the same order it returns the same rows
//! as the SQLite backend.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use codescope_core::errors::{CodescopeError, CodescopeResult, StorageError};
use codescope_core::models::{CodeFragment, NewCodeFragment, ScoredFragment, TenantScope};
use codescope_core::traits::{ICodeFragmentStorage, IFragmentRanker};

use crate::ranking;

pub struct InMemoryFragmentStore {
    fragments: RwLock<Vec<CodeFragment>>,
    dimensions: usize,
}

impl InMemoryFragmentStore {
    pub fn new(dimensions: usize) -> Self {
        Self {
            fragments: RwLock::new(Vec::new()),
            dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn read(&self) -> CodescopeResult<RwLockReadGuard<'_, Vec<CodeFragment>>> {
        self.fragments.read().map_err(|_| poisoned())
    }

    fn write(&self) -> CodescopeResult<RwLockWriteGuard<'_, Vec<CodeFragment>>> {
        self.fragments.write().map_err(|_| poisoned())
    }

    /// In-scope fragments in scan order.
    fn scoped(&self, scope: &TenantScope) -> CodescopeResult<Vec<CodeFragment>> {
        Ok(self
            .read()?
            .iter()
            .filter(|f| scope.contains(f))
            .cloned()
            .collect())
    }
}

fn poisoned() -> CodescopeError {
    StorageError::CorruptionDetected {
        details: "in-memory fragment store lock poisoned".to_string(),
    }
    .into()
}

impl ICodeFragmentStorage for InMemoryFragmentStore {
    fn save(&self, fragment: &NewCodeFragment) -> CodescopeResult<CodeFragment> {
        fragment.validate(self.dimensions)?;
        let stored = fragment.materialize();
        self.write()?.push(stored.clone());
        Ok(stored)
    }

    fn bulk_save(&self, fragments: &[NewCodeFragment]) -> CodescopeResult<Vec<CodeFragment>> {
        for fragment in fragments {
            fragment.validate(self.dimensions)?;
        }
        let stored: Vec<CodeFragment> = fragments.iter().map(NewCodeFragment::materialize).collect();
        self.write()?.extend(stored.iter().cloned());
        Ok(stored)
    }

    fn delete(&self, id: &str) -> CodescopeResult<()> {
        let mut fragments = self.write()?;
        match fragments.iter().position(|f| f.id == id) {
            Some(idx) => {
                fragments.remove(idx);
                Ok(())
            }
            None => Err(CodescopeError::FragmentNotFound { id: id.to_string() }),
        }
    }

    fn get(&self, id: &str) -> CodescopeResult<Option<CodeFragment>> {
        Ok(self.read()?.iter().find(|f| f.id == id).cloned())
    }

    fn find_all_by_repo_id_with_limit(
        &self,
        repository_id: &str,
        limit: usize,
    ) -> CodescopeResult<Vec<CodeFragment>> {
        Ok(self
            .read()?
            .iter()
            .filter(|f| f.repository_id == repository_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn get_repo_file_chunks(&self, scope: &TenantScope, file_name: &str) -> Vec<String> {
        let needle = file_name.to_ascii_lowercase();
        let mut matches = match self.scoped(scope) {
            Ok(fragments) => fragments,
            Err(e) => {
                tracing::warn!(
                    tenant_id = %scope.tenant_id,
                    repository_id = %scope.repository_id,
                    file_name,
                    error = %e,
                    "file chunk lookup failed"
                );
                return Vec::new();
            }
        };
        matches.retain(|f| f.file_name.to_ascii_lowercase().contains(&needle));
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches.into_iter().map(|f| f.content).collect()
    }

    fn list_scope(&self, scope: &TenantScope) -> CodescopeResult<Vec<CodeFragment>> {
        self.scoped(scope)
    }

    fn count(&self) -> CodescopeResult<usize> {
        Ok(self.read()?.len())
    }
}

impl IFragmentRanker for InMemoryFragmentStore {
    fn rank_single(
        &self,
        embedding: &[f32],
        scope: &TenantScope,
        limit: usize,
    ) -> CodescopeResult<Vec<ScoredFragment>> {
        let candidates = self.scoped(scope)?;
        Ok(ranking::rank_single(&candidates, embedding, limit))
    }

    fn rank_fusion(
        &self,
        embeddings: &[Vec<f32>],
        scope: &TenantScope,
        emb_dim: usize,
        limit: usize,
    ) -> CodescopeResult<Vec<ScoredFragment>> {
        let candidates = self.scoped(scope)?;
        Ok(ranking::rank_fusion(&candidates, embeddings, emb_dim, limit))
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}
