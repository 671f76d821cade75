use std::sync::Arc;

use crate::errors::CodescopeResult;
use crate::models::{CodeFragment, NewCodeFragment, TenantScope};

/// Create / filter / delete over stored code fragments.
pub trait ICodeFragmentStorage: Send + Sync {
    // --- Write ---
    fn save(&self, fragment: &NewCodeFragment) -> CodescopeResult<CodeFragment>;
    /// All-or-nothing.
    fn bulk_save(&self, fragments: &[NewCodeFragment]) -> CodescopeResult<Vec<CodeFragment>>;
    fn delete(&self, id: &str) -> CodescopeResult<()>;

    // --- Read ---
    fn get(&self, id: &str) -> CodescopeResult<Option<CodeFragment>>;
    /// Fragments of a repository (any tenant) in insertion order, at most `limit`.
    fn find_all_by_repo_id_with_limit(
        &self,
        repository_id: &str,
        limit: usize,
    ) -> CodescopeResult<Vec<CodeFragment>>;
    /// Contents of fragments whose file name contains `file_name`
    /// (case-insensitive), newest first. Empty on any failure.
    fn get_repo_file_chunks(&self, scope: &TenantScope, file_name: &str) -> Vec<String>;
    /// Every fragment in `scope`, in scan (insertion) order.
    fn list_scope(&self, scope: &TenantScope) -> CodescopeResult<Vec<CodeFragment>>;
    fn count(&self) -> CodescopeResult<usize>;
}

/// Blanket impl: `Arc<T>` delegates to the inner `T`.
impl<T: ICodeFragmentStorage> ICodeFragmentStorage for Arc<T> {
    fn save(&self, fragment: &NewCodeFragment) -> CodescopeResult<CodeFragment> { (**self).save(fragment) }
    fn bulk_save(&self, fragments: &[NewCodeFragment]) -> CodescopeResult<Vec<CodeFragment>> { (**self).bulk_save(fragments) }
    fn delete(&self, id: &str) -> CodescopeResult<()> { (**self).delete(id) }
    fn get(&self, id: &str) -> CodescopeResult<Option<CodeFragment>> { (**self).get(id) }
    fn find_all_by_repo_id_with_limit(&self, repository_id: &str, limit: usize) -> CodescopeResult<Vec<CodeFragment>> { (**self).find_all_by_repo_id_with_limit(repository_id, limit) }
    fn get_repo_file_chunks(&self, scope: &TenantScope, file_name: &str) -> Vec<String> { (**self).get_repo_file_chunks(scope, file_name) }
    fn list_scope(&self, scope: &TenantScope) -> CodescopeResult<Vec<CodeFragment>> { (**self).list_scope(scope) }
    fn count(&self) -> CodescopeResult<usize> { (**self).count() }
}
