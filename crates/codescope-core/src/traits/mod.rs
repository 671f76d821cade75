mod ranker;
mod search;
mod storage;

pub use ranker::IFragmentRanker;
pub use search::ISimilaritySearch;
pub use storage::ICodeFragmentStorage;
