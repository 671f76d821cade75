//! # codescope-retrieval
//!
//! Ranking of code fragments against query embeddings.
//!
//! - [`ranking`]: pure single-query and sum-fusion rankers over a candidate scan.
//! - [`reference`]: the in-memory fragment store, ranked with those rankers.
//! - [`gateway`]: the fail-soft entry point over either backend.

pub mod gateway;
pub mod ranking;
pub mod reference;

pub use gateway::RetrievalGateway;
pub use reference::InMemoryFragmentStore;
