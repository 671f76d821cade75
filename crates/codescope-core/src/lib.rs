//! # codescope-core
//!
//! Foundation crate for codescope.
//! Defines the fragment and embedding types, the similarity scorer, the
//! storage/ranking/search traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod models;
pub mod similarity;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CodescopeConfig;
pub use errors::{CodescopeError, CodescopeResult};
pub use models::{
    CodeFragment, Embedding, NewCodeFragment, ScoreFields, ScoredFragment, TenantScope,
};
