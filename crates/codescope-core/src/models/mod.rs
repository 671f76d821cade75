mod embedding;
mod fragment;
mod scored;

pub use embedding::{bytes_to_f32s, f32s_to_bytes, Embedding};
pub use fragment::{normalize_timestamp, CodeFragment, NewCodeFragment, TenantScope};
pub use scored::{rank_order, ScoreFields, ScoredFragment};
