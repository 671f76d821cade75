//! In-process rankers. Candidates arrive already scoped, in scan order.

pub mod fusion;
pub mod single;

pub use fusion::rank_fusion;
pub use single::rank_single;
