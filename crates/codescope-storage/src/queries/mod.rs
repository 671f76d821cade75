//! SQL for code fragments: CRUD, scoped listing, and in-database ranking.

pub mod fragment_crud;
pub mod fragment_query;
pub mod fusion_search;
pub mod row;
pub mod similarity_search;
