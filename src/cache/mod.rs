//! Query cache for server responses.
//!
//! Keys are grouped by entity kind in a secondary index so that mutations
//! can invalidate "every list query" without knowing which ones exist.

pub mod key;
pub mod query_cache;

pub use key::{EntityKind, QueryFilter, QueryKey, QueryScope};
pub use query_cache::{CacheOptions, QueryCache};
