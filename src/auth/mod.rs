// Admin token persistence and the in-memory auth state derived from it

pub mod state;
pub mod storage;

pub use state::*;
pub use storage::*;
