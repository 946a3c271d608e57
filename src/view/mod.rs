//! View state for the notice screens: list paging, the create/edit form and
//! summary figures. Nothing here renders; callers reload explicitly after
//! each state change.

pub mod board;
pub mod form;
pub mod pagination;
pub mod stats;

pub use board::NoticeBoard;
pub use form::{FormMode, NoticeForm};
pub use pagination::{PageWindow, Pagination};
pub use stats::NoticeStats;
