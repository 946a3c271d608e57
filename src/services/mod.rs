pub mod notice_service;

pub use notice_service::{notice_keys, NoticeService};
