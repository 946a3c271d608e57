//! REST access to the notice backend.

pub mod client;
pub mod notice;

pub use client::{AdminTokenInterceptor, ApiClient, RequestInterceptor, ADMIN_TOKEN_HEADER};
pub use notice::NoticeApi;
