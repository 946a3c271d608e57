use serde::Serialize;

use crate::types::{NoticePage, Platform};

/// Summary figures shown above the notice table.
///
/// `total` covers the whole filtered result; the other counts only the page
/// currently loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoticeStats {
    pub total: u64,
    pub on_page: usize,
    pub mobile: usize,
    pub web: usize,
    pub total_views: u64,
}

impl NoticeStats {
    pub fn from_page(page: &NoticePage) -> Self {
        let count = |platform: Platform| page.content.iter().filter(|n| n.platform == platform).count();

        Self {
            total: page.total_elements,
            on_page: page.content.len(),
            mobile: count(Platform::Mobile),
            web: count(Platform::Web),
            total_views: page.content.iter().map(|n| n.view_count).sum(),
        }
    }
}
