use serde::Serialize;

use crate::types::PlatformFilter;

/// Maximum number of page links shown at once
pub const PAGE_WINDOW: u32 = 5;

/// Page links to render around the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<u32>,
    /// Show "..." followed by a link to the last page
    pub trailing_last: Option<u32>,
}

/// Current-page state for a filtered, paginated list.
///
/// The page is kept within `[0, total_pages - 1]` and reset to the first page
/// whenever the filter changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    current_page: u32,
    total_pages: u32,
    filter: PlatformFilter,
}

impl Pagination {
    pub fn new(filter: PlatformFilter) -> Self {
        Self {
            current_page: 0,
            total_pages: 0,
            filter,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn filter(&self) -> PlatformFilter {
        self.filter
    }

    /// Returns true when the filter actually changed (and the page was reset).
    pub fn set_filter(&mut self, filter: PlatformFilter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.current_page = 0;
        true
    }

    /// Record the page count reported by the server. An empty result keeps
    /// page 0 selectable.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages;
        self.current_page = self.clamp(self.current_page);
    }

    pub fn can_prev(&self) -> bool {
        self.current_page > 0
    }

    pub fn can_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    pub fn prev(&mut self) -> u32 {
        self.current_page = self.current_page.saturating_sub(1);
        self.current_page
    }

    pub fn next(&mut self) -> u32 {
        if self.can_next() {
            self.current_page += 1;
        }
        self.current_page
    }

    pub fn go_to(&mut self, page: u32) -> u32 {
        self.current_page = self.clamp(page);
        self.current_page
    }

    /// Pagination controls are pointless for a single page.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn window(&self) -> PageWindow {
        let total = self.total_pages;
        if total <= PAGE_WINDOW {
            return PageWindow {
                pages: (0..total).collect(),
                trailing_last: None,
            };
        }

        let start = self.current_page.saturating_sub(2);
        let end = (total - 1).min(start + PAGE_WINDOW - 1);
        let trailing_last = (self.current_page + 3 < total).then(|| total - 1);

        PageWindow {
            pages: (start..=end).collect(),
            trailing_last,
        }
    }

    fn clamp(&self, page: u32) -> u32 {
        page.min(self.total_pages.saturating_sub(1))
    }
}
