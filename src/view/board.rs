use std::sync::Arc;

use crate::error::NoticeError;
use crate::services::NoticeService;
use crate::types::{NoticeListParams, NoticePage, PlatformFilter};
use crate::view::pagination::Pagination;
use crate::view::stats::NoticeStats;

/// Controller for the notice list: selected filter, current page and the
/// last page loaded. Every state change is followed by an explicit `load`.
pub struct NoticeBoard {
    service: NoticeService,
    pagination: Pagination,
    page_size: u32,
    current: Option<Arc<NoticePage>>,
}

impl NoticeBoard {
    pub fn new(service: NoticeService, page_size: u32) -> Self {
        Self {
            service,
            pagination: Pagination::new(PlatformFilter::All),
            page_size,
            current: None,
        }
    }

    /// Start on a given filter instead of ALL
    pub fn with_platform(mut self, filter: PlatformFilter) -> Self {
        self.pagination.set_filter(filter);
        self
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn params(&self) -> NoticeListParams {
        NoticeListParams::new(self.pagination.filter(), self.pagination.current_page(), self.page_size)
    }

    /// Last successfully loaded page
    pub fn page(&self) -> Option<&Arc<NoticePage>> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> NoticeStats {
        self.current
            .as_deref()
            .map(NoticeStats::from_page)
            .unwrap_or_default()
    }

    /// Fetch the page for the current params (from cache while fresh). On
    /// failure the previously loaded page stays in place.
    ///
    /// A page past the end is clamped to the last page and fetched again, so
    /// the loaded page always matches `pagination().current_page()`.
    pub async fn load(&mut self) -> Result<Arc<NoticePage>, NoticeError> {
        let requested = self.pagination.current_page();
        let mut page = self.service.list(self.params()).await?;
        self.pagination.set_total_pages(page.total_pages);

        if self.pagination.current_page() != requested {
            tracing::debug!(requested, clamped = self.pagination.current_page(), "page out of range");
            page = self.service.list(self.params()).await?;
            self.pagination.set_total_pages(page.total_pages);
        }

        self.current = Some(Arc::clone(&page));
        Ok(page)
    }

    pub async fn change_platform(&mut self, filter: PlatformFilter) -> Result<Arc<NoticePage>, NoticeError> {
        self.pagination.set_filter(filter);
        self.load().await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<Arc<NoticePage>, NoticeError> {
        // total_pages is unknown before the first load; let the server decide
        if self.current.is_none() {
            self.pagination.set_total_pages(page.saturating_add(1));
        }
        self.pagination.go_to(page);
        self.load().await
    }

    pub async fn next_page(&mut self) -> Result<Arc<NoticePage>, NoticeError> {
        self.pagination.next();
        self.load().await
    }

    pub async fn prev_page(&mut self) -> Result<Arc<NoticePage>, NoticeError> {
        self.pagination.prev();
        self.load().await
    }
}
