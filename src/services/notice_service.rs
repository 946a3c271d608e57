use std::sync::Arc;

use crate::api::NoticeApi;
use crate::cache::{EntityKind, QueryCache, QueryFilter, QueryKey};
use crate::error::NoticeError;
use crate::types::{Notice, NoticeFields, NoticeListParams, NoticePage};

/// Cache keys and key groups for notice queries
pub mod notice_keys {
    use super::*;

    pub fn all() -> QueryFilter {
        QueryFilter::All(EntityKind::Notice)
    }

    pub fn lists() -> QueryFilter {
        QueryFilter::Lists(EntityKind::Notice)
    }

    pub fn list(params: NoticeListParams) -> QueryKey {
        QueryKey::list(EntityKind::Notice, params)
    }

    pub fn details() -> QueryFilter {
        QueryFilter::Details(EntityKind::Notice)
    }

    pub fn detail(id: i64) -> QueryKey {
        QueryKey::detail(EntityKind::Notice, id)
    }
}

/// Cached notice queries plus the mutations that keep the cache honest.
///
/// - create: all list queries go stale
/// - update: that notice's detail and all list queries go stale
/// - delete: that notice's detail is evicted, all list queries go stale
///
/// A failed mutation leaves the cache untouched.
#[derive(Clone)]
pub struct NoticeService {
    api: NoticeApi,
    cache: Arc<QueryCache>,
}

impl NoticeService {
    pub fn new(api: NoticeApi, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn list(&self, params: NoticeListParams) -> Result<Arc<NoticePage>, NoticeError> {
        let api = self.api.clone();
        let page = self
            .cache
            .fetch(notice_keys::list(params), move || {
                let api = api.clone();
                async move { api.list(&params).await }
            })
            .await?;
        Ok(page)
    }

    /// Detail query; ids below 1 never reach the server.
    pub async fn get(&self, id: i64) -> Result<Arc<Notice>, NoticeError> {
        if id <= 0 {
            return Err(NoticeError::InvalidId(id));
        }

        let api = self.api.clone();
        let notice = self
            .cache
            .fetch(notice_keys::detail(id), move || {
                let api = api.clone();
                async move { api.get(id).await }
            })
            .await?;
        Ok(notice)
    }

    pub async fn create(&self, fields: &NoticeFields) -> Result<Notice, NoticeError> {
        let notice = self.api.create(fields).await?;

        self.cache.invalidate(notice_keys::lists());
        tracing::info!(id = notice.id, platform = %notice.platform, "notice created");
        Ok(notice)
    }

    pub async fn update(&self, id: i64, fields: &NoticeFields) -> Result<Notice, NoticeError> {
        if id <= 0 {
            return Err(NoticeError::InvalidId(id));
        }

        let notice = self.api.update(id, fields).await?;

        self.cache.invalidate(QueryFilter::Exact(notice_keys::detail(id)));
        self.cache.invalidate(notice_keys::lists());
        tracing::info!(id, "notice updated");
        Ok(notice)
    }

    pub async fn delete(&self, id: i64) -> Result<(), NoticeError> {
        if id <= 0 {
            return Err(NoticeError::InvalidId(id));
        }

        self.api.delete(id).await?;

        self.cache.remove(QueryFilter::Exact(notice_keys::detail(id)));
        self.cache.invalidate(notice_keys::lists());
        tracing::info!(id, "notice deleted");
        Ok(())
    }
}
