use std::sync::Arc;

use crate::api::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Notice, NoticeFields, NoticeListParams, NoticePage};

const NOTICES_PATH: &str = "/notices";

/// Direct request/response wrappers for the `/notices` resource
#[derive(Clone)]
pub struct NoticeApi {
    client: Arc<ApiClient>,
}

impl NoticeApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// GET /notices?platform=&page=&size= (ALL is sent as-is)
    pub async fn list(&self, params: &NoticeListParams) -> Result<NoticePage, ApiError> {
        let page = params.page.to_string();
        let size = params.size.to_string();
        let query = [
            ("platform", params.platform.as_str()),
            ("page", page.as_str()),
            ("size", size.as_str()),
        ];

        self.client.get_with_query(NOTICES_PATH, &query).await
    }

    /// GET /notices/:id
    pub async fn get(&self, id: i64) -> Result<Notice, ApiError> {
        self.client.get(&notice_path(id)).await
    }

    /// POST /notices
    pub async fn create(&self, fields: &NoticeFields) -> Result<Notice, ApiError> {
        self.client.post(NOTICES_PATH, fields).await
    }

    /// PUT /notices/:id - replaces every mutable field
    pub async fn update(&self, id: i64, fields: &NoticeFields) -> Result<Notice, ApiError> {
        self.client.put(&notice_path(id), fields).await
    }

    /// DELETE /notices/:id
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&notice_path(id)).await
    }
}

fn notice_path(id: i64) -> String {
    format!("{}/{}", NOTICES_PATH, id)
}
