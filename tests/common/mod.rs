//! In-process stand-in for the notice backend.
//!
//! Each test spawns its own server on a free port so call counters and stored
//! notices never leak between tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;

use dutying_admin::api::ADMIN_TOKEN_HEADER;
use dutying_admin::app::AdminApp;
use dutying_admin::auth::TokenStore;
use dutying_admin::cache::CacheOptions;
use dutying_admin::config::AppConfig;
use dutying_admin::types::{Notice, NoticeFields, Platform};

pub const LIST: &str = "GET /notices";
pub const DETAIL: &str = "GET /notices/:id";
pub const CREATE: &str = "POST /notices";
pub const UPDATE: &str = "PUT /notices/:id";
pub const DELETE: &str = "DELETE /notices/:id";

#[derive(Default)]
struct BackendState {
    notices: Mutex<BTreeMap<i64, Notice>>,
    next_id: Mutex<i64>,
    calls: Mutex<HashMap<&'static str, usize>>,
    tokens: Mutex<Vec<Option<String>>>,
    fail_with: Mutex<Option<u16>>,
    delay: Mutex<Duration>,
}

impl BackendState {
    /// Count the call, remember the token header and apply any injected
    /// failure or delay. Returns the injected status, if any.
    async fn record(&self, route: &'static str, headers: &HeaderMap) -> Option<StatusCode> {
        *self.calls.lock().entry(route).or_default() += 1;
        let token = headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.tokens.lock().push(token);

        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.fail_with
            .lock()
            .and_then(|status| StatusCode::from_u16(status).ok())
    }
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/notices", get(list_notices).post(create_notice))
            .route(
                "/notices/:id",
                get(get_notice).put(update_notice).delete(delete_notice),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { base_url, state })
    }

    /// Insert `count` notices alternating MOBILE/WEB, starting with MOBILE.
    pub fn seed(&self, count: usize) {
        for i in 0..count {
            let platform = if i % 2 == 0 { Platform::Mobile } else { Platform::Web };
            self.insert(NoticeFields {
                platform,
                version: format!("1.0.{}", i),
                title: format!("Notice {}", i + 1),
                content: format!("Body of notice {}", i + 1),
            });
        }
    }

    pub fn insert(&self, fields: NoticeFields) -> Notice {
        let id = {
            let mut next = self.state.next_id.lock();
            *next += 1;
            *next
        };
        let notice = build_notice(id, fields);
        self.state.notices.lock().insert(id, notice.clone());
        notice
    }

    pub fn calls(&self, route: &str) -> usize {
        self.state.calls.lock().get(route).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state.calls.lock().values().sum()
    }

    /// Token header of every request seen so far, in order
    pub fn tokens(&self) -> Vec<Option<String>> {
        self.state.tokens.lock().clone()
    }

    pub fn last_token(&self) -> Option<String> {
        self.state.tokens.lock().last().cloned().flatten()
    }

    /// Make every following request fail with `status` until cleared.
    pub fn fail_with(&self, status: Option<u16>) {
        *self.state.fail_with.lock() = status;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock() = delay;
    }

    pub fn config(&self, config_dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::defaults(self.base_url.clone(), config_dir.to_path_buf());
        config.query = CacheOptions {
            retry_delay: Duration::ZERO,
            ..CacheOptions::default()
        };
        config
    }

    /// App wired against this backend with an in-memory token store.
    pub fn app(&self) -> Result<AdminApp> {
        let config = self.config(&std::env::temp_dir());
        Ok(AdminApp::with_token_store(config, TokenStore::in_memory())?)
    }
}

fn build_notice(id: i64, fields: NoticeFields) -> Notice {
    let stamp = NaiveDateTime::parse_from_str("2024-05-01 09:30:00", "%Y-%m-%d %H:%M:%S")
        .unwrap_or_default();
    Notice {
        id,
        platform: fields.platform,
        version: fields.version,
        title: fields.title,
        content: fields.content,
        view_count: (id as u64) * 10,
        created_at: stamp,
        modified_at: stamp,
    }
}

fn not_found(id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("notice {} not found", id) })),
    )
        .into_response()
}

fn injected(status: StatusCode) -> Response {
    (status, Json(json!({ "message": "injected failure" }))).into_response()
}

#[derive(Deserialize)]
struct ListQuery {
    platform: String,
    page: u32,
    size: u32,
}

async fn list_notices(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(q): Query<ListQuery>,
) -> Response {
    if let Some(status) = state.record(LIST, &headers).await {
        return injected(status);
    }

    let matching: Vec<Notice> = state
        .notices
        .lock()
        .values()
        .rev()
        .filter(|n| q.platform == "ALL" || n.platform.as_str() == q.platform)
        .cloned()
        .collect();

    let size = q.size.max(1) as usize;
    let total_elements = matching.len();
    let total_pages = (total_elements + size - 1) / size;
    let content: Vec<Notice> = matching
        .into_iter()
        .skip(q.page as usize * size)
        .take(size)
        .collect();

    Json(json!({
        "content": content,
        "totalPages": total_pages,
        "totalElements": total_elements,
        "size": size,
        "number": q.page,
        "numberOfElements": content.len(),
        "first": q.page == 0,
        "last": (q.page as usize + 1) >= total_pages,
        "empty": content.is_empty(),
        "sort": { "empty": true, "sorted": false, "unsorted": true },
        "pageable": {
            "offset": q.page as usize * size,
            "sort": { "empty": true, "sorted": false, "unsorted": true },
            "pageNumber": q.page,
            "pageSize": size,
            "paged": true,
            "unpaged": false
        }
    }))
    .into_response()
}

async fn get_notice(State(state): State<Arc<BackendState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(status) = state.record(DETAIL, &headers).await {
        return injected(status);
    }
    match state.notices.lock().get(&id) {
        Some(notice) => Json(notice.clone()).into_response(),
        None => not_found(id),
    }
}

async fn create_notice(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(fields): Json<NoticeFields>,
) -> Response {
    if let Some(status) = state.record(CREATE, &headers).await {
        return injected(status);
    }
    let id = {
        let mut next = state.next_id.lock();
        *next += 1;
        *next
    };
    let notice = build_notice(id, fields);
    state.notices.lock().insert(id, notice.clone());
    (StatusCode::CREATED, Json(notice)).into_response()
}

async fn update_notice(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(fields): Json<NoticeFields>,
) -> Response {
    if let Some(status) = state.record(UPDATE, &headers).await {
        return injected(status);
    }
    let mut notices = state.notices.lock();
    match notices.get_mut(&id) {
        Some(notice) => {
            notice.platform = fields.platform;
            notice.version = fields.version;
            notice.title = fields.title;
            notice.content = fields.content;
            Json(notice.clone()).into_response()
        }
        None => not_found(id),
    }
}

async fn delete_notice(State(state): State<Arc<BackendState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(status) = state.record(DELETE, &headers).await {
        return injected(status);
    }
    match state.notices.lock().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(id),
    }
}
