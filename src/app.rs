use std::sync::Arc;

use crate::api::{ApiClient, NoticeApi};
use crate::auth::{AuthState, TokenStore};
use crate::cache::QueryCache;
use crate::config::AppConfig;
use crate::error::StartupError;
use crate::services::NoticeService;
use crate::view::NoticeBoard;

/// Process-wide wiring: one auth state, one HTTP client, one query cache.
pub struct AdminApp {
    pub config: AppConfig,
    pub auth: Arc<AuthState>,
    pub client: Arc<ApiClient>,
    pub cache: Arc<QueryCache>,
    pub notices: NoticeService,
}

impl AdminApp {
    /// Build everything from configuration, loading the persisted token from
    /// the config directory before anything else runs.
    pub fn init(config: AppConfig) -> Result<Self, StartupError> {
        let store = TokenStore::in_dir(&config.config_dir);
        Self::with_token_store(config, store)
    }

    pub fn with_token_store(config: AppConfig, store: TokenStore) -> Result<Self, StartupError> {
        let auth = Arc::new(AuthState::load(store)?);
        let client = Arc::new(ApiClient::with_auth(&config.api_base_url, Arc::clone(&auth))?);
        let cache = Arc::new(QueryCache::new(config.query.clone()));
        let notices = NoticeService::new(NoticeApi::new(Arc::clone(&client)), Arc::clone(&cache));

        tracing::debug!(base_url = %config.api_base_url, authenticated = auth.is_authenticated(), "admin client ready");

        Ok(Self {
            config,
            auth,
            client,
            cache,
            notices,
        })
    }

    pub fn notice_board(&self) -> NoticeBoard {
        NoticeBoard::new(self.notices.clone(), self.config.page_size)
    }
}
