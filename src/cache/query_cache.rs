use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::cache::key::{EntityKind, QueryFilter, QueryKey};
use crate::error::ApiError;

/// Upper bound for the exponential retry delay
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

type AnyValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<AnyValue, ApiError>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// How long a response is served without refetching
    pub stale_time: Duration,
    /// Automatic retries after a failed fetch
    pub retry: u32,
    /// Delay before the first retry; doubles on each further attempt
    pub retry_delay: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            retry: 1,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl CacheOptions {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retry_delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }
}

struct Entry {
    value: AnyValue,
    fetched_at: Instant,
    invalidated: bool,
}

struct InFlight {
    id: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    in_flight: HashMap<QueryKey, InFlight>,
    // kind -> every key with an entry or an in-flight fetch
    index: HashMap<EntityKind, HashSet<QueryKey>>,
    next_fetch_id: u64,
}

impl CacheState {
    fn fresh_value(&self, key: &QueryKey, stale_time: Duration) -> Option<AnyValue> {
        self.entries
            .get(key)
            .filter(|entry| !entry.invalidated && entry.fetched_at.elapsed() < stale_time)
            .map(|entry| entry.value.clone())
    }

    fn matching_keys(&self, filter: &QueryFilter) -> Vec<QueryKey> {
        self.index
            .get(&filter.kind())
            .map(|keys| keys.iter().filter(|key| filter.matches(key)).copied().collect())
            .unwrap_or_default()
    }

    /// Store the outcome of fetch `id`, unless it was detached by invalidation
    /// or removal while it ran.
    fn complete(&mut self, key: &QueryKey, id: u64, result: &Result<AnyValue, ApiError>) {
        if self.in_flight.get(key).map(|f| f.id) != Some(id) {
            tracing::debug!(%key, "discarding result of detached fetch");
            return;
        }
        self.in_flight.remove(key);

        if let Ok(value) = result {
            self.entries.insert(
                *key,
                Entry {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                    invalidated: false,
                },
            );
        }
        self.prune(key);
    }

    /// Drop `key` from the index once nothing refers to it any more.
    fn prune(&mut self, key: &QueryKey) {
        if self.entries.contains_key(key) || self.in_flight.contains_key(key) {
            return;
        }
        if let Some(keys) = self.index.get_mut(&key.kind) {
            keys.remove(key);
            if keys.is_empty() {
                self.index.remove(&key.kind);
            }
        }
    }
}

/// Keyed response cache with freshness window, single-flight fetching and
/// filter based invalidation.
///
/// Values are stored type-erased and handed out as `Arc<T>`; the same key must
/// always be fetched with the same `T`.
pub struct QueryCache {
    state: Arc<Mutex<CacheState>>,
    options: CacheOptions,
}

impl QueryCache {
    pub fn new(options: CacheOptions) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            options,
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Return the cached value for `key` while it is fresh; otherwise run
    /// `fetcher` (retrying as configured), store the result and return it.
    ///
    /// Concurrent calls for the same key share one underlying fetch.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let future = {
            let mut state = self.state.lock();

            if let Some(value) = state.fresh_value(&key, self.options.stale_time) {
                tracing::debug!(%key, "cache hit");
                return downcast(&key, value);
            }

            let pending = state.in_flight.get(&key).map(|in_flight| in_flight.future.clone());
            if let Some(future) = pending {
                tracing::debug!(%key, "joining in-flight fetch");
                future
            } else {
                tracing::debug!(%key, "cache miss");
                let id = state.next_fetch_id;
                state.next_fetch_id += 1;

                let future = self.spawn_fetch(key, id, fetcher);
                state.in_flight.insert(
                    key,
                    InFlight {
                        id,
                        future: future.clone(),
                    },
                );
                state.index.entry(key.kind).or_default().insert(key);
                future
            }
        };

        let value = future.await?;
        downcast(&key, value)
    }

    fn spawn_fetch<T, F, Fut>(&self, key: QueryKey, id: u64, fetcher: F) -> SharedFetch
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let options = self.options.clone();

        async move {
            let result = fetch_with_retry(&fetcher, &options, &key)
                .await
                .map(|value| Arc::new(value) as AnyValue);
            state.lock().complete(&key, id, &result);
            result
        }
        .boxed()
        .shared()
    }

    /// Last stored value for `key`, fresh or not.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let value = self.state.lock().entries.get(key)?.value.clone();
        value.downcast::<T>().ok()
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.state
            .lock()
            .fresh_value(key, self.options.stale_time)
            .is_some()
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    /// Mark every matching entry stale so the next read refetches. Matching
    /// in-flight fetches are detached and will not store their result.
    pub fn invalidate(&self, filter: QueryFilter) -> usize {
        let mut state = self.state.lock();
        let mut touched = 0;

        for key in state.matching_keys(&filter) {
            if let Some(entry) = state.entries.get_mut(&key) {
                entry.invalidated = true;
                touched += 1;
            }
            state.in_flight.remove(&key);
            state.prune(&key);
        }

        tracing::debug!(?filter, touched, "invalidated queries");
        touched
    }

    /// Evict every matching entry outright.
    pub fn remove(&self, filter: QueryFilter) -> usize {
        let mut state = self.state.lock();
        let mut removed = 0;

        for key in state.matching_keys(&filter) {
            if state.entries.remove(&key).is_some() {
                removed += 1;
            }
            state.in_flight.remove(&key);
            state.prune(&key);
        }

        tracing::debug!(?filter, removed, "removed queries");
        removed
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.in_flight.clear();
        state.index.clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

async fn fetch_with_retry<T, F, Fut>(fetcher: &F, options: &CacheOptions, key: &QueryKey) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < options.retry && err.is_retryable() => {
                let delay = options.delay_for_attempt(attempt);
                tracing::warn!(%key, attempt = attempt + 1, error = %err, ?delay, "fetch failed, retrying");
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "fetch failed");
                return Err(err);
            }
        }
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: AnyValue) -> Result<Arc<T>, ApiError> {
    value
        .downcast::<T>()
        .map_err(|_| ApiError::Decode(format!("cached value for {} has an unexpected type", key)))
}
