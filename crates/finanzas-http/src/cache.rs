//! GET response cache
//!
//! Successful GET responses are memoized per full URL. An entry is served while
//! younger than `fresh`; [`GetCache::sweep`] evicts entries older than
//! `max_age`. Session endpoints (`/auth/`, `/refresh`) are never stored.

use crate::chain::{Interceptor, Next};
use crate::error::HttpError;
use crate::request::{HttpRequest, HttpResponse, Method};
use async_trait::async_trait;
use finanzas_core::CacheConfig;
use moka::future::Cache;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const EXCLUDED_FRAGMENTS: [&str; 2] = ["/auth/", "/refresh"];

/// Response plus the time it was stored
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// Stored response
    pub response: HttpResponse,
    /// When it was stored
    pub stored_at: Instant,
}

impl CachedResponse {
    fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.stored_at)
    }
}

/// Per-URL GET cache shared by every store of one client
#[derive(Debug)]
pub struct GetCache {
    inner: Cache<String, CachedResponse>,
    fresh: Duration,
    max_age: Duration,
}

impl GetCache {
    /// Cache with the given freshness and eviction ages
    #[must_use]
    pub fn new(fresh: Duration, max_age: Duration) -> Self {
        // moka's own TTL is a backstop; freshness is checked against the tokio clock
        let inner = Cache::builder().time_to_live(max_age.max(fresh)).build();
        Self {
            inner,
            fresh,
            max_age,
        }
    }

    /// Cache configured from `config`
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.fresh(), config.max_age())
    }

    /// Whether `request` may be served from or stored in the cache
    #[must_use]
    pub fn is_cacheable(request: &HttpRequest) -> bool {
        request.method == Method::Get
            && !EXCLUDED_FRAGMENTS
                .iter()
                .any(|fragment| request.url.contains(fragment))
    }

    /// Fresh response for `url`, if any
    pub async fn get(&self, url: &str) -> Option<HttpResponse> {
        let cached = self.inner.get(url).await?;
        (cached.age() < self.fresh).then_some(cached.response)
    }

    /// Store `response` for `url`
    pub async fn insert(&self, url: String, response: HttpResponse) {
        self.inner
            .insert(
                url,
                CachedResponse {
                    response,
                    stored_at: Instant::now(),
                },
            )
            .await;
    }

    /// Evict entries older than `max_age`; returns how many were evicted
    pub async fn sweep(&self) -> usize {
        let stale: Vec<Arc<String>> = self
            .inner
            .iter()
            .filter(|(_, cached)| cached.age() >= self.max_age)
            .map(|(key, _)| key)
            .collect();
        for key in &stale {
            self.inner.invalidate(key.as_str()).await;
        }
        self.inner.run_pending_tasks().await;
        if !stale.is_empty() {
            tracing::debug!("Cache sweep evicted {} entries", stale.len());
        }
        stale.len()
    }

    /// Run [`GetCache::sweep`] every `interval` until the cache is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = weak.upgrade() else {
                    break;
                };
                cache.sweep().await;
            }
        })
    }

    /// Drop every entry
    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
        tracing::debug!("Cache cleared");
    }

    /// Entries currently held
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

/// Innermost interceptor serving and storing GET responses
#[derive(Debug, Clone)]
pub struct CacheInterceptor {
    cache: Arc<GetCache>,
}

impl CacheInterceptor {
    /// Interceptor backed by `cache`
    #[must_use]
    pub fn new(cache: Arc<GetCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Interceptor for CacheInterceptor {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn intercept(
        &self,
        request: HttpRequest,
        next: Next<'_>,
    ) -> Result<HttpResponse, HttpError> {
        if !GetCache::is_cacheable(&request) {
            return next.run(request).await;
        }

        let key = request.full_url();
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!("Cache hit {}", key);
            return Ok(hit);
        }

        let response = next.run(request).await?;
        self.cache.insert(key, response.clone()).await;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(n: i64) -> HttpResponse {
        HttpResponse::new(200, "http://api/categorias", json!({ "n": n }))
    }

    #[test]
    fn excluded_urls() {
        assert!(GetCache::is_cacheable(&HttpRequest::get("http://api/v1/gastos")));
        assert!(!GetCache::is_cacheable(&HttpRequest::get("http://api/v1/auth/me")));
        assert!(!GetCache::is_cacheable(&HttpRequest::get("http://api/v1/token/refresh")));
        assert!(!GetCache::is_cacheable(&HttpRequest::new(
            Method::Post,
            "http://api/v1/gastos"
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn entries_stop_being_fresh_after_window() {
        let cache = GetCache::new(Duration::from_secs(30), Duration::from_secs(60));
        cache.insert("k".to_string(), response(1)).await;

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get("k").await, Some(response(1)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_only_old_entries() {
        let cache = GetCache::new(Duration::from_secs(30), Duration::from_secs(60));
        cache.insert("old".to_string(), response(1)).await;
        tokio::time::advance(Duration::from_secs(45)).await;
        cache.insert("young".to_string(), response(2)).await;
        tokio::time::advance(Duration::from_secs(15)).await;

        assert_eq!(cache.sweep().await, 1);
        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.get("young").await, Some(response(2)));
    }

    #[tokio::test]
    async fn invalidate_all_empties_cache() {
        let cache = GetCache::new(Duration::from_secs(30), Duration::from_secs(60));
        cache.insert("a".to_string(), response(1)).await;
        cache.insert("b".to_string(), response(2)).await;

        cache.invalidate_all().await;

        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("b").await, None);
    }
}
