//! Time-boxed JSON response cache for outbound fetches.
//!
//! Keyed by request URL. A live entry is served without touching the
//! network; concurrent callers for the same uncached URL share a single
//! in-flight request and all observe its result, success or failure.
//! Entries decay by TTL and can be dropped eagerly through [`ResponseCache::invalidate`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use thiserror::Error;

use crate::config;

/// Failure of a cached fetch. Propagated unchanged to every caller awaiting
/// the same in-flight request; never retried automatically.
#[derive(Debug, Clone, Error)]
pub enum CacheFetchError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("upstream {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON from {url}: {reason}")]
    Decode { url: String, reason: String },
}

struct CacheEntry {
    data: Value,
    inserted_at: Instant,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Value, CacheFetchError>>>;

struct CacheInner {
    client: reqwest::Client,
    entries: Mutex<HashMap<String, CacheEntry>>,
    pending: Mutex<HashMap<String, SharedFetch>>,
}

#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<CacheInner>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                client: reqwest::Client::new(),
                entries: Mutex::new(HashMap::new()),
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Fetch with the configured default TTL.
    pub async fn fetch(&self, url: &str) -> Result<Value, CacheFetchError> {
        let ttl = Duration::from_millis(config::config().cache.ttl_ms);
        self.fetch_with_ttl(url, ttl).await
    }

    /// Return the cached payload for `url`, or fetch it.
    ///
    /// At most one request per URL is in flight at any instant; late callers
    /// attach to the existing request. The last fetch to complete for a URL
    /// overwrites any earlier entry.
    pub async fn fetch_with_ttl(&self, url: &str, ttl: Duration) -> Result<Value, CacheFetchError> {
        {
            let entries = lock(&self.inner.entries);
            if let Some(entry) = entries.get(url) {
                if entry.inserted_at.elapsed() < ttl {
                    return Ok(entry.data.clone());
                }
            }
        }

        let fetch = {
            let mut pending = lock(&self.inner.pending);
            match pending.get(url) {
                Some(existing) => existing.clone(),
                None => {
                    let inner = Arc::clone(&self.inner);
                    let key = url.to_string();
                    let fetch: SharedFetch = async move {
                        let result = fetch_json(&inner.client, &key).await;
                        lock(&inner.pending).remove(&key);
                        if let Ok(data) = &result {
                            lock(&inner.entries).insert(
                                key.clone(),
                                CacheEntry {
                                    data: data.clone(),
                                    inserted_at: Instant::now(),
                                },
                            );
                        }
                        result
                    }
                    .boxed()
                    .shared();
                    pending.insert(url.to_string(), fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Drop cached entries. `None` clears everything; `Some(prefix)` removes
    /// every key that starts with or contains the prefix. Matching is
    /// intentionally permissive and can over-invalidate related keys.
    pub fn invalidate(&self, prefix: Option<&str>) {
        let mut entries = lock(&self.inner.entries);
        match prefix {
            None => entries.clear(),
            Some(p) => entries.retain(|key, _| !(key.starts_with(p) || key.contains(p))),
        }
    }

    /// Number of cached entries, live or stale.
    pub fn len(&self) -> usize {
        lock(&self.inner.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_json(client: &reqwest::Client, url: &str) -> Result<Value, CacheFetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CacheFetchError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CacheFetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| CacheFetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Hits {
        students: Arc<AtomicUsize>,
        teachers: Arc<AtomicUsize>,
        failing: Arc<AtomicUsize>,
    }

    async fn spawn_upstream(hits: Hits) -> String {
        let app = Router::new()
            .route(
                "/api/students",
                get(|State(h): State<Hits>| async move {
                    // Hold the response briefly so concurrent callers overlap
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    let n = h.students.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(json!({ "resource": "students", "hit": n }))
                }),
            )
            .route(
                "/api/teachers",
                get(|State(h): State<Hits>| async move {
                    h.teachers.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "resource": "teachers" }))
                }),
            )
            .route(
                "/api/failing",
                get(|State(h): State<Hits>| async move {
                    h.failing.fetch_add(1, Ordering::SeqCst);
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR
                }),
            )
            .with_state(hits);

        let port = portpicker::pick_unused_port().expect("no free port");
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("bind upstream");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("upstream server");
        });
        format!("http://127.0.0.1:{}", port)
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_upstream_call() {
        let hits = Hits::default();
        let base = spawn_upstream(hits.clone()).await;
        let cache = ResponseCache::new();
        let url = format!("{}/api/students", base);

        let calls = (0..10).map(|_| cache.fetch_with_ttl(&url, Duration::from_secs(30)));
        let results = futures::future::join_all(calls).await;

        assert_eq!(hits.students.load(Ordering::SeqCst), 1);
        let first = results[0].as_ref().expect("fetch failed").clone();
        for result in &results {
            assert_eq!(result.as_ref().expect("fetch failed"), &first);
        }
    }

    #[tokio::test]
    async fn live_entry_is_served_without_network() {
        let hits = Hits::default();
        let base = spawn_upstream(hits.clone()).await;
        let cache = ResponseCache::new();
        let url = format!("{}/api/teachers", base);

        let a = cache.fetch_with_ttl(&url, Duration::from_secs(30)).await.unwrap();
        let b = cache.fetch_with_ttl(&url, Duration::from_secs(30)).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(hits.teachers.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_a_fresh_fetch() {
        let hits = Hits::default();
        let base = spawn_upstream(hits.clone()).await;
        let cache = ResponseCache::new();
        let url = format!("{}/api/teachers", base);

        cache.fetch_with_ttl(&url, Duration::from_millis(40)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        cache.fetch_with_ttl(&url, Duration::from_millis(40)).await.unwrap();

        assert_eq!(hits.teachers.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_reaches_every_waiter_and_clears_pending() {
        let hits = Hits::default();
        let base = spawn_upstream(hits.clone()).await;
        let cache = ResponseCache::new();
        let url = format!("{}/api/failing", base);

        let calls = (0..4).map(|_| cache.fetch_with_ttl(&url, Duration::from_secs(30)));
        let results = futures::future::join_all(calls).await;
        for result in results {
            match result {
                Err(CacheFetchError::Status { status, .. }) => assert_eq!(status, 500),
                other => panic!("expected status error, got {:?}", other),
            }
        }

        // Errors are not cached; the next call goes back upstream
        let retry = cache.fetch_with_ttl(&url, Duration::from_secs(30)).await;
        assert!(retry.is_err());
        assert!(hits.failing.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn prefix_invalidation_leaves_unrelated_keys() {
        let hits = Hits::default();
        let base = spawn_upstream(hits.clone()).await;
        let cache = ResponseCache::new();
        let students = format!("{}/api/students", base);
        let teachers = format!("{}/api/teachers", base);

        cache.fetch_with_ttl(&students, Duration::from_secs(30)).await.unwrap();
        cache.fetch_with_ttl(&teachers, Duration::from_secs(30)).await.unwrap();
        assert_eq!(cache.len(), 2);

        // Keys are absolute URLs, so the path prefix matches via `contains`
        cache.invalidate(Some("/api/students"));
        assert_eq!(cache.len(), 1);

        cache.fetch_with_ttl(&students, Duration::from_secs(30)).await.unwrap();
        cache.fetch_with_ttl(&teachers, Duration::from_secs(30)).await.unwrap();
        assert_eq!(hits.students.load(Ordering::SeqCst), 2);
        assert_eq!(hits.teachers.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_without_prefix_clears_everything() {
        let hits = Hits::default();
        let base = spawn_upstream(hits.clone()).await;
        let cache = ResponseCache::new();
        let url = format!("{}/api/teachers", base);

        cache.fetch_with_ttl(&url, Duration::from_secs(30)).await.unwrap();
        assert!(!cache.is_empty());
        cache.invalidate(None);
        assert!(cache.is_empty());
    }
}
