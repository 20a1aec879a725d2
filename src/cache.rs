//! In-process caches for API responses and analytics snapshots.
//!
//! Entries are overwritten wholesale by the background sweep or by an
//! on-demand compute; there is no partial merge, the last writer for a
//! key wins. Both writers compute from the same store, so the values are
//! interchangeable for dashboard purposes.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;

use crate::error::Error;
use crate::model::{
    AnalyticsMetrics, EngagementMetrics, HistoricalPoint,
    PerformanceBenchmarks,
};

const MAX_ENTRIES: u64 = 10_000;

/// Fetches a cached value or computes it using the provided async function.
/// Uses Moka's built-in stampede protection: only one caller executes
/// the fetch on a cache miss; concurrent callers wait for the result.
pub async fn cached_fetch<T, F, Fut>(
    cache: &Cache<String, T>,
    key: &str,
    fetch_fn: F,
) -> Result<T, Error>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    cache
        .try_get_with_by_ref(key, fetch_fn())
        .await
        .map_err(|e| Error::TaskError(e.to_string()))
}

pub struct ApiCache {
    /// Global and per-DAO analytics snapshots, refreshed by the sweep.
    pub snapshots: Cache<String, AnalyticsMetrics>,
    pub historical: Cache<String, Vec<HistoricalPoint>>,
    pub benchmarks: Cache<String, PerformanceBenchmarks>,
    pub engagement: Cache<String, EngagementMetrics>,
}

impl ApiCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            snapshots: build_cache(ttl_seconds),
            historical: build_cache(ttl_seconds),
            benchmarks: build_cache(ttl_seconds),
            engagement: build_cache(ttl_seconds),
        }
    }
}

impl std::fmt::Debug for ApiCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCache").finish_non_exhaustive()
    }
}

fn build_cache<T>(ttl_seconds: u64) -> Cache<String, T>
where
    T: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .time_to_live(Duration::from_secs(ttl_seconds))
        .max_capacity(MAX_ENTRIES)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn test_cache() -> Cache<String, i32> {
        Cache::builder()
            .time_to_live(Duration::from_secs(60))
            .max_capacity(100)
            .build()
    }

    #[tokio::test]
    async fn cached_fetch_miss_then_hit() {
        let cache = test_cache();

        let result = cached_fetch(&cache, "key1", || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);

        let result = cached_fetch(&cache, "key1", || async {
            panic!("should not be called on cache hit")
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn cached_fetch_error_propagation() {
        let cache = test_cache();

        let result: Result<i32, Error> =
            cached_fetch(&cache, "err_key", || async {
                Err(Error::TaskError("db connection failed".to_string()))
            })
            .await;

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(
            err_msg.contains("db connection failed"),
            "Error message was: {}",
            err_msg
        );
    }

    #[tokio::test]
    async fn cached_fetch_stampede_protection() {
        let cache = Arc::new(test_cache());
        let fetch_count = Arc::new(AtomicU32::new(0));

        let mut handles = vec![];
        for _ in 0..10 {
            let cache = cache.clone();
            let fetch_count = fetch_count.clone();
            handles.push(tokio::spawn(async move {
                cached_fetch(&cache, "stampede_key", || async {
                    fetch_count.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok::<_, Error>(42)
                })
                .await
            }));
        }

        for handle in handles {
            let result = handle.await.unwrap();
            assert_eq!(result.unwrap(), 42);
        }

        let count = fetch_count.load(Ordering::SeqCst);
        assert!(count <= 2, "Fetch was called {} times, expected 1-2", count);
    }

    #[tokio::test]
    async fn sweep_overwrite_wins() {
        let cache = test_cache();

        cache.insert("snapshot".to_string(), 1).await;
        cache.insert("snapshot".to_string(), 2).await;

        let cached = cached_fetch(&cache, "snapshot", || async {
            panic!("should serve the overwritten value")
        })
        .await;
        assert_eq!(cached.unwrap(), 2);
    }
}
