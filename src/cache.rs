//! Read-through query memoization.
//!
//! Each [`QueryCache`] is a bounded LRU of loaded values. Entries expire after a
//! fixed TTL and can be dropped early through tags that mutation endpoints
//! invalidate (`user_jobs_<id>` and friends).

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::CacheConfig;
use crate::models::{interview, job};
use crate::repositories::AwardedAchievement;

/// Tag covering a user's applied-jobs reads.
pub fn user_jobs_tag(user_id: Uuid) -> String {
    format!("user_jobs_{user_id}")
}

/// Tag covering a user's interview reads.
pub fn user_interviews_tag(user_id: Uuid) -> String {
    format!("user_interviews_{user_id}")
}

/// Tag covering a user's awarded-achievement reads.
pub fn user_achievements_tag(user_id: Uuid) -> String {
    format!("user_achievements_{user_id}")
}

struct CacheEntry<V> {
    value: V,
    tags: Vec<String>,
    stored_at: Instant,
}

/// TTL-bound, tag-invalidatable LRU memo around an async loader.
pub struct QueryCache<V> {
    name: &'static str,
    ttl: Duration,
    entries: Arc<Mutex<LruCache<String, CacheEntry<V>>>>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            ttl: self.ttl,
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new(name: &'static str, capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            ttl,
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Returns the cached value for `key` when present and fresh.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let expired = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    /// Stores `value` under `key`, associated with `tags`.
    pub async fn insert(&self, key: String, tags: Vec<String>, value: V) {
        let mut entries = self.entries.lock().await;
        entries.put(
            key,
            CacheEntry {
                value,
                tags,
                stored_at: Instant::now(),
            },
        );
    }

    /// Returns the cached value or runs `load` and caches its success.
    ///
    /// The lock is not held while `load` runs, so two concurrent misses for the
    /// same key may both hit the database; the later write wins.
    pub async fn get_or_try_load<F, Fut, E>(
        &self,
        key: String,
        tags: Vec<String>,
        load: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            counter!("query_cache_hits_total", "cache" => self.name).increment(1);
            return Ok(value);
        }

        counter!("query_cache_misses_total", "cache" => self.name).increment(1);
        let value = load().await?;
        self.insert(key, tags, value.clone()).await;
        Ok(value)
    }

    /// Drops every entry carrying `tag`, returning how many were removed.
    pub async fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries.lock().await;
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.tags.iter().any(|t| t == tag))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        stale.len()
    }
}

/// The cached query families the achievement pipeline reads through.
#[derive(Clone)]
pub struct QueryCaches {
    pub applied_jobs: QueryCache<Vec<job::Model>>,
    pub interviews: QueryCache<Vec<interview::Model>>,
    pub awarded_achievements: QueryCache<Vec<AwardedAchievement>>,
}

impl QueryCaches {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            applied_jobs: QueryCache::new("applied_jobs", config.capacity, config.jobs_ttl()),
            interviews: QueryCache::new(
                "interviews",
                config.capacity,
                config.interviews_ttl(),
            ),
            awarded_achievements: QueryCache::new(
                "awarded_achievements",
                config.capacity,
                config.achievements_ttl(),
            ),
        }
    }

    /// Invalidates `tag` across every family.
    pub async fn invalidate_tag(&self, tag: &str) {
        let removed = self.applied_jobs.invalidate_tag(tag).await
            + self.interviews.invalidate_tag(tag).await
            + self.awarded_achievements.invalidate_tag(tag).await;
        tracing::debug!(tag, removed, "Invalidated cached queries");
    }
}
