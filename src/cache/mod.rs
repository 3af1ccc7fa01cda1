//! Two-tier translation cache
//!
//! The memory tier is a bounded [`moka`] cache keyed by the storage
//! rendering of a [`CacheKey`]; the persistent tier keeps one file per key
//! and applies mutations through a single background worker. Lookups try
//! memory first and promote persistent hits into memory. Inserts land in
//! memory immediately and reach disk asynchronously.
//!
//! `clear_all` empties both tiers. `clear_for` only touches the persistent
//! tier: the memory tier cannot be enumerated by article, so warm entries
//! survive until evicted or the process restarts. That asymmetry is part of
//! the contract, not an oversight.

mod disk;
pub mod key;

pub use key::CacheKey;

use crate::config::CacheConfig;
use crate::error::TranslationError;
use crate::types::ArticleId;
use disk::DiskTier;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Two-tier cache for translated text
///
/// Cheap to clone; clones share both tiers and the hit counters.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    memory: Cache<Arc<str>, Arc<str>>,
    disk: DiskTier,
    memory_hits: Arc<AtomicU64>,
    disk_hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl TranslationCache {
    /// Open the cache described by `config`
    ///
    /// Creates the persistent directory if needed and starts the background
    /// writer. A missing or purged directory is a normal cold start.
    pub async fn open(config: &CacheConfig) -> Result<Self, TranslationError> {
        let memory = Cache::builder()
            .max_capacity(config.memory_capacity.into_inner())
            .build();
        let disk = DiskTier::open(config.directory.clone()).await?;

        info!(
            directory = %config.directory.display(),
            memory_capacity = config.memory_capacity.into_inner(),
            "translation cache opened"
        );

        Ok(Self {
            memory,
            disk,
            memory_hits: Arc::new(AtomicU64::new(0)),
            disk_hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Look up a translation, trying memory before disk
    ///
    /// A persistent-tier hit is promoted into the memory tier before it is
    /// returned, so repeated lookups stay off the filesystem.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<str>> {
        let storage = key.storage_key();

        if let Some(text) = self.memory.get(storage.as_str()).await {
            self.memory_hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %storage, "translation cache memory hit");
            return Some(text);
        }

        if let Some(text) = self.disk.read(&storage).await {
            let text: Arc<str> = text.into();
            self.memory
                .insert(Arc::from(storage.as_str()), Arc::clone(&text))
                .await;
            self.disk_hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %storage, "translation cache disk hit, promoted to memory");
            return Some(text);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = %storage, "translation cache miss");
        None
    }

    /// Store a translation
    ///
    /// Visible to subsequent [`get`](Self::get) calls immediately; the
    /// persistent write happens in the background and its failure never
    /// disturbs the in-memory value. Overwrites replace wholesale.
    pub async fn insert(&self, key: &CacheKey, translation: &str) {
        let storage: Arc<str> = key.storage_key().into();
        let text: Arc<str> = translation.into();

        self.memory
            .insert(Arc::clone(&storage), Arc::clone(&text))
            .await;
        self.disk.schedule_write(storage, text).await;
    }

    /// Drop every entry from both tiers
    ///
    /// The memory tier empties before this returns; persistent deletion is
    /// queued behind any in-flight writes.
    pub async fn clear_all(&self) {
        self.memory.invalidate_all();
        self.disk.schedule_clear_all().await;
        debug!("translation cache cleared");
    }

    /// Drop persisted entries for one article
    ///
    /// Memory-tier entries for the article are deliberately left in place;
    /// see the module docs for why.
    pub async fn clear_for(&self, article: &ArticleId) {
        self.disk.schedule_clear_article(article.clone()).await;
    }

    /// Total bytes currently persisted; best-effort point-in-time estimate
    pub async fn size_bytes(&self) -> u64 {
        self.disk.size_bytes().await
    }

    /// Wait for every queued persistent operation to complete
    pub async fn flush(&self) {
        self.disk.flush().await;
    }

    /// Counters since this cache was opened
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            disk_hits: self.disk_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            memory_entries: self.memory.entry_count(),
        }
    }
}

/// Point-in-time cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_hits: u64,
    pub disk_hits: u64,
    pub misses: u64,
    /// Entries in the memory tier; eventually consistent under churn
    pub memory_entries: u64,
}

impl CacheStats {
    /// Hits across both tiers
    #[must_use]
    pub const fn total_hits(&self) -> u64 {
        self.memory_hits + self.disk_hits
    }

    /// Fraction of lookups answered by either tier, 0.0 when idle
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_hits() + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.total_hits() as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryCapacity;
    use crate::types::{ContentKind, LanguageTag};

    fn test_key(article: &str, kind: ContentKind, language: &str) -> CacheKey {
        CacheKey::new(
            ArticleId::try_from(article).unwrap(),
            kind,
            LanguageTag::try_from(language).unwrap(),
        )
    }

    fn test_config(dir: &tempfile::TempDir) -> CacheConfig {
        CacheConfig {
            directory: dir.path().to_path_buf(),
            memory_capacity: MemoryCapacity::try_new(1000).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get_without_waiting_for_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&test_config(&dir)).await.unwrap();

        let key = test_key("a1", ContentKind::Title, "fr");
        cache.insert(&key, "Bonjour").await;

        // No flush: the in-memory value answers immediately.
        assert_eq!(cache.get(&key).await.as_deref(), Some("Bonjour"));
        let stats = cache.stats();
        assert_eq!(stats.memory_hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_miss_counts() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&test_config(&dir)).await.unwrap();

        let key = test_key("nope", ContentKind::Body, "en");
        assert!(cache.get(&key).await.is_none());
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().total_hits(), 0);
    }

    #[tokio::test]
    async fn test_disk_hit_promotes_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&test_config(&dir)).await.unwrap();

        let key = test_key("a1", ContentKind::Body, "de");
        cache.insert(&key, "Hallo Welt").await;
        cache.flush().await;

        // Simulate memory-tier loss; the entry must come back from disk.
        cache.memory.invalidate_all();
        assert_eq!(cache.get(&key).await.as_deref(), Some("Hallo Welt"));
        assert_eq!(cache.stats().disk_hits, 1);

        // Promotion means the next lookup is a memory hit.
        assert_eq!(cache.get(&key).await.as_deref(), Some("Hallo Welt"));
        assert_eq!(cache.stats().memory_hits, 1);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&test_config(&dir)).await.unwrap();

        let key = test_key("a1", ContentKind::Title, "en");
        cache.insert(&key, "first").await;
        cache.insert(&key, "second").await;
        assert_eq!(cache.get(&key).await.as_deref(), Some("second"));

        cache.flush().await;
        cache.memory.invalidate_all();
        assert_eq!(cache.get(&key).await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_clear_all_empties_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&test_config(&dir)).await.unwrap();

        let key = test_key("a1", ContentKind::Title, "en");
        cache.insert(&key, "value").await;
        cache.flush().await;

        cache.clear_all().await;
        cache.flush().await;
        assert!(cache.get(&key).await.is_none());
        assert_eq!(cache.size_bytes().await, 0);
    }

    #[tokio::test]
    async fn test_clear_for_leaves_memory_warm() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&test_config(&dir)).await.unwrap();

        let key = test_key("a1", ContentKind::Title, "en");
        cache.insert(&key, "warm").await;
        cache.flush().await;

        cache.clear_for(key.article()).await;
        cache.flush().await;

        // Persisted entry is gone, but the warm memory entry still answers.
        assert_eq!(cache.get(&key).await.as_deref(), Some("warm"));
        assert_eq!(cache.size_bytes().await, 0);

        // Once memory drops it, the entry is gone for good.
        cache.memory.invalidate_all();
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_for_spares_other_articles() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&test_config(&dir)).await.unwrap();

        let mine = test_key("a1", ContentKind::Title, "en");
        let other = test_key("b2", ContentKind::Title, "en");
        cache.insert(&mine, "mine").await;
        cache.insert(&other, "other").await;
        cache.flush().await;

        cache.clear_for(mine.article()).await;
        cache.flush().await;
        cache.memory.invalidate_all();

        assert!(cache.get(&mine).await.is_none());
        assert_eq!(cache.get(&other).await.as_deref(), Some("other"));
    }

    #[tokio::test]
    async fn test_memory_tier_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            directory: dir.path().to_path_buf(),
            memory_capacity: MemoryCapacity::try_new(2).unwrap(),
        };
        let cache = TranslationCache::open(&config).await.unwrap();

        for i in 0..10 {
            let key = test_key(&format!("article-{i}"), ContentKind::Title, "en");
            cache.insert(&key, "x").await;
        }
        cache.memory.run_pending_tasks().await;
        assert!(
            cache.stats().memory_entries <= 2,
            "memory tier exceeded its bound: {}",
            cache.stats().memory_entries
        );
    }

    #[tokio::test]
    async fn test_read_after_write_before_eviction_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            directory: dir.path().to_path_buf(),
            memory_capacity: MemoryCapacity::try_new(2).unwrap(),
        };
        let cache = TranslationCache::open(&config).await.unwrap();

        // Even with the tier full, a just-inserted entry is readable.
        for i in 0..5 {
            let key = test_key(&format!("article-{i}"), ContentKind::Title, "en");
            cache.insert(&key, "fresh").await;
            assert_eq!(
                cache.get(&key).await.as_deref(),
                Some("fresh"),
                "entry {i} not readable right after insert"
            );
        }
    }

    #[tokio::test]
    async fn test_distinct_kinds_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&test_config(&dir)).await.unwrap();

        let title = test_key("a1", ContentKind::Title, "en");
        let body = test_key("a1", ContentKind::Body, "en");
        cache.insert(&title, "title text").await;
        cache.insert(&body, "body text").await;

        assert_eq!(cache.get(&title).await.as_deref(), Some("title text"));
        assert_eq!(cache.get(&body).await.as_deref(), Some("body text"));
    }

    #[test]
    fn test_stats_hit_rate() {
        let stats = CacheStats {
            memory_hits: 6,
            disk_hits: 2,
            misses: 2,
            memory_entries: 8,
        };
        assert_eq!(stats.total_hits(), 8);
        assert!((stats.hit_rate() - 0.8).abs() < f64::EPSILON);

        let idle = CacheStats {
            memory_hits: 0,
            disk_hits: 0,
            misses: 0,
            memory_entries: 0,
        };
        assert_eq!(idle.hit_rate(), 0.0);
    }
}
