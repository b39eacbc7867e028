//! Memoization of load outcomes.
//!
//! Re-uploading the same file with the same options returns the earlier result (including an
//! earlier failure) until the entry expires.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::ingestion::{Artifact, Dispatcher, ParserOptions};
use crate::types::TableSet;

/// Default time-to-live for cached loads.
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);

struct Entry {
    stored_at: Instant,
    outcome: Option<Arc<TableSet>>,
}

/// Thread-safe cache of [`Dispatcher::load`] outcomes.
pub struct TableSetCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for TableSetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSetCache")
            .field("ttl", &self.ttl)
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

impl Default for TableSetCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TableSetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached outcome for `(artifact, options)` or load it through `dispatcher`.
    ///
    /// The lock is not held while loading; two concurrent misses for the same key both load
    /// and the later one wins.
    pub fn get_or_load(
        &self,
        dispatcher: &Dispatcher,
        artifact: &Artifact,
        options: &ParserOptions,
    ) -> Option<Arc<TableSet>> {
        let key = cache_key(artifact, options);

        if let Some(outcome) = self.lookup(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(artifact = %artifact.name(), "load cache hit");
            return outcome;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let outcome = dispatcher.load(artifact, options).map(Arc::new);
        let mut entries = self.lock();
        entries.retain(|_, e| e.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                outcome: outcome.clone(),
            },
        );
        outcome
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    // A panic while holding the lock leaves the map itself intact.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("load cache lock was poisoned; recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    // Outer `None` is a miss; inner `None` is a cached failure.
    fn lookup(&self, key: &str) -> Option<Option<Arc<TableSet>>> {
        let mut entries = self.lock();
        let fresh = entries.get(key)?.stored_at.elapsed() < self.ttl;
        if fresh {
            entries.get(key).map(|entry| entry.outcome.clone())
        } else {
            entries.remove(key);
            None
        }
    }
}

fn cache_key(artifact: &Artifact, options: &ParserOptions) -> String {
    format!("{}|{}", artifact.fingerprint(), options.canonical())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv() -> Artifact {
        Artifact::upload("sales.csv", "date,amount\n2024-01-01,10\n")
    }

    #[test]
    fn second_load_is_a_hit() {
        let cache = TableSetCache::default();
        let dispatcher = Dispatcher::default();

        let first = cache.get_or_load(&dispatcher, &csv(), &ParserOptions::new()).unwrap();
        let second = cache.get_or_load(&dispatcher, &csv(), &ParserOptions::new()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn options_are_part_of_the_key() {
        let cache = TableSetCache::default();
        let dispatcher = Dispatcher::default();

        cache.get_or_load(&dispatcher, &csv(), &ParserOptions::new());
        cache.get_or_load(&dispatcher, &csv(), &ParserOptions::new().set("nrows", 0));
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn failures_are_cached_too() {
        let cache = TableSetCache::default();
        let dispatcher = Dispatcher::default();
        let notes = Artifact::upload("notes.txt", "hello");

        assert!(cache.get_or_load(&dispatcher, &notes, &ParserOptions::new()).is_none());
        assert!(cache.get_or_load(&dispatcher, &notes, &ParserOptions::new()).is_none());
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn expired_entries_reload() {
        let cache = TableSetCache::new(Duration::ZERO);
        let dispatcher = Dispatcher::default();

        cache.get_or_load(&dispatcher, &csv(), &ParserOptions::new());
        cache.get_or_load(&dispatcher, &csv(), &ParserOptions::new());
        assert_eq!((cache.hits(), cache.misses()), (0, 2));
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entries_are_pruned_on_insert() {
        let cache = TableSetCache::new(Duration::ZERO);
        let dispatcher = Dispatcher::default();

        for i in 0..20 {
            let upload = Artifact::upload(format!("part-{i}.csv"), "x\n1\n");
            cache.get_or_load(&dispatcher, &upload, &ParserOptions::new());
        }
        assert_eq!(cache.entries.lock().unwrap().len(), 1);
    }

    #[test]
    fn poisoned_lock_still_caches() {
        let cache = Arc::new(TableSetCache::default());
        let poisoner = Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the cache lock");
        })
        .join();
        assert!(cache.entries.is_poisoned());

        let dispatcher = Dispatcher::default();
        cache.get_or_load(&dispatcher, &csv(), &ParserOptions::new());
        cache.get_or_load(&dispatcher, &csv(), &ParserOptions::new());
        assert_eq!((cache.hits(), cache.len()), (1, 1));
    }
}
