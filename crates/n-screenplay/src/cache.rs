//! Classification cache — bounded memoization of line classifications.
//!
//! Keys are trimmed line text. A hit must always agree with re-running the
//! rules, so the cache never decides anything; it only skips regex work on
//! lines the user revisits. Entries are never invalidated one at a time.
//! When the cache is full the oldest entry goes, where "oldest" means least
//! recently *used* ([`CacheEviction::Lru`]) or least recently *inserted*
//! ([`CacheEviction::Fifo`]).

use std::hash::Hash;

use indexmap::IndexMap;

// ---------------------------------------------------------------------------
// CacheEviction
// ---------------------------------------------------------------------------

/// Which entry a full cache drops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEviction {
    /// Least recently used. A hit refreshes the entry.
    #[default]
    Lru,
    /// First in, first out. Hits don't affect order.
    Fifo,
}

impl CacheEviction {
    /// Parse the `:set cacheeviction=` keyword.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lru" => Some(Self::Lru),
            "fifo" => Some(Self::Fifo),
            _ => None,
        }
    }

    /// The `:set` keyword for this strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lru => "lru",
            Self::Fifo => "fifo",
        }
    }
}

// ---------------------------------------------------------------------------
// BoundedCache
// ---------------------------------------------------------------------------

/// A capacity-capped map that evicts from the front of its insertion order.
///
/// Backed by an [`IndexMap`] so the eviction order is the map order: new
/// entries go to the back, LRU hits are moved to the back, and eviction
/// removes index 0.
#[derive(Debug, Clone)]
pub struct BoundedCache<K, V> {
    entries: IndexMap<K, V>,
    capacity: usize,
    eviction: CacheEviction,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq, V: Copy> BoundedCache<K, V> {
    /// Create an empty cache. A capacity of zero stores nothing.
    #[must_use]
    pub fn new(capacity: usize, eviction: CacheEviction) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity.min(1024)),
            capacity,
            eviction,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up `key`, counting the hit or miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(index) = self.entries.get_index_of(key) else {
            self.misses += 1;
            return None;
        };
        self.hits += 1;
        if self.eviction == CacheEviction::Lru {
            let last = self.entries.len() - 1;
            self.entries.move_index(index, last);
            return self.entries.get_index(last).map(|(_, v)| *v);
        }
        self.entries.get_index(index).map(|(_, v)| *v)
    }

    /// Store `value` under `key`, evicting first if the cache is full.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, value);
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lookups that found an entry since the last clear.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that found nothing since the last clear.
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Whether `key` is cached, without touching recency or counters.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize, eviction: CacheEviction) -> BoundedCache<String, u8> {
        BoundedCache::new(capacity, eviction)
    }

    // -- Basics -------------------------------------------------------------

    #[test]
    fn get_after_insert() {
        let mut c = cache(4, CacheEviction::Lru);
        c.insert("a".into(), 1);
        assert_eq!(c.get("a"), Some(1));
        assert_eq!(c.get("b"), None);
        assert_eq!(c.hits(), 1);
        assert_eq!(c.misses(), 1);
    }

    #[test]
    fn reinsert_overwrites_without_growing() {
        let mut c = cache(2, CacheEviction::Fifo);
        c.insert("a".into(), 1);
        c.insert("a".into(), 2);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("a"), Some(2));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut c = cache(0, CacheEviction::Lru);
        c.insert("a".into(), 1);
        assert!(c.is_empty());
        assert_eq!(c.get("a"), None);
    }

    #[test]
    fn clear_resets_counters() {
        let mut c = cache(2, CacheEviction::Lru);
        c.insert("a".into(), 1);
        let _ = c.get("a");
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.hits(), 0);
        assert_eq!(c.misses(), 0);
    }

    // -- Eviction -----------------------------------------------------------

    #[test]
    fn lru_hit_protects_entry() {
        let mut c = cache(2, CacheEviction::Lru);
        c.insert("a".into(), 1);
        c.insert("b".into(), 2);
        let _ = c.get("a");
        c.insert("c".into(), 3);
        assert!(c.contains("a"));
        assert!(!c.contains("b"));
        assert!(c.contains("c"));
    }

    #[test]
    fn fifo_ignores_hits() {
        let mut c = cache(2, CacheEviction::Fifo);
        c.insert("a".into(), 1);
        c.insert("b".into(), 2);
        let _ = c.get("a");
        c.insert("c".into(), 3);
        assert!(!c.contains("a"));
        assert!(c.contains("b"));
        assert!(c.contains("c"));
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut c = cache(3, CacheEviction::Lru);
        for i in 0..20u8 {
            c.insert(i.to_string(), i);
            assert!(c.len() <= 3);
        }
        assert_eq!(c.len(), 3);
    }

    // -- Keywords -----------------------------------------------------------

    #[test]
    fn eviction_keywords() {
        assert_eq!(CacheEviction::parse("lru"), Some(CacheEviction::Lru));
        assert_eq!(CacheEviction::parse("fifo"), Some(CacheEviction::Fifo));
        assert_eq!(CacheEviction::parse("lfu"), None);
        assert_eq!(CacheEviction::Fifo.as_str(), "fifo");
    }
}
