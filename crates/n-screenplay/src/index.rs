//! Bounded frequency index — ranked names for autocomplete.
//!
//! Counts how often each normalized key (single-spaced, uppercased) has been seen,
//! capped at a fixed number of entries. Two instances back a session: one for
//! character names, one for scene headings.
//!
//! Alongside the counts sits a **variation index**: every whitespace token of
//! a key points back at the keys containing it, so `SMITH` finds
//! `JOHN SMITH` and `SMITH JOHN` finds it too.
//!
//! # Eviction
//!
//! When a `track` pushes the index over capacity, entries are ranked by
//! ascending count and, among equal counts, by how long ago they were last
//! tracked. The lowest-ranked entries are dropped until the index is back at
//! capacity, and their tokens are pruned from the variation index.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

/// Default number of suggestions.
pub const DEFAULT_SUGGESTIONS: usize = 5;

/// Normalize a raw key: trim, collapse inner whitespace runs to one space,
/// and uppercase. `int.   house` and `INT. HOUSE` are the same key.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    count: usize,
    /// Tick of the most recent `track`.
    last_seen: u64,
}

// ---------------------------------------------------------------------------
// BoundedFrequencyIndex
// ---------------------------------------------------------------------------

/// Occurrence counts for at most `capacity` normalized keys.
///
/// Iteration order of the underlying map is first-encounter order, which is
/// what makes every query deterministic.
#[derive(Debug, Clone)]
pub struct BoundedFrequencyIndex {
    entries: IndexMap<String, Entry>,
    variations: HashMap<String, IndexSet<String>>,
    capacity: usize,
    clock: u64,
}

impl BoundedFrequencyIndex {
    /// Create an empty index holding at most `capacity` keys.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            variations: HashMap::new(),
            capacity,
            clock: 0,
        }
    }

    /// Count one occurrence of `raw`. Blank keys are ignored.
    pub fn track(&mut self, raw: &str) {
        let key = normalize(raw);
        if key.is_empty() {
            return;
        }

        self.clock += 1;
        let clock = self.clock;
        let entry = self.entries.entry(key.clone()).or_insert(Entry {
            count: 0,
            last_seen: clock,
        });
        entry.count += 1;
        entry.last_seen = clock;

        for token in key.split_whitespace() {
            self.variations
                .entry(token.to_string())
                .or_default()
                .insert(key.clone());
        }

        if self.entries.len() > self.capacity {
            self.evict();
        }
    }

    /// Up to `limit` keys matching `partial`.
    ///
    /// Direct substring matches come first, most frequent first. Keys found
    /// only through the variation index (every token of `partial` appears in
    /// some token of the key, in any order) follow. No key appears twice.
    #[must_use]
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        let needle = normalize(partial);

        let mut direct: Vec<(&String, &Entry)> = self
            .entries
            .iter()
            .filter(|(key, _)| key.contains(&needle))
            .collect();
        direct.sort_by(|a, b| b.1.count.cmp(&a.1.count));

        let mut out: Vec<String> = direct
            .into_iter()
            .take(limit)
            .map(|(key, _)| key.clone())
            .collect();
        if out.len() >= limit {
            return out;
        }

        for key in self.variation_matches(&needle) {
            if out.len() >= limit {
                break;
            }
            if !out.iter().any(|k| k == key) {
                out.push(key.clone());
            }
        }
        out
    }

    /// Up to `limit` keys, most frequent first. Ties keep first-encounter
    /// order.
    #[must_use]
    pub fn top_entries(&self, limit: usize) -> Vec<String> {
        self.ranked()
            .into_iter()
            .take(limit)
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Every key with its count, most frequent first.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry.count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Occurrences of `raw` (after normalization), 0 if untracked.
    #[must_use]
    pub fn count(&self, raw: &str) -> usize {
        self.entries.get(&normalize(raw)).map_or(0, |e| e.count)
    }

    /// Whether `raw` (after normalization) is tracked.
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.entries.contains_key(&normalize(raw))
    }

    /// Number of tracked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of keys.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.variations.clear();
        self.clock = 0;
    }

    /// Keys reachable through the token index, in first-encounter order.
    fn variation_matches(&self, needle: &str) -> Vec<&String> {
        let parts: Vec<&str> = needle.split_whitespace().collect();
        if parts.is_empty() {
            return Vec::new();
        }

        let sets: Vec<IndexSet<&String>> = parts.iter().map(|part| self.reachable(part)).collect();
        self.entries
            .keys()
            .filter(|key| sets.iter().all(|set| set.contains(key)))
            .collect()
    }

    /// Keys owning a token that contains `part`.
    fn reachable(&self, part: &str) -> IndexSet<&String> {
        self.variations
            .iter()
            .filter(|(token, _)| token.contains(part))
            .flat_map(|(_, keys)| keys.iter())
            .collect()
    }

    fn evict(&mut self) {
        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return;
        }

        let mut ranked: Vec<(String, Entry)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), *entry))
            .collect();
        ranked.sort_by_key(|(_, e)| (e.count, e.last_seen));

        for (key, entry) in ranked.into_iter().take(excess) {
            log::trace!("evicting {key:?} (count {})", entry.count);
            self.entries.shift_remove(&key);
            for token in key.split_whitespace() {
                if let Some(keys) = self.variations.get_mut(token) {
                    keys.shift_remove(&key);
                    if keys.is_empty() {
                        self.variations.remove(token);
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index_with(capacity: usize, keys: &[&str]) -> BoundedFrequencyIndex {
        let mut index = BoundedFrequencyIndex::new(capacity);
        for key in keys {
            index.track(key);
        }
        index
    }

    // -- Tracking -----------------------------------------------------------

    #[test]
    fn track_normalizes_and_counts() {
        let index = index_with(10, &["john", "  JOHN ", "John", "mary"]);
        assert_eq!(index.count("JOHN"), 3);
        assert_eq!(index.count("mary"), 1);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn inner_whitespace_does_not_split_keys() {
        let index = index_with(10, &["int.   house", "INT. HOUSE", "INT.\tHOUSE "]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.count("int. house"), 3);
        assert_eq!(index.suggest("int.  ho", 5), vec!["INT. HOUSE".to_string()]);
    }

    #[test]
    fn blank_keys_are_ignored() {
        let index = index_with(10, &["", "   "]);
        assert!(index.is_empty());
    }

    // -- Eviction -----------------------------------------------------------

    #[test]
    fn overflow_drops_lowest_count() {
        let index = index_with(3, &["A", "A", "B", "B", "C", "C", "C", "D"]);
        assert_eq!(index.len(), 3);
        assert!(!index.contains("D"));
        assert!(index.contains("A"));
        assert!(index.contains("B"));
        assert!(index.contains("C"));
    }

    #[test]
    fn ties_evict_least_recently_tracked() {
        let index = index_with(3, &["A", "A", "A", "B", "C", "C", "D"]);
        assert_eq!(index.len(), 3);
        assert!(!index.contains("B"));
        assert!(index.contains("D"));
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut index = BoundedFrequencyIndex::new(5);
        for i in 0..50 {
            index.track(&format!("NAME {i}"));
            assert!(index.len() <= 5);
        }
        assert_eq!(index.capacity(), 5);
    }

    #[test]
    fn evicted_keys_leave_the_variation_index() {
        let index = index_with(1, &["JOHN SMITH", "JOHN SMITH", "MARY JONES"]);
        assert!(index.suggest("JONES", 5).is_empty());
        assert_eq!(index.suggest("SMITH", 5), vec!["JOHN SMITH".to_string()]);
    }

    // -- Suggestions --------------------------------------------------------

    #[test]
    fn suggest_substring_matches() {
        let index = index_with(
            10,
            &["INT. COFFEE SHOP", "INT. COFFEE HOUSE", "EXT. PARK"],
        );
        let got = index.suggest("coffee", 5);
        assert_eq!(
            got,
            vec!["INT. COFFEE SHOP".to_string(), "INT. COFFEE HOUSE".to_string()]
        );
    }

    #[test]
    fn suggest_ranks_direct_matches_by_count() {
        let index = index_with(10, &["JOHN", "JOHNNY", "JOHNNY"]);
        assert_eq!(
            index.suggest("JOHN", 5),
            vec!["JOHNNY".to_string(), "JOHN".to_string()]
        );
    }

    #[test]
    fn suggest_through_token_variations() {
        let index = index_with(10, &["JOHN SMITH", "MARY SMITHERS", "BOB"]);
        // Token order differs from the key, so only the variation index hits.
        assert_eq!(index.suggest("smith john", 5), vec!["JOHN SMITH".to_string()]);
    }

    #[test]
    fn suggest_respects_limit_and_dedups() {
        let index = index_with(10, &["ANNA", "ANNE", "ANNIE", "HANNA"]);
        let got = index.suggest("ANN", 3);
        assert_eq!(got.len(), 3);
        let all = index.suggest("ANN", 10);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn empty_partial_lists_everything_up_to_limit() {
        let index = index_with(10, &["A", "B", "B"]);
        assert_eq!(index.suggest("", 5), vec!["B".to_string(), "A".to_string()]);
    }

    // -- Ranking ------------------------------------------------------------

    #[test]
    fn top_entries_by_descending_count() {
        let index = index_with(10, &["A", "B", "B", "C", "C", "C", "D"]);
        assert_eq!(
            index.top_entries(3),
            vec!["C".to_string(), "B".to_string(), "A".to_string()]
        );
        assert_eq!(index.ranked()[0], ("C", 3));
    }

    // -- Clearing -----------------------------------------------------------

    #[test]
    fn clear_forgets_everything() {
        let mut index = index_with(10, &["JOHN SMITH"]);
        index.clear();
        assert!(index.is_empty());
        assert!(index.suggest("SMITH", 5).is_empty());
    }
}
