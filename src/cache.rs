// Wavcache -- A lossless codec for cached 16-bit sample streams
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>. This file may not be
// copied, modified, or distributed except according to those terms.

//! A frequency-ordered recency cache of recently-seen 16-bit samples.
//!
//! Entries are kept sorted by descending hit count; a freshly-promoted
//! entry is moved just in front of the first entry with a strictly
//! greater count. Because both encoder and decoder mutate the cache
//! identically on every sample, a sample's position ("cache index") is a
//! pure function of the stream prefix seen so far -- this determinism is
//! the entire basis of the codec's correctness.

/// Default cache capacity (spec.md's constant `C`).
pub const CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    key: u16,
    count: u32,
}

/// A frequency-ordered cache of 16-bit samples with a fixed capacity.
#[derive(Debug, Clone)]
pub struct Cache {
    order: Vec<Entry>,
    capacity: usize,
}

impl Cache {
    /// Creates an empty cache with the default capacity.
    pub fn new() -> Cache {
        Cache::with_capacity(CAPACITY)
    }

    /// Creates an empty cache with a custom capacity. Exposed for testing
    /// the ordering invariant on small caches; production encode/decode
    /// always uses [`CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Cache {
        Cache { order: Vec::with_capacity(capacity), capacity }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The cache's fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `v`'s current position, if present.
    pub fn index(&self, v: u16) -> Option<usize> {
        self.order.iter().position(|e| e.key == v)
    }

    /// Returns the sample at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`. Callers decoding untrusted input must
    /// check `i < cache.len()` themselves and surface
    /// [`crate::error::Error::CacheOutOfRange`] instead of calling this
    /// with an out-of-range index.
    pub fn at(&self, i: usize) -> u16 {
        self.order[i].key
    }

    /// Admits or promotes `v`, maintaining the frequency-descending,
    /// recency-tiebreak ordering invariant.
    pub fn add(&mut self, v: u16) {
        let idx = match self.index(v) {
            Some(idx) => {
                self.order[idx].count += 1;
                idx
            }
            None => {
                if self.order.len() >= self.capacity {
                    self.order.pop();
                }
                self.order.push(Entry { key: v, count: 1 });
                self.order.len() - 1
            }
        };

        let count = self.order[idx].count;

        // Walk left past every entry with a strictly smaller count than
        // the one we just touched; the new home is just past the first
        // entry whose count is >= ours.
        let mut new_idx = idx;
        while new_idx > 0 && self.order[new_idx - 1].count < count {
            new_idx -= 1;
        }

        if new_idx != idx {
            let entry = self.order.remove(idx);
            self.order.insert(new_idx, entry);
        }
    }

    /// Iterates the cache's entries, front to back, as `(sample, count)`.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u32)> + '_ {
        self.order.iter().map(|e| (e.key, e.count))
    }
}

impl Default for Cache {
    fn default() -> Cache {
        Cache::new()
    }
}
