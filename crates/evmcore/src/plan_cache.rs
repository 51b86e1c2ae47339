//! LRU plan cache keyed by `(bytecode, hardfork)` (§4.3).

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    num::NonZeroUsize,
    sync::Arc,
};

use lru::LruCache;

use crate::{error::PlanError, hardfork::Hardfork, plan::Plan};

/// 64-bit key over `bytecode ^ hardfork discriminant` (§4.3 "keyed by a
/// 64-bit hash").
fn cache_key(code: &[u8], hardfork: Hardfork) -> u64 {
    let mut hasher = DefaultHasher::new();
    code.hash(&mut hasher);
    (hardfork as u8).hash(&mut hasher);
    hasher.finish()
}

/// Capacity-bounded LRU mapping a bytecode+hardfork hash to a built
/// [`Plan`]. Plans are reference-counted so handlers can borrow one for
/// the duration of a call without holding the cache's lock/borrow open.
#[derive(Debug)]
pub struct PlanCache {
    entries: LruCache<u64, Arc<Plan>>,
    hits: u64,
    misses: u64,
}

impl PlanCache {
    /// Creates a cache with the given entry capacity (§6.4
    /// `cache_capacity`, default 32).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self { entries: LruCache::new(capacity), hits: 0, misses: 0 }
    }

    /// Returns a cached plan for `(code, hardfork)`, building and
    /// inserting one on a miss. Evicts the least-recently-used entry if at
    /// capacity (§4.3).
    pub fn get_or_build(
        &mut self,
        code: &[u8],
        hardfork: Hardfork,
        max_bytecode_size: usize,
    ) -> Result<Arc<Plan>, PlanError> {
        let key = cache_key(code, hardfork);
        if let Some(plan) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(Arc::clone(plan));
        }
        self.misses += 1;
        tracing::debug!(hardfork = %hardfork, bytes = code.len(), "plan cache miss");
        let plan = Arc::new(Plan::build(code, hardfork, max_bytecode_size)?);
        self.entries.put(key, Arc::clone(&plan));
        tracing::debug!(instructions = plan.len(), "plan built");
        Ok(plan)
    }

    /// Drops all cached plans. Exposed for test determinism (§4.3).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of `get_or_build` calls that hit an existing entry.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of `get_or_build` calls that built a fresh plan.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let mut cache = PlanCache::new(4);
        let code = [0x60, 0x01, 0x00];
        cache.get_or_build(&code, Hardfork::Cancun, 24576).unwrap();
        cache.get_or_build(&code, Hardfork::Cancun, 24576).unwrap();
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn different_hardforks_are_different_keys() {
        let mut cache = PlanCache::new(4);
        let code = [0x60, 0x01, 0x00];
        cache.get_or_build(&code, Hardfork::Cancun, 24576).unwrap();
        cache.get_or_build(&code, Hardfork::Frontier, 24576).unwrap();
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn eviction_respects_capacity() {
        let mut cache = PlanCache::new(1);
        cache.get_or_build(&[0x00], Hardfork::Cancun, 24576).unwrap();
        cache.get_or_build(&[0x01], Hardfork::Cancun, 24576).unwrap();
        cache.get_or_build(&[0x00], Hardfork::Cancun, 24576).unwrap();
        assert_eq!(cache.misses(), 3);
    }

    #[test]
    fn clear_resets_counters() {
        let mut cache = PlanCache::new(4);
        cache.get_or_build(&[0x00], Hardfork::Cancun, 24576).unwrap();
        cache.clear();
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.misses(), 0);
    }
}
