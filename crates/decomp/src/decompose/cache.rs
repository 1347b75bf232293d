// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type cache for compiled decomposers.
//!
//! The cache ensures that field compilation happens only once per concrete
//! record type. Lookup, compilation and insertion all run inside one
//! exclusive critical section, so a decomposer is either absent or fully
//! built and published; concurrent first requests for the same type
//! serialize and converge on a single instance. Entries are never evicted.

use super::Decomposer;
use crate::reflect::Record;
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    /// Compile time of the most recent miss.
    pub last_miss_ns: u64,
}

#[derive(Default)]
struct CacheState {
    decomposers: HashMap<TypeId, Arc<Decomposer>>,
    stats: LookupStats,
}

/// Populate-once, never-evict map from record type to its decomposer.
#[derive(Default)]
pub struct TypeCache {
    inner: Mutex<CacheState>,
}

impl TypeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached decomposer for the concrete type of `value`, compiling it on a miss.
    pub fn get_or_compile(&self, value: &dyn Record) -> Arc<Decomposer> {
        let key = value.as_any().type_id();

        let mut state = self.inner.lock();
        if let Some(hit) = state.decomposers.get(&key).map(Arc::clone) {
            state.stats.hits = state.stats.hits.saturating_add(1);
            log::trace!("[TypeCache::get_or_compile] hit {}", hit.type_name);
            return hit;
        }

        let start = Instant::now();
        let shape = value.record_shape();
        if shape.type_id() != key {
            log::warn!(
                "[TypeCache::get_or_compile] {} describes another type than the value; direct reads disabled for it",
                shape.type_name
            );
        }
        let built = Arc::new(Decomposer::compile(shape));
        state.decomposers.insert(key, Arc::clone(&built));

        let elapsed = start.elapsed();
        state.stats.misses = state.stats.misses.saturating_add(1);
        state.stats.last_miss_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);

        log::debug!(
            "[TypeCache::get_or_compile] compiled {} ({} output fields) in {:?}",
            shape.type_name,
            built.out_tag().len(),
            elapsed
        );
        built
    }

    /// Decomposer already compiled for `type_id`, if any.
    pub fn peek(&self, type_id: TypeId) -> Option<Arc<Decomposer>> {
        self.inner.lock().decomposers.get(&type_id).map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().decomposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        self.inner.lock().stats
    }
}
