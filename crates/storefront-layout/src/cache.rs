//! Plan cache for memoizing planner results.
//!
//! [`SectionLayoutPlanner::plan`] is pure, so a host that re-runs layout on
//! every pass can reuse the previous result whenever the section kinds, the
//! container width and the planner config are unchanged.
//!
//! # Usage
//!
//! ```
//! use storefront_core::catalog;
//! use storefront_layout::{PlanCache, SectionLayoutPlanner};
//!
//! let planner = SectionLayoutPlanner::default();
//! let mut cache = PlanCache::new(16);
//! let screen = catalog::storefront();
//!
//! let first = cache.plan(&planner, &screen, 390.0);
//! let second = cache.plan(&planner, &screen, 390.0);
//! assert_eq!(first, second);
//! assert_eq!(cache.stats().hits, 1);
//! ```
//!
//! # Invalidation
//!
//! Width and section kinds are part of the key, so resizes and section
//! changes never need explicit invalidation. Item changes do not affect plans
//! at all. [`PlanCache::invalidate_all`] exists for host-side changes the key
//! cannot see.
//!
//! # Eviction
//!
//! When at capacity the least used entry is evicted.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};
use storefront_core::SectionDescriptor;
use tracing::{debug, trace};

use crate::{LayoutPlan, PlannerConfig, SectionLayoutPlanner};

/// Key for plan cache lookups.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PlanCacheKey {
    /// Container width bits (`f64::to_bits`).
    pub width_bits: u64,
    /// Fingerprint of the ordered section kinds.
    pub sections_hash: u64,
    /// Number of sections, guards against fingerprint collisions between
    /// lists of different length.
    pub section_count: usize,
    /// Fingerprint of the planner config.
    pub config_hash: u64,
}

impl PlanCacheKey {
    pub fn new(sections: &[SectionDescriptor], container_width: f64, config: &PlannerConfig) -> Self {
        Self {
            width_bits: normalize_width(container_width).to_bits(),
            sections_hash: Self::hash_sections(sections),
            section_count: sections.len(),
            config_hash: Self::hash_config(config),
        }
    }

    /// Reconstruct the container width from the key.
    #[inline]
    pub fn width(&self) -> f64 {
        f64::from_bits(self.width_bits)
    }

    fn hash_sections(sections: &[SectionDescriptor]) -> u64 {
        let mut hasher = FxHasher::default();
        for section in sections {
            section.kind().hash(&mut hasher);
        }
        hasher.finish()
    }

    fn hash_config(config: &PlannerConfig) -> u64 {
        let mut hasher = FxHasher::default();
        config.display_scale.to_bits().hash(&mut hasher);
        config.promoted_top_divider.hash(&mut hasher);
        hasher.finish()
    }
}

// -0.0 and 0.0 plan identically; so does every NaN.
fn normalize_width(width: f64) -> f64 {
    if width == 0.0 || width.is_nan() {
        0.0
    } else {
        width
    }
}

#[derive(Clone, Debug)]
struct CachedPlanEntry {
    plans: Vec<LayoutPlan>,
    generation: u64,
    access_count: u32,
}

/// Statistics about plan cache performance.
#[derive(Debug, Clone, Default)]
pub struct PlanCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate as a fraction (0.0 to 1.0).
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheMissReason {
    Absent,
    Stale,
}

/// Cache of planner results keyed by [`PlanCacheKey`].
#[derive(Debug)]
pub struct PlanCache {
    entries: FxHashMap<PlanCacheKey, CachedPlanEntry>,
    generation: u64,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl PlanCache {
    /// Create a cache holding at most `max_entries` results.
    #[inline]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(max_entries, Default::default()),
            generation: 0,
            max_entries: max_entries.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Plan through the cache.
    pub fn plan(
        &mut self,
        planner: &SectionLayoutPlanner,
        sections: &[SectionDescriptor],
        container_width: f64,
    ) -> Vec<LayoutPlan> {
        let key = PlanCacheKey::new(sections, container_width, planner.config());
        self.get_or_compute(key, || planner.plan(sections, container_width))
    }

    /// Return the cached plans for `key`, or compute, store and return them.
    pub fn get_or_compute<F>(&mut self, key: PlanCacheKey, compute: F) -> Vec<LayoutPlan>
    where
        F: FnOnce() -> Vec<LayoutPlan>,
    {
        let reason = match self.entries.get_mut(&key) {
            Some(entry) if entry.generation == self.generation => {
                self.hits += 1;
                entry.access_count = entry.access_count.saturating_add(1);
                trace!(width = key.width(), "Plan cache hit");
                return entry.plans.clone();
            }
            Some(_) => CacheMissReason::Stale,
            None => CacheMissReason::Absent,
        };

        self.misses += 1;
        let plans = compute();
        debug!(width = key.width(), reason = ?reason, "Plan cache miss");

        if reason == CacheMissReason::Absent && self.entries.len() >= self.max_entries {
            self.evict_least_used();
        }

        self.entries.insert(
            key,
            CachedPlanEntry {
                plans: plans.clone(),
                generation: self.generation,
                access_count: 1,
            },
        );

        plans
    }

    /// Make every entry stale. O(1); entries are replaced on next access.
    #[inline]
    pub fn invalidate_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn stats(&self) -> PlanCacheStats {
        let total = self.hits + self.misses;
        PlanCacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: if total > 0 {
                self.hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    /// Drop all entries immediately.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    fn evict_least_used(&mut self) {
        if let Some(key) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.access_count)
            .map(|(k, _)| *k)
        {
            self.entries.remove(&key);
        }
    }
}

impl Default for PlanCache {
    /// Creates a cache with capacity for 16 results.
    fn default() -> Self {
        Self::new(16)
    }
}
