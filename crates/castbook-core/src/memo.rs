//! Memoized derivation.
//!
//! The cache holds the last result together with the inputs that produced
//! it. A lookup with the same dataset snapshot and an equal [`Query`]
//! returns the cached indices; anything else recomputes.

use crate::dataset::Dataset;
use crate::derive::{derive_indices, Query};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Entry {
    dataset: Dataset,
    query: Query,
    indices: Arc<[usize]>,
}

/// Single-entry cache in front of [`derive_indices`].
#[derive(Debug, Clone, Default)]
pub struct DerivationCache {
    entry: Option<Entry>,
    hits: u64,
    misses: u64,
}

impl DerivationCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived indices into `dataset.actors()` for `query`.
    pub fn get(&mut self, dataset: &Dataset, query: &Query) -> Arc<[usize]> {
        if let Some(entry) = &self.entry {
            if entry.dataset.same_snapshot(dataset) && entry.query == *query {
                self.hits += 1;
                tracing::debug!(rows = entry.indices.len(), "derivation cache hit");
                return Arc::clone(&entry.indices);
            }
        }

        self.misses += 1;
        let indices: Arc<[usize]> = derive_indices(dataset, query).into();
        tracing::debug!(
            rows = indices.len(),
            movie = query.selected_movie.as_deref().unwrap_or(""),
            search = %query.search,
            sort = ?query.sort,
            "derivation recomputed"
        );
        self.entry = Some(Entry {
            dataset: dataset.clone(),
            query: query.clone(),
            indices: Arc::clone(&indices),
        });
        indices
    }

    /// Drop the cached entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that recomputed.
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }
}
