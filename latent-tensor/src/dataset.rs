// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! The full dataset for one composition, and a cache keyed by its inputs.
//!
//! Generation is comparatively expensive and must not run per frame. The
//! cache is keyed by input equality (sentence, dimension, seed) and hands out
//! shared `Arc`s, so downstream geometry can detect "same dataset" with a
//! pointer comparison.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attention::{generate_attention_data, AttentionData};
use crate::embedding::{generate_embedding_data, EmbeddingData};
use crate::logit::{generate_logit_data, LogitData};
use crate::rng;

/// Everything a dataset is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetKey {
    pub text: String,
    pub embedding_dim: usize,
    /// `None` draws from OS entropy: varied output, still cached per key.
    pub seed: Option<u64>,
}

impl DatasetKey {
    pub fn new(text: impl Into<String>, embedding_dim: usize, seed: Option<u64>) -> Self {
        Self {
            text: text.into(),
            embedding_dim,
            seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerDataset {
    pub key: DatasetKey,
    pub embedding: EmbeddingData,
    pub attention: AttentionData,
    pub logits: LogitData,
}

impl TransformerDataset {
    /// One random stream, consumed in a fixed order: embedding, attention, logits.
    pub fn generate(key: &DatasetKey) -> Self {
        let mut rng = rng::for_seed(key.seed);
        let embedding = generate_embedding_data(&key.text, key.embedding_dim, &mut rng);
        let attention = generate_attention_data(&embedding.tokens, &mut rng);
        let logits = generate_logit_data(&mut rng);

        if embedding.tokens.is_empty() {
            tracing::warn!("sentence has no tokens; embedding and attention geometry will be empty");
        }

        Self {
            key: key.clone(),
            embedding,
            attention,
            logits,
        }
    }

    pub fn token_count(&self) -> usize {
        self.embedding.tokens.len()
    }
}

/// Entries kept by [`DatasetCache::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Input-keyed store of generated datasets, bounded by least-recent use.
///
/// Evicting an entry only drops the cache's handle; scenes holding the `Arc`
/// keep their dataset. An evicted unseeded key is drawn afresh on next use.
#[derive(Debug)]
pub struct DatasetCache {
    entries: HashMap<DatasetKey, CacheEntry>,
    capacity: usize,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

#[derive(Debug)]
struct CacheEntry {
    dataset: Arc<TransformerDataset>,
    last_used: u64,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` datasets (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            tick: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Return the cached dataset for `key`, generating it on first use.
    pub fn get_or_generate(&mut self, key: &DatasetKey) -> Arc<TransformerDataset> {
        self.tick += 1;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used = self.tick;
            self.hits += 1;
            return Arc::clone(&entry.dataset);
        }
        self.misses += 1;
        tracing::debug!(
            text = %key.text,
            embedding_dim = key.embedding_dim,
            seed = ?key.seed,
            "dataset cache miss"
        );
        if self.entries.len() >= self.capacity {
            self.evict_least_recent();
        }
        let ds = Arc::new(TransformerDataset::generate(key));
        self.entries.insert(
            key.clone(),
            CacheEntry {
                dataset: Arc::clone(&ds),
                last_used: self.tick,
            },
        );
        ds
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.evictions += 1;
            tracing::debug!(text = %key.text, "dataset cache eviction");
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn contains(&self, key: &DatasetKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
