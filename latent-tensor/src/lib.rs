// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Synthetic transformer tensors.
//!
//! Nothing here runs a model: every value is drawn from a caller-supplied
//! random source and shaped so that it *looks* like the real thing
//! (extreme-biased embeddings, row-stochastic attention, a one-peak logit
//! distribution). Pass a seeded [`rng::seeded`] handle for reproducible
//! datasets, or [`rng::from_entropy`] for varied output.

pub mod rng;
pub mod token;
pub mod embedding;
pub mod attention;
pub mod logit;
pub mod word_node;
pub mod dataset;

pub use attention::{generate_attention_data, AttentionData};
pub use dataset::{DatasetCache, DatasetKey, TransformerDataset, DEFAULT_CACHE_CAPACITY};
pub use embedding::{bias_toward_extremes, generate_embedding_data, EmbeddingData, DEFAULT_EMBEDDING_DIM};
pub use logit::{generate_logit_data, generate_logit_data_with, LogitData, LogitProfile, VocabLogit};
pub use token::{tokenize, TokenNode};
pub use word_node::{generate_word_nodes, WordNode};
