// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Token embedding matrix generation.
//!
//! Values are drawn uniformly from [-1, 1] and pushed toward the extremes with
//! `sign(v)·√|v|`, which thins out the near-zero band so the rendered matrix
//! reads as high-contrast.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::token::{tokenize, TokenNode};

pub const DEFAULT_EMBEDDING_DIM: usize = 64;

/// Row-major `[tokens × embedding_dim]` matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingData {
    pub tokens: Vec<TokenNode>,
    pub embedding_dim: usize,
    /// `values[i * embedding_dim + d]` is token `i`, dimension `d`.
    pub values: Vec<f32>,
}

impl EmbeddingData {
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn cell_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, token: usize, dim: usize) -> f32 {
        self.values[token * self.embedding_dim + dim]
    }

    pub fn row(&self, token: usize) -> &[f32] {
        let start = token * self.embedding_dim;
        &self.values[start..start + self.embedding_dim]
    }
}

/// `sign(v) · |v|^0.5`. Preserves sign; zero maps to zero.
pub fn bias_toward_extremes(v: f32) -> f32 {
    if v == 0.0 {
        return v;
    }
    v.signum() * v.abs().sqrt()
}

pub fn generate_embedding_data<R: Rng + ?Sized>(
    input_text: &str,
    embedding_dim: usize,
    rng: &mut R,
) -> EmbeddingData {
    let tokens = tokenize(input_text);
    let num_elements = tokens.len() * embedding_dim;

    let values: Vec<f32> = (0..num_elements)
        .map(|_| bias_toward_extremes(rng.gen_range(-1.0f32..=1.0)))
        .collect();

    tracing::debug!(
        tokens = tokens.len(),
        embedding_dim,
        cells = values.len(),
        "generated embedding matrix"
    );

    EmbeddingData {
        tokens,
        embedding_dim,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use proptest::prelude::*;

    #[test]
    fn test_shape_for_five_tokens() {
        let data = generate_embedding_data("one two three four five", 64, &mut seeded(1));
        assert_eq!(data.tokens.len(), 5);
        assert_eq!(data.values.len(), 320);
        assert_eq!(data.row(4).len(), 64);
        assert_eq!(data.value(4, 63), data.values[319]);
    }

    #[test]
    fn test_values_in_unit_range() {
        let data = generate_embedding_data("a b c d", 128, &mut seeded(3));
        assert!(data.values.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_bias_thins_the_middle() {
        // Uniform draws land in (-0.25, 0.25) half the time; after the bias
        // only values with |v| < 0.0625 do, about 1 in 16.
        let data = generate_embedding_data("x y z w v u t s", 256, &mut seeded(11));
        let small = data.values.iter().filter(|v| v.abs() < 0.25).count();
        let frac = small as f64 / data.values.len() as f64;
        assert!(frac < 0.12, "near-zero fraction too high: {frac}");
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_embedding_data("same input", 16, &mut seeded(42));
        let b = generate_embedding_data("same input", 16, &mut seeded(42));
        assert_eq!(a, b);
        let c = generate_embedding_data("same input", 16, &mut seeded(43));
        assert_ne!(a.values, c.values);
    }

    #[test]
    fn test_empty_sentence_is_empty_dataset() {
        let data = generate_embedding_data("   ", 64, &mut seeded(0));
        assert!(data.tokens.is_empty());
        assert!(data.is_empty());
        assert_eq!(data.embedding_dim, 64);
    }

    #[test]
    fn test_bias_zero() {
        assert_eq!(bias_toward_extremes(0.0), 0.0);
        assert_eq!(bias_toward_extremes(-0.0), 0.0);
        assert_eq!(bias_toward_extremes(0.25), 0.5);
        assert_eq!(bias_toward_extremes(-0.25), -0.5);
    }

    proptest! {
        #[test]
        fn prop_bias_preserves_sign(v in -1.0f32..=1.0) {
            let r = bias_toward_extremes(v);
            prop_assert!(r.abs() >= 0.0);
            prop_assert_eq!(r == 0.0, v == 0.0);
            if v != 0.0 {
                prop_assert_eq!(r.signum(), v.signum());
                prop_assert!(r.abs() >= v.abs());
            }
        }
    }
}
