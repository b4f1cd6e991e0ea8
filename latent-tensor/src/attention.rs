// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Self-attention weight generation.
//!
//! Each query row draws one uniform score per key, gets a fixed bonus on the
//! diagonal (tokens attend to themselves most), and is divided by its own sum.
//! This is a softmax surrogate: same row-stochastic shape, no exponentials.
//! The diagonal bonus makes every row sum at least 1 before normalization, so
//! the division is always well defined.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::token::TokenNode;

/// Added to `weights[r][r]` before normalization.
pub const DIAGONAL_BIAS: f32 = 1.0;

/// Row-major `n × n` matrix; row = query token, column = key token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionData {
    pub tokens: Vec<TokenNode>,
    pub weights: Vec<f32>,
}

impl AttentionData {
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    pub fn cell_count(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, query: usize, key: usize) -> f32 {
        self.weights[query * self.size() + key]
    }

    pub fn row(&self, query: usize) -> &[f32] {
        let n = self.size();
        &self.weights[query * n..(query + 1) * n]
    }

    pub fn row_sums(&self) -> Vec<f32> {
        (0..self.size()).map(|r| self.row(r).iter().sum()).collect()
    }
}

pub fn generate_attention_data<R: Rng + ?Sized>(tokens: &[TokenNode], rng: &mut R) -> AttentionData {
    let n = tokens.len();
    let mut weights = Vec::with_capacity(n * n);

    for r in 0..n {
        let mut row: Vec<f32> = (0..n).map(|_| rng.gen::<f32>()).collect();
        row[r] += DIAGONAL_BIAS;

        for w in row.iter_mut() {
            *w = w.max(0.0);
        }
        let sum: f32 = row.iter().sum();
        weights.extend(row.into_iter().map(|w| w / sum));
    }

    tracing::debug!(tokens = n, cells = weights.len(), "generated attention matrix");

    AttentionData {
        tokens: tokens.to_vec(),
        weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::token::tokenize;
    use proptest::prelude::*;

    #[test]
    fn test_five_token_matrix() {
        let tokens = tokenize("one two three four five");
        let data = generate_attention_data(&tokens, &mut seeded(5));
        assert_eq!(data.weights.len(), 25);
        for (r, sum) in data.row_sums().iter().enumerate() {
            assert!((sum - 1.0).abs() < 1e-5, "row {r} sums to {sum}");
        }
    }

    #[test]
    fn test_weights_are_probabilities() {
        let tokens = tokenize("a b c d e f g h");
        let data = generate_attention_data(&tokens, &mut seeded(9));
        assert!(data.weights.iter().all(|w| (0.0..=1.0).contains(w)));
    }

    #[test]
    fn test_diagonal_dominates_on_average() {
        let tokens = tokenize("a b c d e f");
        let data = generate_attention_data(&tokens, &mut seeded(21));
        let n = data.size();
        let diag: f32 = (0..n).map(|i| data.weight(i, i)).sum::<f32>() / n as f32;
        let off: f32 = (0..n)
            .flat_map(|r| (0..n).filter(move |c| *c != r).map(move |c| (r, c)))
            .map(|(r, c)| data.weight(r, c))
            .sum::<f32>()
            / (n * (n - 1)) as f32;
        assert!(diag > off * 1.5, "diag {diag} vs off-diagonal {off}");
    }

    #[test]
    fn test_single_token_attends_to_itself() {
        let data = generate_attention_data(&tokenize("solo"), &mut seeded(0));
        assert_eq!(data.weights, vec![1.0]);
    }

    #[test]
    fn test_empty_tokens() {
        let data = generate_attention_data(&[], &mut seeded(0));
        assert!(data.is_empty());
        assert!(data.row_sums().is_empty());
    }

    proptest! {
        #[test]
        fn prop_rows_are_stochastic(n in 1usize..32, seed in any::<u64>()) {
            let sentence = vec!["w"; n].join(" ");
            let data = generate_attention_data(&tokenize(&sentence), &mut seeded(seed));
            prop_assert_eq!(data.weights.len(), n * n);
            for sum in data.row_sums() {
                prop_assert!((sum - 1.0).abs() < 1e-5);
            }
        }
    }
}
