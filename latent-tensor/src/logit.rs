// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Output-vocabulary logit generation.
//!
//! The first slots of the vocabulary hold curated candidate words with
//! hand-tuned probability bands; the rest is low uniform noise. One target
//! word is then forced to a dominant probability. The result is a single
//! tall peak over a quiet floor, and deliberately *not* normalized: a true
//! softmax would shrink the peak the terrain is built to show off.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Probability forced onto the target word.
pub const TARGET_PROBABILITY: f32 = 0.95;
/// Probability given to words that do not fit the context.
pub const MISFIT_PROBABILITY: f32 = 0.01;
/// Band for words that fit the context.
pub const FITTING_BAND: (f32, f32) = (0.3, 0.7);
/// Upper bound of the noise floor for unnamed slots.
pub const NOISE_CEILING: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabLogit {
    pub id: String,
    /// Empty for anonymous noise slots.
    pub word: String,
    pub probability: f32,
    pub is_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogitData {
    pub vocab_size: usize,
    pub predictions: Vec<VocabLogit>,
}

impl LogitData {
    pub fn cell_count(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn target_index(&self) -> Option<usize> {
        self.predictions.iter().position(|p| p.is_target)
    }

    pub fn target(&self) -> Option<&VocabLogit> {
        self.target_index().map(|i| &self.predictions[i])
    }

    /// Sum of all probabilities. Not expected to be 1.
    pub fn total_mass(&self) -> f32 {
        self.predictions.iter().map(|p| p.probability).sum()
    }
}

/// Which words occupy the leading vocabulary slots and how they score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogitProfile {
    pub vocab_size: usize,
    /// Context-appropriate words, in slot order.
    pub fitting: Vec<String>,
    /// Context-inappropriate words, placed after the fitting ones.
    pub misfit: Vec<String>,
    /// Word forced to [`TARGET_PROBABILITY`].
    pub target: String,
}

impl Default for LogitProfile {
    fn default() -> Self {
        let words = |ws: &[&str]| ws.iter().map(|w| w.to_string()).collect();
        Self {
            vocab_size: 100,
            fitting: words(&["comfort", "sorrow", "memory", "farewell", "longing", "peace"]),
            misfit: words(&["party", "celebration", "joy", "luck"]),
            target: "farewell".to_string(),
        }
    }
}

impl LogitProfile {
    /// Candidate words in slot order, truncated to the vocabulary.
    pub fn candidates(&self) -> impl Iterator<Item = (&str, bool)> {
        self.fitting
            .iter()
            .map(|w| (w.as_str(), true))
            .chain(self.misfit.iter().map(|w| (w.as_str(), false)))
            .take(self.vocab_size)
    }
}

/// [`generate_logit_data_with`] using the default profile (100 slots).
pub fn generate_logit_data<R: Rng + ?Sized>(rng: &mut R) -> LogitData {
    generate_logit_data_with(&LogitProfile::default(), rng)
}

/// Exactly one prediction is flagged as target whenever `vocab_size > 0`.
/// A target word missing from the candidates takes over slot 0.
pub fn generate_logit_data_with<R: Rng + ?Sized>(profile: &LogitProfile, rng: &mut R) -> LogitData {
    let mut predictions: Vec<VocabLogit> = (0..profile.vocab_size)
        .map(|i| VocabLogit {
            id: format!("vocab-{i}"),
            word: String::new(),
            probability: rng.gen_range(0.0..=NOISE_CEILING),
            is_target: false,
        })
        .collect();

    for (slot, (word, fitting)) in profile.candidates().enumerate() {
        let p = &mut predictions[slot];
        p.word = word.to_string();
        p.probability = if fitting {
            rng.gen_range(FITTING_BAND.0..=FITTING_BAND.1)
        } else {
            MISFIT_PROBABILITY
        };
    }

    if !predictions.is_empty() {
        let slot = predictions
            .iter()
            .position(|p| p.word == profile.target)
            .unwrap_or(0);
        let p = &mut predictions[slot];
        p.word = profile.target.clone();
        p.probability = TARGET_PROBABILITY;
        p.is_target = true;
    }

    tracing::debug!(
        vocab_size = profile.vocab_size,
        target = %profile.target,
        "generated logit distribution"
    );

    LogitData {
        vocab_size: profile.vocab_size,
        predictions,
    }
}
