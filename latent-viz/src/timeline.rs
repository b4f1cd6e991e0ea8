// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Narrative timing: stage breakpoints, caption cross-fades and idle motion.
//!
//! The animation tells three stages in order (embedding → attention → logits).
//! Breakpoints are absolute frames; the final breakpoint is always the end of
//! the composition. Every value here is a pure function of the frame.

use anyhow::{bail, Result};
use latent_math::Keyframes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Embedding,
    Attention,
    Logits,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Embedding, Stage::Attention, Stage::Logits];

    /// Same spelling as the serialized form.
    pub fn slug(&self) -> &'static str {
        match self {
            Stage::Embedding => "embedding",
            Stage::Attention => "attention",
            Stage::Logits => "logits",
        }
    }

    pub fn caption(&self) -> &'static str {
        match self {
            Stage::Embedding => "1 · Token Embeddings",
            Stage::Attention => "2 · Self-Attention",
            Stage::Logits => "3 · Next-Token Logits",
        }
    }
}

/// Breakpoint frames of the camera sweep plus caption/pop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTimeline {
    /// Opening wide shot.
    pub overview: f64,
    /// Camera settles on the embedding matrix.
    pub embedding: f64,
    /// Camera settles on the attention heatmap.
    pub attention: f64,
    /// Camera settles on the logit terrain.
    pub logits: f64,
    /// Width of a caption cross-fade, in frames.
    pub caption_fade: f64,
    /// Frames after `attention` at which the target word pops up.
    pub pop_delay: f64,
}

impl Default for StageTimeline {
    fn default() -> Self {
        Self {
            overview: 0.0,
            embedding: 80.0,
            attention: 160.0,
            logits: 240.0,
            caption_fade: 20.0,
            pop_delay: 60.0,
        }
    }
}

impl StageTimeline {
    /// The five camera breakpoints: four waypoints and the closing frame.
    pub fn breakpoints(&self, duration: f64) -> [f64; 5] {
        [self.overview, self.embedding, self.attention, self.logits, duration]
    }

    pub fn pop_trigger(&self) -> f64 {
        self.attention + self.pop_delay
    }

    /// Stage whose caption owns `frame` (cross-fades switch at the midpoints).
    pub fn stage_at(&self, frame: f64) -> Stage {
        let (b1, b2) = self.caption_boundaries();
        if frame < b1 {
            Stage::Embedding
        } else if frame < b2 {
            Stage::Attention
        } else {
            Stage::Logits
        }
    }

    fn caption_boundaries(&self) -> (f64, f64) {
        (
            (self.embedding + self.attention) / 2.0,
            (self.attention + self.logits) / 2.0,
        )
    }

    pub fn validate(&self, duration: f64) -> Result<()> {
        let bps = self.breakpoints(duration);
        if bps.iter().any(|b| !b.is_finite()) {
            bail!("stage breakpoints must be finite: {bps:?}");
        }
        if let Some(w) = bps.windows(2).find(|w| w[1] <= w[0]) {
            bail!(
                "stage breakpoints must be strictly ascending and end before the duration ({} then {})",
                w[0],
                w[1]
            );
        }
        if !(self.caption_fade > 0.0) {
            bail!("caption_fade must be positive, got {}", self.caption_fade);
        }
        if !(self.pop_delay >= 0.0) {
            bail!("pop_delay must be non-negative, got {}", self.pop_delay);
        }
        CaptionTrack::new(self, duration).map(|_| ())
    }
}

/// Opacity curves for the three stage captions.
///
/// Adjacent captions fade across each other over `caption_fade` frames
/// centered on the stage midpoint, so their opacities always sum to 1 there.
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    curves: [Keyframes; 3],
}

impl CaptionTrack {
    pub fn new(timeline: &StageTimeline, duration: f64) -> Result<Self> {
        let h = timeline.caption_fade / 2.0;
        let start = timeline.overview;
        let (b1, b2) = timeline.caption_boundaries();

        let first = Keyframes::new(
            &[start, start + 2.0 * h, b1 - h, b1 + h],
            &[0.0, 1.0, 1.0, 0.0],
        );
        let middle = Keyframes::new(&[b1 - h, b1 + h, b2 - h, b2 + h], &[0.0, 1.0, 1.0, 0.0]);
        let last = Keyframes::new(&[b2 - h, b2 + h], &[0.0, 1.0]);

        match (first, middle, last) {
            (Ok(a), Ok(b), Ok(c)) if b2 + h <= duration => Ok(Self { curves: [a, b, c] }),
            _ => bail!(
                "caption fade of {} frames does not fit between stage boundaries {b1} and {b2} within {duration} frames",
                timeline.caption_fade
            ),
        }
    }

    pub fn opacity(&self, stage: Stage, frame: f64) -> f64 {
        let idx = match stage {
            Stage::Embedding => 0,
            Stage::Attention => 1,
            Stage::Logits => 2,
        };
        self.curves[idx].sample(frame)
    }
}

/// Slow sway of the embedding matrix: (x, y, z) Euler angles.
pub fn embedding_sway(frame: f64) -> [f64; 3] {
    [(frame * 0.003).sin() * 0.05, (frame * 0.005).sin() * 0.1, 0.0]
}

/// Steady turn of the logit terrain about its vertical axis.
pub fn logit_spin(frame: f64) -> [f64; 3] {
    [0.0, frame * -0.002, 0.0]
}

/// Drift of the whole latent-space word cloud.
pub fn latent_drift(frame: f64) -> [f64; 3] {
    [frame * 0.0005, frame * 0.001, 0.0]
}
