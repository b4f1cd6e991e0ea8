// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Logit terrain: the vocabulary laid out as a square field of bars on the
//! ground plane (x/z), bar height proportional to probability.
//!
//! Bars use a two-stage ramp (low→mid under 0.2, mid→high above) and the
//! target word is always painted in the highlight color. Boxes are centered
//! at half their height so every base rests on y = 0.

use latent_math::InstanceTransform;
use latent_tensor::LogitData;

use crate::color::two_stage_color;
use crate::config::{LabelColors, LogitColors};
use crate::instance::InstanceBuffer;
use crate::label::LabelPlacement;
use crate::mapper::GridLayout;

pub const LOGIT_GRID: GridLayout = GridLayout::new(0.8, 0.2);

pub const HEIGHT_SCALE: f32 = 15.0;
pub const MIN_HEIGHT: f32 = 0.2;
/// Probability where the ramp switches from low→mid to mid→high.
pub const RAMP_KNEE: f32 = 0.2;
/// Named cells below this probability stay unlabeled.
pub const LABEL_THRESHOLD: f32 = 0.1;

const LABEL_LIFT: f32 = 0.5;
const POP_LIFT: f32 = 5.0;
const LABEL_PX: f32 = 12.0;
const TARGET_PX: f32 = 16.0;
const TARGET_PX_GROWTH: f32 = 10.0;

/// Square layout for a vocabulary of `vocab_size` entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogitGrid {
    pub side: usize,
}

impl LogitGrid {
    pub fn for_vocab(vocab_size: usize) -> Self {
        Self {
            side: (vocab_size as f64).sqrt().ceil() as usize,
        }
    }

    /// Ground-plane (x, z) of cell `i`, row-major.
    pub fn cell_xz(&self, i: usize) -> (f32, f32) {
        let (r, c) = (i / self.side, i % self.side);
        (LOGIT_GRID.column_x(c, self.side), LOGIT_GRID.column_x(r, self.side))
    }

    /// Side length of the platform under the bars.
    pub fn platform_size(&self) -> f32 {
        self.side as f32 * LOGIT_GRID.step() + 2.0
    }
}

pub fn bar_height(probability: f32) -> f32 {
    (probability * HEIGHT_SCALE).max(MIN_HEIGHT)
}

fn grid_for(data: &LogitData) -> LogitGrid {
    LogitGrid::for_vocab(data.vocab_size.max(data.predictions.len()))
}

pub fn map_logits_into(data: &LogitData, colors: &LogitColors, buf: &mut InstanceBuffer) -> bool {
    let grid = grid_for(data);
    let mut changed = buf.resize(data.cell_count());

    for (i, pred) in data.predictions.iter().enumerate() {
        let (x, z) = grid.cell_xz(i);
        let height = bar_height(pred.probability);
        let side = LOGIT_GRID.cell_size;
        let transform = InstanceTransform::new([x, height / 2.0, z], [side, height, side]);

        let color = if pred.is_target {
            colors.target
        } else {
            two_stage_color(pred.probability, RAMP_KNEE, colors.low, colors.mid, colors.high)
        };
        changed |= buf.set(i, transform, color);
    }
    changed
}

pub fn map_logits(data: &LogitData, colors: &LogitColors) -> InstanceBuffer {
    let mut buf = InstanceBuffer::with_capacity(data.cell_count());
    map_logits_into(data, colors, &mut buf);
    buf
}

/// Labels above every named cell at or above [`LABEL_THRESHOLD`]; noise
/// slots and unlikely words stay bare. `pop` is the target's spring progress
/// (0 before the trigger, ~1 once settled); it lifts and enlarges the target label.
pub fn logit_labels(data: &LogitData, colors: &LabelColors, pop: f32) -> Vec<LabelPlacement> {
    let grid = grid_for(data);
    data.predictions
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.word.is_empty() && p.probability >= LABEL_THRESHOLD)
        .map(|(i, pred)| {
            let (x, z) = grid.cell_xz(i);
            let base = bar_height(pred.probability);
            let text = pred.word.clone();

            if pred.is_target {
                LabelPlacement::new(
                    text,
                    [x, base + pop * POP_LIFT + LABEL_LIFT, z],
                    colors.target,
                    TARGET_PX + pop * TARGET_PX_GROWTH,
                )
                .emphasized()
            } else {
                LabelPlacement::new(text, [x, base + LABEL_LIFT, z], colors.logit, LABEL_PX)
            }
        })
        .collect()
}
