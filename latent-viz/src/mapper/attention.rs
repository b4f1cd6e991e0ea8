// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Attention heatmap: query tokens down the rows, key tokens across the columns.
//!
//! Cells protrude by `max(0.05, w·4)` and glow from the dark anchor to the
//! bright anchor in proportion to the weight.

use latent_math::InstanceTransform;
use latent_tensor::AttentionData;

use crate::color::lerp_rgb;
use crate::config::{AttentionColors, LabelColors};
use crate::instance::InstanceBuffer;
use crate::label::LabelPlacement;
use crate::mapper::GridLayout;

pub const ATTENTION_GRID: GridLayout = GridLayout::new(0.8, 0.1);

pub const MIN_DEPTH: f32 = 0.05;

const LABEL_MARGIN: f32 = 1.0;
const LABEL_PX: f32 = 14.0;
const LABEL_OPACITY: f32 = 0.8;
const KEY_LABEL_TILT_DEG: f32 = -45.0;

pub fn map_attention_into(data: &AttentionData, colors: &AttentionColors, buf: &mut InstanceBuffer) -> bool {
    let n = data.size();
    let mut changed = buf.resize(data.cell_count());

    for r in 0..n {
        for c in 0..n {
            let idx = r * n + c;
            let w = data.weights[idx];

            let position = [ATTENTION_GRID.column_x(c, n), ATTENTION_GRID.row_y(r, n), 0.0];
            let side = ATTENTION_GRID.cell_size;
            let transform = InstanceTransform::new(position, [side, side, (w * 4.0).max(MIN_DEPTH)]);
            changed |= buf.set(idx, transform, lerp_rgb(colors.low, colors.high, w));
        }
    }
    changed
}

pub fn map_attention(data: &AttentionData, colors: &AttentionColors) -> InstanceBuffer {
    let mut buf = InstanceBuffer::with_capacity(data.cell_count());
    map_attention_into(data, colors, &mut buf);
    buf
}

/// Query labels left of each row, key labels tilted above each column.
pub fn attention_labels(data: &AttentionData, colors: &LabelColors) -> Vec<LabelPlacement> {
    let n = data.size();
    let half = ATTENTION_GRID.half_extent(n);

    let rows = data.tokens.iter().enumerate().map(|(r, token)| {
        LabelPlacement::new(
            token.text.clone(),
            [-half - LABEL_MARGIN, ATTENTION_GRID.row_y(r, n), 0.0],
            colors.query,
            LABEL_PX,
        )
        .with_opacity(LABEL_OPACITY)
    });

    let cols = data.tokens.iter().enumerate().map(|(c, token)| {
        LabelPlacement::new(
            token.text.clone(),
            [ATTENTION_GRID.column_x(c, n), half + LABEL_MARGIN, 0.0],
            colors.key,
            LABEL_PX,
        )
        .with_opacity(LABEL_OPACITY)
        .with_rotation(KEY_LABEL_TILT_DEG)
    });

    rows.chain(cols).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Palette;
    use latent_tensor::{generate_attention_data, rng, tokenize};

    #[test]
    fn test_cell_count_and_centering() {
        let data = generate_attention_data(&tokenize("a b c d e"), &mut rng::seeded(1));
        let buf = map_attention(&data, &Palette::default().attention);
        assert_eq!(buf.len(), 25);
        let sum: f32 = buf.transforms().iter().map(|t| t.position[0]).sum();
        assert!(sum.abs() < 1e-4);
    }

    #[test]
    fn test_weight_drives_depth_and_color() {
        let colors = Palette::default().attention;
        let data = AttentionData {
            tokens: tokenize("p q"),
            weights: vec![1.0, 0.0, 0.25, 0.75],
        };
        let buf = map_attention(&data, &colors);
        assert_eq!(buf.transform(0).scale[2], 4.0);
        assert_eq!(buf.transform(1).scale[2], MIN_DEPTH);
        assert_eq!(buf.transform(2).scale[2], 1.0);
        assert_eq!(buf.color(0), colors.high);
        assert_eq!(buf.color(1), colors.low);
    }

    #[test]
    fn test_diagonal_runs_top_left_to_bottom_right() {
        let data = generate_attention_data(&tokenize("a b c"), &mut rng::seeded(3));
        let buf = map_attention(&data, &Palette::default().attention);
        let first = buf.transform(0).position;
        let last = buf.transform(8).position;
        assert!(first[0] < last[0]);
        assert!(first[1] > last[1]);
    }

    #[test]
    fn test_labels_on_both_axes() {
        let data = generate_attention_data(&tokenize("x y z"), &mut rng::seeded(4));
        let labels = attention_labels(&data, &Palette::default().labels);
        assert_eq!(labels.len(), 6);
        assert!(labels[..3].iter().all(|l| l.rotation_deg == 0.0));
        assert!(labels[3..].iter().all(|l| l.rotation_deg == -45.0));
        // Column headers sit above the top row
        let top = ATTENTION_GRID.row_y(0, 3);
        assert!(labels[3..].iter().all(|l| l.position[1] > top));
    }

    #[test]
    fn test_empty() {
        let data = generate_attention_data(&[], &mut rng::seeded(0));
        assert!(map_attention(&data, &Palette::default().attention).is_empty());
        assert!(attention_labels(&data, &Palette::default().labels).is_empty());
    }
}
