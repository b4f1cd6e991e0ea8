// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Embedding matrix: tokens down the rows, dimensions across the columns.
//!
//! Each cell is a box of the grid's cell size, pushed out along z by `max(0.1, |v|·2)` and colored on a
//! diverging ramp: dark at zero, toward the negative anchor below zero and the
//! positive anchor above.

use latent_math::InstanceTransform;
use latent_tensor::EmbeddingData;

use crate::color::diverging_color;
use crate::config::{EmbeddingColors, LabelColors};
use crate::instance::InstanceBuffer;
use crate::label::LabelPlacement;
use crate::mapper::GridLayout;

pub const EMBEDDING_GRID: GridLayout = GridLayout::new(0.8, 0.2);

/// Depth floor so near-zero cells stay visible.
pub const MIN_DEPTH: f32 = 0.1;

const LABEL_MARGIN: f32 = 2.0;
const LABEL_PX: f32 = 18.0;

/// Write one instance per cell into `buf`. Returns true if anything changed.
pub fn map_embedding_into(data: &EmbeddingData, colors: &EmbeddingColors, buf: &mut InstanceBuffer) -> bool {
    let rows = data.token_count();
    let cols = data.embedding_dim;
    let mut changed = buf.resize(data.cell_count());

    for t in 0..rows {
        for d in 0..cols {
            let idx = t * cols + d;
            let v = data.values[idx];

            let position = [EMBEDDING_GRID.column_x(d, cols), EMBEDDING_GRID.row_y(t, rows), 0.0];
            let depth = (v.abs() * 2.0).max(MIN_DEPTH);
            let side = EMBEDDING_GRID.cell_size;
            let transform = InstanceTransform::new(position, [side, side, depth]);
            let color = diverging_color(v, colors.negative, colors.zero, colors.positive);

            changed |= buf.set(idx, transform, color);
        }
    }
    changed
}

pub fn map_embedding(data: &EmbeddingData, colors: &EmbeddingColors) -> InstanceBuffer {
    let mut buf = InstanceBuffer::with_capacity(data.cell_count());
    map_embedding_into(data, colors, &mut buf);
    buf
}

/// Token names to the left of each row.
pub fn embedding_labels(data: &EmbeddingData, colors: &LabelColors) -> Vec<LabelPlacement> {
    let rows = data.token_count();
    let x = -EMBEDDING_GRID.half_extent(data.embedding_dim) - LABEL_MARGIN;
    data.tokens
        .iter()
        .enumerate()
        .map(|(t, token)| {
            LabelPlacement::new(
                token.text.clone(),
                [x, EMBEDDING_GRID.row_y(t, rows), 0.0],
                colors.token,
                LABEL_PX,
            )
        })
        .collect()
}
