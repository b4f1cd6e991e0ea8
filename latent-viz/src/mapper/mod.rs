//! Tensor → instance mappers.
//!
//! Each mapper turns one dataset into a dense instance buffer (one transform
//! and one color per tensor cell, in cell order) plus the overlay labels for
//! its axes. Mapping is a pure function of the dataset and palette: the same
//! input always yields the same geometry, which is what lets the composer skip
//! the work when the dataset has not changed.

pub mod embedding;
pub mod attention;
pub mod logit;
pub mod word_cloud;

pub use attention::{attention_labels, map_attention, map_attention_into, ATTENTION_GRID};
pub use embedding::{embedding_labels, map_embedding, map_embedding_into, EMBEDDING_GRID};
pub use logit::{logit_labels, map_logits, map_logits_into, LogitGrid, LOGIT_GRID};
pub use word_cloud::{map_word_cloud, map_word_cloud_into, relevance_color, word_labels, word_opacity};

/// Fixed-step grid centered on the group origin.
///
/// Cells sit at the middle of their slot, so a grid of `count` cells spans
/// `[-count·step/2, +count·step/2]` and its cell centers sum to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell_size: f32,
    pub gap: f32,
}

impl GridLayout {
    pub const fn new(cell_size: f32, gap: f32) -> Self {
        Self { cell_size, gap }
    }

    pub fn step(&self) -> f32 {
        self.cell_size + self.gap
    }

    /// Half the extent of `count` cells: `count · step / 2`.
    pub fn half_extent(&self, count: usize) -> f32 {
        count as f32 * self.step() / 2.0
    }

    /// Center of column `col` along +x.
    pub fn column_x(&self, col: usize, count: usize) -> f32 {
        -self.half_extent(count) + (col as f32 + 0.5) * self.step()
    }

    /// Center of row `row`; row 0 is at the top (+y).
    pub fn row_y(&self, row: usize, count: usize) -> f32 {
        self.half_extent(count) - (row as f32 + 0.5) * self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_is_symmetric() {
        let g = GridLayout::new(0.8, 0.2);
        for count in [1usize, 2, 5, 64] {
            let sum: f32 = (0..count).map(|c| g.column_x(c, count)).sum();
            assert!(sum.abs() < 1e-3, "count {count}: {sum}");
            assert!((g.column_x(0, count) + g.column_x(count - 1, count)).abs() < 1e-4);
            assert!((g.row_y(0, count) + g.row_y(count - 1, count)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_single_cell_at_origin() {
        let g = GridLayout::new(0.8, 0.1);
        assert!(g.column_x(0, 1).abs() < 1e-6);
        assert!(g.row_y(0, 1).abs() < 1e-6);
    }

    #[test]
    fn test_rows_descend() {
        let g = GridLayout::new(0.8, 0.2);
        assert!(g.row_y(0, 3) > g.row_y(1, 3));
        assert!((g.row_y(0, 3) - g.row_y(1, 3) - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn test_mirrored_cells_cancel(count in 1usize..128, col in 0usize..128, cell in 0.1f32..2.0, gap in 0.0f32..1.0) {
            let col = col % count;
            let g = GridLayout::new(cell, gap);
            let mirrored = g.column_x(count - 1 - col, count);
            prop_assert!((g.column_x(col, count) + mirrored).abs() < 1e-3);
            prop_assert!(g.column_x(col, count).abs() <= g.half_extent(count));
        }
    }
}
