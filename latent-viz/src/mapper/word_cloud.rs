//! Latent-space word cloud: one small sphere per word node, colored by
//! relevance, fading in one after another.

use latent_math::{interpolate, InstanceTransform};
use latent_tensor::WordNode;

use crate::color::Rgb;
use crate::config::{LabelColors, WordColors};
use crate::instance::InstanceBuffer;
use crate::label::LabelPlacement;

pub const NODE_SCALE: f32 = 0.2;
/// Relevance beyond ±this counts as rejected / selected.
pub const RELEVANCE_BAND: f32 = 0.2;
pub const FADE_FRAMES: f64 = 20.0;
/// Delay between successive nodes starting their fade.
pub const FADE_STAGGER: f64 = 2.0;

const LABEL_LIFT: f32 = 0.5;
const LABEL_PX: f32 = 12.0;

pub fn relevance_color(relevance: f32, colors: &WordColors) -> Rgb {
    if relevance < -RELEVANCE_BAND {
        colors.rejected
    } else if relevance > RELEVANCE_BAND {
        colors.selected
    } else {
        colors.neutral
    }
}

/// Opacity of node `index` at `frame`.
pub fn word_opacity(index: usize, frame: f64) -> f64 {
    interpolate(frame - FADE_STAGGER * index as f64, &[0.0, FADE_FRAMES], &[0.0, 1.0])
}

pub fn map_word_cloud_into(nodes: &[WordNode], colors: &WordColors, buf: &mut InstanceBuffer) -> bool {
    let mut changed = buf.resize(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let transform = InstanceTransform::new(node.position, [NODE_SCALE; 3]);
        changed |= buf.set(i, transform, relevance_color(node.relevance, colors));
    }
    changed
}

pub fn map_word_cloud(nodes: &[WordNode], colors: &WordColors) -> InstanceBuffer {
    let mut buf = InstanceBuffer::with_capacity(nodes.len());
    map_word_cloud_into(nodes, colors, &mut buf);
    buf
}

/// Word labels just above each node, faded with it.
pub fn word_labels(nodes: &[WordNode], labels: &LabelColors, frame: f64) -> Vec<LabelPlacement> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let [x, y, z] = node.position;
            LabelPlacement::new(node.word.clone(), [x, y + LABEL_LIFT, z], labels.token, LABEL_PX)
                .with_opacity(word_opacity(i, frame) as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Palette;
    use latent_tensor::{generate_word_nodes, rng};

    fn node(relevance: f32) -> WordNode {
        WordNode {
            id: "node-0".into(),
            word: "w".into(),
            position: [1.0, 2.0, 3.0],
            relevance,
        }
    }

    #[test]
    fn test_relevance_bands() {
        let c = Palette::default().words;
        assert_eq!(relevance_color(-0.8, &c), c.rejected);
        assert_eq!(relevance_color(-0.2, &c), c.neutral);
        assert_eq!(relevance_color(0.0, &c), c.neutral);
        assert_eq!(relevance_color(0.2, &c), c.neutral);
        assert_eq!(relevance_color(0.9, &c), c.selected);
    }

    #[test]
    fn test_staggered_fade() {
        assert_eq!(word_opacity(0, 0.0), 0.0);
        assert!((word_opacity(0, 10.0) - 0.5).abs() < 1e-12);
        assert_eq!(word_opacity(0, 20.0), 1.0);
        assert_eq!(word_opacity(5, 10.0), 0.0);
        assert_eq!(word_opacity(5, 30.0), 1.0);
        assert_eq!(word_opacity(3, -100.0), 0.0);
    }

    #[test]
    fn test_nodes_become_small_spheres() {
        let nodes = generate_word_nodes(30, &mut rng::seeded(7));
        let buf = map_word_cloud(&nodes, &Palette::default().words);
        assert_eq!(buf.len(), 30);
        for (t, n) in buf.transforms().iter().zip(&nodes) {
            assert_eq!(t.position, n.position);
            assert_eq!(t.scale, [NODE_SCALE; 3]);
        }
    }

    #[test]
    fn test_labels_sit_above_nodes() {
        let labels = word_labels(&[node(0.0)], &Palette::default().labels, 20.0);
        assert_eq!(labels[0].position, [1.0, 2.5, 3.0]);
        assert_eq!(labels[0].opacity, 1.0);
    }

    #[test]
    fn test_remap_reports_change() {
        let colors = Palette::default().words;
        let mut buf = InstanceBuffer::new();
        assert!(map_word_cloud_into(&[node(0.9)], &colors, &mut buf));
        assert!(!map_word_cloud_into(&[node(0.9)], &colors, &mut buf));
        assert!(map_word_cloud_into(&[node(-0.9)], &colors, &mut buf));
    }
}
