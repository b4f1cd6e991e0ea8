//! Latent-space word cloud: words scattered on a spherical shell, each with a
//! relevance score toward the sentence context.

use std::f32::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const SHELL_RADIUS: (f32, f32) = (10.0, 30.0);

const WORDS: [&str; 30] = [
    "sorrow", "memory", "time", "together", "eternity", "comfort", "peace", "heart", "tears", "rest",
    "congratulations", "party", "joy", "delight", "luck", "tomorrow", "hurry", "forgotten", "end", "beginning",
    "sudden", "fate", "pain", "longing", "star", "wind", "light", "darkness", "sound", "silence",
];

/// Words that clash with a mourning context.
const REJECTED: [&str; 7] = ["congratulations", "party", "joy", "delight", "luck", "hurry", "forgotten"];
/// Words that fit it.
const SELECTED: [&str; 5] = ["sorrow", "memory", "comfort", "longing", "eternity"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordNode {
    pub id: String,
    pub word: String,
    pub position: [f32; 3],
    /// -1 (discarded) ..= 1 (selected).
    pub relevance: f32,
}

/// Scatter `count` words uniformly over the shell `10 <= r < 30`.
///
/// The polar angle is drawn as `acos(2u - 1)` so points are uniform in solid
/// angle rather than bunched at the poles.
pub fn generate_word_nodes<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<WordNode> {
    (0..count)
        .map(|i| {
            let radius = rng.gen_range(SHELL_RADIUS.0..SHELL_RADIUS.1);
            let theta = rng.gen::<f32>() * 2.0 * PI;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();

            let position = [
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ];

            let word = WORDS[rng.gen_range(0..WORDS.len())];
            let relevance = if REJECTED.contains(&word) {
                -0.5 - rng.gen::<f32>() * 0.5
            } else if SELECTED.contains(&word) {
                0.5 + rng.gen::<f32>() * 0.5
            } else {
                rng.gen::<f32>() * 0.4 - 0.2
            };

            WordNode {
                id: format!("node-{i}"),
                word: word.to_string(),
                position,
                relevance,
            }
        })
        .collect()
}
