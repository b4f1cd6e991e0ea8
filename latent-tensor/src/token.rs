//! Whitespace tokenization into ordered [`TokenNode`]s.

use serde::{Deserialize, Serialize};

/// One whitespace-delimited unit of the input sentence.
///
/// Order is significant: a token's position is its row (and column) index in
/// every matrix derived from the sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenNode {
    pub id: String,
    pub text: String,
    /// Came from the user's context sentence (as opposed to a generated token).
    pub is_input: bool,
}

/// Split on any run of whitespace; empty fragments never become tokens.
pub fn tokenize(input: &str) -> Vec<TokenNode> {
    input
        .split_whitespace()
        .enumerate()
        .map(|(i, t)| TokenNode {
            id: format!("token-{i}"),
            text: t.to_string(),
            is_input: true,
        })
        .collect()
}
