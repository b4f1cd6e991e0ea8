// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! End-to-end dataset scenarios through the public API.

use latent_tensor::{
    generate_attention_data, generate_embedding_data, generate_logit_data, rng, DatasetCache,
    DatasetKey, DEFAULT_EMBEDDING_DIM,
};

#[test]
fn five_word_sentence_shapes() {
    let mut rng = rng::seeded(2024);
    let emb = generate_embedding_data("we mourn together in sorrow", DEFAULT_EMBEDDING_DIM, &mut rng);
    assert_eq!(emb.tokens.len(), 5);
    assert_eq!(emb.values.len(), 320);

    let att = generate_attention_data(&emb.tokens, &mut rng);
    assert_eq!(att.weights.len(), 25);
    for r in 0..5 {
        let sum: f32 = att.row(r).iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "row {r} sums to {sum}");
    }
    assert_eq!(att.tokens, emb.tokens);
}

#[test]
fn logit_target_is_unique_for_any_seed() {
    for seed in [0u64, 1, 17, 99, u64::MAX] {
        let data = generate_logit_data(&mut rng::seeded(seed));
        let targets: Vec<_> = data.predictions.iter().filter(|p| p.is_target).collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].probability, 0.95);
    }
}

#[test]
fn dataset_serializes_for_export() {
    let ds = DatasetCache::new().get_or_generate(&DatasetKey::new("a b", 4, Some(3)));
    let json = serde_json::to_value(&*ds).unwrap();
    assert_eq!(json["embedding"]["values"].as_array().unwrap().len(), 8);
    assert_eq!(json["attention"]["weights"].as_array().unwrap().len(), 4);
    assert_eq!(json["key"]["seed"], 3);
}
