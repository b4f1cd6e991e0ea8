// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Composition configuration.
//!
//! A composition is registered by the host with an identifier, frame count,
//! frame rate and resolution, plus typed default properties. This module owns
//! those properties: presets, JSON loading and schema validation. Everything
//! downstream takes an already-validated config.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use latent_math::SpringConfig;
use latent_tensor::{DatasetKey, DEFAULT_EMBEDDING_DIM};

use crate::color::{hex_to_rgb, Rgb};
use crate::timeline::StageTimeline;

/// Which scene a composition renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionKind {
    /// Embedding → attention → logits camera sweep.
    TransformerFlow,
    /// Word cloud around a wireframe core.
    LatentSpace,
}

/// Hex colors as they appear in composition props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub background: String,
    pub embedding_negative: String,
    pub embedding_zero: String,
    pub embedding_positive: String,
    pub attention_low: String,
    pub attention_high: String,
    pub logit_low: String,
    pub logit_mid: String,
    pub logit_high: String,
    pub logit_target: String,
    pub token_label: String,
    pub query_label: String,
    pub key_label: String,
    pub logit_label: String,
    pub target_label: String,
    pub word_rejected: String,
    pub word_selected: String,
    pub word_neutral: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let s = |v: &str| v.to_string();
        Self {
            background: s("#050505"),
            embedding_negative: s("#2563eb"),
            embedding_zero: s("#171717"),
            embedding_positive: s("#dc2626"),
            attention_low: s("#0a0a0a"),
            attention_high: s("#fbbf24"),
            logit_low: s("#1e1b4b"),
            logit_mid: s("#6366f1"),
            logit_high: s("#22d3ee"),
            logit_target: s("#06b6d4"),
            token_label: s("#ffffff"),
            query_label: s("#fbbf24"),
            key_label: s("#38bdf8"),
            logit_label: s("#94a3b8"),
            target_label: s("#ffffff"),
            word_rejected: s("#ff4444"),
            word_selected: s("#44aaff"),
            word_neutral: s("#888888"),
        }
    }
}

/// Parsed palette, grouped by the mapper that consumes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb,
    pub embedding: EmbeddingColors,
    pub attention: AttentionColors,
    pub logit: LogitColors,
    pub labels: LabelColors,
    pub words: WordColors,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingColors {
    pub negative: Rgb,
    pub zero: Rgb,
    pub positive: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttentionColors {
    pub low: Rgb,
    pub high: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogitColors {
    pub low: Rgb,
    pub mid: Rgb,
    pub high: Rgb,
    pub target: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelColors {
    pub token: Rgb,
    pub query: Rgb,
    pub key: Rgb,
    pub logit: Rgb,
    pub target: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordColors {
    pub rejected: Rgb,
    pub selected: Rgb,
    pub neutral: Rgb,
}

impl PaletteConfig {
    pub fn resolve(&self) -> Result<Palette> {
        let c = |name: &str, hex: &str| hex_to_rgb(hex).with_context(|| format!("palette.{name}"));
        Ok(Palette {
            background: c("background", &self.background)?,
            embedding: EmbeddingColors {
                negative: c("embedding_negative", &self.embedding_negative)?,
                zero: c("embedding_zero", &self.embedding_zero)?,
                positive: c("embedding_positive", &self.embedding_positive)?,
            },
            attention: AttentionColors {
                low: c("attention_low", &self.attention_low)?,
                high: c("attention_high", &self.attention_high)?,
            },
            logit: LogitColors {
                low: c("logit_low", &self.logit_low)?,
                mid: c("logit_mid", &self.logit_mid)?,
                high: c("logit_high", &self.logit_high)?,
                target: c("logit_target", &self.logit_target)?,
            },
            labels: LabelColors {
                token: c("token_label", &self.token_label)?,
                query: c("query_label", &self.query_label)?,
                key: c("key_label", &self.key_label)?,
                logit: c("logit_label", &self.logit_label)?,
                target: c("target_label", &self.target_label)?,
            },
            words: WordColors {
                rejected: c("word_rejected", &self.word_rejected)?,
                selected: c("word_selected", &self.word_selected)?,
                neutral: c("word_neutral", &self.word_neutral)?,
            },
        })
    }
}

impl Default for Palette {
    fn default() -> Self {
        PaletteConfig::default()
            .resolve()
            .unwrap_or_else(|e| unreachable!("built-in palette is valid: {e}"))
    }
}

/// Where each stage's group sits in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageAnchors {
    pub embedding: [f64; 3],
    pub attention: [f64; 3],
    pub logits: [f64; 3],
}

impl Default for StageAnchors {
    fn default() -> Self {
        Self {
            embedding: [-30.0, 0.0, 0.0],
            attention: [0.0, 0.0, 10.0],
            logits: [35.0, -5.0, 0.0],
        }
    }
}

/// Full configuration for one registered composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    pub id: String,
    pub kind: CompositionKind,
    pub title: String,
    pub duration_in_frames: u32,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    /// Context sentence; tokens are its whitespace-separated words.
    pub sentence: String,
    pub embedding_dim: usize,
    /// Fixed seed for reproducible datasets; `None` varies per run.
    pub seed: Option<u64>,
    /// Word nodes in the latent-space cloud.
    pub word_count: usize,
    pub palette: PaletteConfig,
    pub timeline: StageTimeline,
    pub anchors: StageAnchors,
    /// Target-word pop-up spring.
    pub spring: SpringConfig,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self::transformer_flow()
    }
}

impl CompositionConfig {
    /// Three-stage walk through a transformer forward pass, 10 s at 30 fps.
    pub fn transformer_flow() -> Self {
        Self {
            id: "TransformerFlow".to_string(),
            kind: CompositionKind::TransformerFlow,
            title: "Inside a Transformer".to_string(),
            duration_in_frames: 300,
            fps: 30.0,
            width: 1920,
            height: 1080,
            sentence: "we gathered today to say".to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            seed: Some(42),
            word_count: 30,
            palette: PaletteConfig::default(),
            timeline: StageTimeline::default(),
            anchors: StageAnchors::default(),
            spring: SpringConfig::default(),
        }
    }

    /// Latent-space word cloud, 10 s at 30 fps.
    pub fn latent_space() -> Self {
        Self {
            id: "LatentSpace".to_string(),
            kind: CompositionKind::LatentSpace,
            title: "Latent Space".to_string(),
            ..Self::transformer_flow()
        }
    }

    pub fn presets() -> Vec<Self> {
        vec![Self::transformer_flow(), Self::latent_space()]
    }

    /// Look up a preset by id, ignoring case and `-`/`_` separators.
    pub fn preset(id: &str) -> Option<Self> {
        let norm = |s: &str| s.replace(['-', '_'], "").to_ascii_lowercase();
        let wanted = norm(id);
        Self::presets().into_iter().find(|c| norm(&c.id) == wanted)
    }

    /// Parse and validate. Missing fields take the `TransformerFlow` defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid composition JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("composition id must not be empty");
        }
        if self.duration_in_frames == 0 {
            bail!("duration_in_frames must be positive");
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            bail!("fps must be positive, got {}", self.fps);
        }
        if self.width == 0 || self.height == 0 {
            bail!("resolution must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.embedding_dim == 0 {
            bail!("embedding_dim must be positive");
        }
        if !self.spring.is_physical() {
            bail!(
                "spring needs positive mass and stiffness and non-negative damping, got {:?}",
                self.spring
            );
        }
        self.palette.resolve()?;
        if self.kind == CompositionKind::TransformerFlow {
            self.timeline
                .validate(self.duration())
                .context("timeline")?;
        }
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        self.duration_in_frames as f64
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration() / self.fps
    }

    pub fn last_frame(&self) -> u32 {
        self.duration_in_frames.saturating_sub(1)
    }

    pub fn dataset_key(&self) -> DatasetKey {
        DatasetKey::new(self.sentence.clone(), self.embedding_dim, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for c in CompositionConfig::presets() {
            c.validate().unwrap();
            assert_eq!(c.duration_in_frames, 300);
            assert_eq!(c.fps, 30.0);
            assert_eq!((c.width, c.height), (1920, 1080));
        }
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(
            CompositionConfig::preset("latent-space").unwrap().kind,
            CompositionKind::LatentSpace
        );
        assert_eq!(
            CompositionConfig::preset("TransformerFlow").unwrap().kind,
            CompositionKind::TransformerFlow
        );
        assert!(CompositionConfig::preset("HelloWorld").is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = CompositionConfig::transformer_flow();
        let json = serde_json::to_string(&config).unwrap();
        let restored = CompositionConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c = CompositionConfig::from_json(r#"{"sentence": "a b c", "seed": 7}"#).unwrap();
        assert_eq!(c.sentence, "a b c");
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.embedding_dim, 64);
        assert_eq!(c.palette.embedding_negative, "#2563eb");
    }

    #[test]
    fn test_rejects_bad_hex() {
        let err = CompositionConfig::from_json(r#"{"palette": {"logit_target": "cyan"}}"#).unwrap_err();
        assert!(format!("{err:#}").contains("logit_target"));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let mut c = CompositionConfig::transformer_flow();
        c.fps = 0.0;
        assert!(c.validate().is_err());

        let mut c = CompositionConfig::transformer_flow();
        c.embedding_dim = 0;
        assert!(c.validate().is_err());

        let mut c = CompositionConfig::transformer_flow();
        c.duration_in_frames = 200;
        assert!(c.validate().is_err());

        let mut c = CompositionConfig::transformer_flow();
        c.spring.mass = -1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_short_latent_space_skips_timeline_check() {
        let mut c = CompositionConfig::latent_space();
        c.duration_in_frames = 60;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_dataset_key() {
        let c = CompositionConfig::transformer_flow();
        let key = c.dataset_key();
        assert_eq!(key.text, c.sentence);
        assert_eq!(key.embedding_dim, 64);
        assert_eq!(key.seed, Some(42));
    }

    #[test]
    fn test_default_palette_resolves() {
        let p = Palette::default();
        assert_eq!(p.logit.target, hex_to_rgb("#06b6d4").unwrap());
    }
}
