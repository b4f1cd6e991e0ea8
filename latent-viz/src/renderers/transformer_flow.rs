// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Transformer Flow Renderer
//!
//! The three stage groups (embedding matrix, attention heatmap, logit
//! terrain) as instanced boxes, world-space labels for the requested frame,
//! the camera pose of that frame and the stage captions.

use anyhow::{bail, Result};
use serde_json::json;

use crate::color::{rgb_to_hex, Rgb};
use crate::composer::TransformerScene;
use crate::mapper::LogitGrid;
use crate::scene::{InstanceShape, SceneBuilder};
use crate::template::{HtmlDocument, PanelPosition};

use super::{add_standard_lights, clock, panel_heading, sample_frames, stat_row};

const FOV: f64 = 50.0;
const PLATFORM_COLOR: Rgb = (0.059, 0.090, 0.165);
const PLATFORM_Y: f64 = -0.2;
const PLATFORM_OPACITY: f64 = 0.5;

/// Render `frame` of a prepared transformer scene.
///
/// With `track_step` set, per-frame camera/group/caption state sampled every
/// `track_step` frames is embedded and played back.
pub fn render_transformer_flow(scene: &TransformerScene, frame: f64, track_step: Option<u32>) -> Result<String> {
    let Some(dataset) = scene.dataset() else {
        bail!("scene '{}' has no dataset; call prepare first", scene.config().id);
    };
    let config = scene.config();
    let palette = scene.palette();
    let state = scene.frame_state(frame);

    let mut builder = SceneBuilder::new();
    builder.set_camera(&state.camera, FOV);
    add_standard_lights(&mut builder);

    let buffers = [scene.embedding_buffer(), scene.attention_buffer(), scene.logit_buffer()];
    for (group, buffer) in state.groups.iter().zip(buffers) {
        builder.add_instances(group, buffer, InstanceShape::Box);
    }
    let grid = LogitGrid::for_vocab(dataset.logits.vocab_size.max(dataset.logits.predictions.len()));
    builder.add_plane("logits", grid.platform_size() as f64, PLATFORM_Y, PLATFORM_COLOR, PLATFORM_OPACITY);
    builder.add_labels(state.labels.iter().cloned());

    let mut stats_html = String::new();
    panel_heading(&mut stats_html, &config.title);
    stat_row(&mut stats_html, "Frame", format!("{} / {}", frame, config.last_frame()));
    stat_row(&mut stats_html, "Time", clock(frame, config));
    stat_row(&mut stats_html, "Sentence", &config.sentence);
    stat_row(&mut stats_html, "Tokens", dataset.token_count());
    stat_row(&mut stats_html, "Embedding dim", dataset.embedding.embedding_dim);
    stat_row(&mut stats_html, "Vocabulary", dataset.logits.vocab_size);
    if let Some(target) = dataset.logits.target() {
        stat_row(&mut stats_html, "Target", format!("{} ({:.2})", target.word, target.probability));
    }
    stat_row(&mut stats_html, "Instances", builder.instance_count());

    let mut stage_html = String::new();
    panel_heading(&mut stage_html, "Stage");
    stat_row(&mut stage_html, "Caption", config.timeline.stage_at(frame).slug());
    stat_row(&mut stage_html, "Camera distance", format!("{:.1}", state.camera.distance()));
    stat_row(&mut stage_html, "Pop", format!("{:.3}", state.logit_pop));

    let accent = rgb_to_hex(palette.logit.target);
    let mut doc = HtmlDocument::new(
        &format!("{} (frame {})", config.title, frame),
        &rgb_to_hex(palette.background),
        &accent,
        config.width,
        config.height,
    );
    doc.add_panel("stats-panel", PanelPosition::TopLeft, &stats_html);
    doc.add_panel("stage-panel", PanelPosition::TopRight, &stage_html);
    for caption in &state.captions {
        doc.add_caption(&format!("caption-{}", caption.stage.slug()), caption.text, caption.opacity);
    }
    doc.set_scene_js(&builder.build_js());

    if let Some(step) = track_step {
        let track: Vec<_> = sample_frames(config.duration_in_frames, step)
            .map(|f| {
                let s = scene.frame_state(f);
                json!({ "frame": s.frame, "camera": s.camera, "groups": s.groups, "captions": s.captions })
            })
            .collect();
        doc.set_frame_track(serde_json::to_string(&track)?, config.fps / f64::from(step.max(1)));
    }

    Ok(doc.render())
}
