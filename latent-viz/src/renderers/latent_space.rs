//! Latent Space Renderer
//!
//! Word nodes as small instanced spheres around a wireframe core, with word
//! spheres and labels faded in node by node.

use anyhow::Result;
use serde_json::json;

use crate::color::{hex_to_rgb, rgb_to_hex};
use crate::composer::LatentSpaceScene;
use crate::scene::{InstanceShape, SceneBuilder};
use crate::template::{HtmlDocument, PanelPosition};

use super::{add_standard_lights, clock, panel_heading, sample_frames, stat_row};

const FOV: f64 = 75.0;
const CORE_RADIUS: f64 = 1.0;

pub fn render_latent_space(scene: &LatentSpaceScene, frame: f64, track_step: Option<u32>) -> Result<String> {
    let config = scene.config();
    let palette = scene.palette();
    let state = scene.frame_state(frame);

    let mut builder = SceneBuilder::new();
    builder.set_camera(&state.camera, FOV);
    add_standard_lights(&mut builder);
    builder.add_faded_instances(&state.cloud, scene.buffer(), InstanceShape::Sphere, &state.node_opacity);
    builder.add_wire_sphere([0.0; 3], CORE_RADIUS, (1.0, 1.0, 1.0), hex_to_rgb("#5588ff")?);
    builder.add_labels(state.labels.iter().cloned());

    let visible = state.node_opacity.iter().filter(|o| **o > 0.0).count();
    let mut stats_html = String::new();
    panel_heading(&mut stats_html, &config.title);
    stat_row(&mut stats_html, "Frame", format!("{} / {}", frame, config.last_frame()));
    stat_row(&mut stats_html, "Time", clock(frame, config));
    stat_row(&mut stats_html, "Nodes", scene.nodes().len());
    stat_row(&mut stats_html, "Visible", visible);
    stat_row(&mut stats_html, "Camera distance", format!("{:.1}", state.camera.distance()));

    let words = &palette.words;
    let mut legend_html = String::new();
    panel_heading(&mut legend_html, "Relevance");
    stat_row(&mut legend_html, "Selected", rgb_to_hex(words.selected));
    stat_row(&mut legend_html, "Neutral", rgb_to_hex(words.neutral));
    stat_row(&mut legend_html, "Rejected", rgb_to_hex(words.rejected));

    let mut doc = HtmlDocument::new(
        &format!("{} (frame {})", config.title, frame),
        &rgb_to_hex(palette.background),
        &rgb_to_hex(palette.words.selected),
        config.width,
        config.height,
    );
    doc.add_panel("stats-panel", PanelPosition::TopLeft, &stats_html);
    doc.add_panel("legend-panel", PanelPosition::BottomLeft, &legend_html);
    doc.set_scene_js(&builder.build_js());

    if let Some(step) = track_step {
        let track: Vec<_> = sample_frames(config.duration_in_frames, step)
            .map(|f| {
                let s = scene.frame_state(f);
                json!({ "frame": s.frame, "camera": s.camera, "cloud": s.cloud, "node_opacity": s.node_opacity })
            })
            .collect();
        doc.set_frame_track(serde_json::to_string(&track)?, config.fps / f64::from(step.max(1)));
    }

    Ok(doc.render())
}
