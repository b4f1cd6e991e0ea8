//! HTML preview renderers, one per composition.
//!
//! Each renderer takes a prepared scene and produces a self-contained HTML
//! document with an embedded Three.js view of one frame, optionally with the
//! whole frame track attached for playback.

pub mod transformer_flow;
pub mod latent_space;

pub use latent_space::render_latent_space;
pub use transformer_flow::render_transformer_flow;

use std::fmt::Write;

use crate::config::CompositionConfig;
use crate::scene::SceneBuilder;
use crate::template::escape_html;

/// Lighting shared by both compositions.
pub(crate) fn add_standard_lights(scene: &mut SceneBuilder) {
    scene.set_ambient_light(0.5);
    scene.add_point_light([10.0, 10.0, 10.0], 0xffffff, 1.0);
    scene.add_point_light([-10.0, -10.0, -10.0], 0x5588ff, 0.5);
}

/// One key/value row of a HUD panel. The value is escaped.
pub(crate) fn stat_row(html: &mut String, key: &str, val: impl std::fmt::Display) {
    let _ = write!(
        html,
        r#"<div class="stat-row"><span class="key">{key}</span><span class="val">{}</span></div>"#,
        escape_html(&val.to_string())
    );
}

/// Panel heading from user-supplied text.
pub(crate) fn panel_heading(html: &mut String, title: &str) {
    let _ = write!(html, "<h3>{}</h3>", escape_html(title));
}

/// Elapsed and total playback time.
pub(crate) fn clock(frame: f64, config: &CompositionConfig) -> String {
    format!("{:.1}s / {:.1}s", frame / config.fps, config.duration_secs())
}

/// Frames `0, step, 2*step, ...` up to the last frame of the composition.
pub(crate) fn sample_frames(duration_in_frames: u32, step: u32) -> impl Iterator<Item = f64> {
    (0..duration_in_frames).step_by(step.max(1) as usize).map(f64::from)
}
