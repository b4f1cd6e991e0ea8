//! HTML document template for the previews.
//!
//! Generates self-contained HTML documents with embedded Three.js, HUD panels
//! and stage captions. The document renders a fixed frame; when a frame track
//! (JSON array of per-frame camera/group/caption state) is attached it plays
//! the track back at the composition's frame rate instead.
//!
//! Titles and captions are plain text and escaped here. Panel content is
//! markup; renderers escape the values they put into it.

use std::fmt::Write;

/// Position anchor for HUD panels.
#[derive(Debug, Clone, Copy)]
pub enum PanelPosition {
    TopLeft,
    TopRight,
    BottomLeft,
}

impl PanelPosition {
    fn css(&self) -> &'static str {
        match self {
            Self::TopLeft => "top: 24px; left: 24px;",
            Self::TopRight => "top: 24px; right: 24px;",
            Self::BottomLeft => "bottom: 24px; left: 24px;",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HudPanel {
    pub id: String,
    pub position: PanelPosition,
    pub content_html: String,
}

/// Stage caption overlay with its opacity for the rendered frame.
#[derive(Debug, Clone)]
pub struct Caption {
    pub id: String,
    pub text: String,
    pub opacity: f64,
}

/// Builder for self-contained HTML preview documents.
pub struct HtmlDocument {
    title: String,
    background: String,
    accent: String,
    width: u32,
    height: u32,
    panels: Vec<HudPanel>,
    captions: Vec<Caption>,
    scene_js: String,
    track_json: Option<String>,
    fps: f64,
}

impl HtmlDocument {
    /// `background` and `accent` are CSS colors; `width`/`height` set the aspect.
    pub fn new(title: &str, background: &str, accent: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_string(),
            background: background.to_string(),
            accent: accent.to_string(),
            width,
            height,
            panels: Vec::new(),
            captions: Vec::new(),
            scene_js: String::new(),
            track_json: None,
            fps: 30.0,
        }
    }

    pub fn add_panel(&mut self, id: &str, position: PanelPosition, content: &str) {
        self.panels.push(HudPanel {
            id: id.to_string(),
            position,
            content_html: content.to_string(),
        });
    }

    pub fn add_caption(&mut self, id: &str, text: &str, opacity: f64) {
        self.captions.push(Caption {
            id: id.to_string(),
            text: text.to_string(),
            opacity,
        });
    }

    pub fn set_scene_js(&mut self, js: &str) {
        self.scene_js = js.to_string();
    }

    /// Attach a JSON frame track for playback at `fps`.
    pub fn set_frame_track(&mut self, json: String, fps: f64) {
        self.track_json = Some(json);
        self.fps = fps;
    }

    /// Render the complete self-contained HTML document.
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(self.scene_js.len() + 16384);

        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<script src="https://cdnjs.cloudflare.com/ajax/libs/three.js/r128/three.min.js"></script>
<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{
    background: {bg};
    color: #e5e5e5;
    font-family: 'Inter', 'Helvetica Neue', Arial, sans-serif;
    overflow: hidden;
}}
#stage {{
    position: relative;
    width: 100vw;
    height: calc(100vw * {h} / {w});
    max-height: 100vh;
    margin: 0 auto;
}}
.hud-panel {{
    position: absolute;
    background: rgba(10, 10, 10, 0.75);
    border: 1px solid {accent}44;
    border-radius: 8px;
    padding: 12px 16px;
    font-size: 13px;
    line-height: 1.5;
    z-index: 10;
}}
.hud-panel h3 {{
    color: {accent};
    font-size: 11px;
    text-transform: uppercase;
    letter-spacing: 1.5px;
    margin-bottom: 6px;
}}
.stat-row {{ display: flex; justify-content: space-between; gap: 16px; }}
.stat-row .key {{ color: #a3a3a3; }}
.stat-row .val {{ color: {accent}; font-variant-numeric: tabular-nums; }}
.caption {{
    position: absolute;
    top: 48px;
    left: 50%;
    transform: translateX(-50%);
    font-size: 40px;
    font-weight: 700;
    letter-spacing: 0.5px;
    z-index: 10;
    white-space: nowrap;
}}
</style>
</head>
<body>
<div id="stage">
"#,
            title = escape_html(&self.title),
            bg = self.background,
            accent = self.accent,
            w = self.width,
            h = self.height,
        );

        for caption in &self.captions {
            let _ = writeln!(
                html,
                r#"<div id="{id}" class="caption" style="opacity: {opacity};">{text}</div>"#,
                id = caption.id,
                opacity = caption.opacity,
                text = escape_html(&caption.text),
            );
        }

        for panel in &self.panels {
            let _ = write!(
                html,
                r#"<div id="{id}" class="hud-panel" style="{pos}">
{content}
</div>
"#,
                id = panel.id,
                pos = panel.position.css(),
                content = panel.content_html,
            );
        }

        let _ = write!(
            html,
            r#"</div>
<script>
const container = document.getElementById('stage');
const scene = new THREE.Scene();
scene.background = new THREE.Color('{bg}');

const camera = new THREE.PerspectiveCamera(50, {w} / {h}, 0.1, 1000);
const renderer = new THREE.WebGLRenderer({{ antialias: true }});
renderer.setSize(container.clientWidth, container.clientHeight);
renderer.setPixelRatio(window.devicePixelRatio);
container.appendChild(renderer.domElement);

// === Scene Content ===
{scene_js}
"#,
            bg = self.background,
            w = self.width,
            h = self.height,
            scene_js = self.scene_js,
        );

        match &self.track_json {
            Some(track) => {
                let _ = write!(
                    html,
                    r#"
// === Frame Track Playback ===
const track = {track};
let start = performance.now();
function applyFrame(s) {{
    camera.position.set(...s.camera.position);
    camera.lookAt(...s.camera.look_at);
    for (const g of (s.groups || [])) {{
        if (groups[g.name]) groups[g.name].rotation.set(...g.rotation);
    }}
    if (s.cloud && groups[s.cloud.name]) groups[s.cloud.name].rotation.set(...s.cloud.rotation);
    if (s.cloud && s.node_opacity && groups[s.cloud.name]) {{
        const nodes = groups[s.cloud.name].userData.nodes || [];
        s.node_opacity.forEach((o, i) => {{ if (nodes[i]) nodes[i].material.opacity = o; }});
    }}
    for (const c of (s.captions || [])) {{
        const el = document.getElementById('caption-' + c.stage);
        if (el) el.style.opacity = c.opacity;
    }}
}}
function animate() {{
    requestAnimationFrame(animate);
    const i = Math.floor((performance.now() - start) / 1000 * {fps});
    if (i >= track.length) start = performance.now();
    if (track.length) applyFrame(track[Math.min(i, track.length - 1)]);
    renderer.render(scene, camera);
}}
animate();
"#,
                    track = script_safe(track),
                    fps = self.fps,
                );
            }
            None => html.push_str("\nrenderer.render(scene, camera);\n"),
        }

        html.push_str(
            r#"
window.addEventListener('resize', () => {
    renderer.setSize(container.clientWidth, container.clientHeight);
    renderer.render(scene, camera);
});
</script>
</body>
</html>"#,
        );

        html
    }
}

/// Escape text for HTML element content and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON text that can sit inside a `<script>` element without closing it.
/// `<` only occurs inside JSON strings, where `\u003c` reads back the same.
pub(crate) fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
}
