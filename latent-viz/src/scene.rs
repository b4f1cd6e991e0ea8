// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Three.js scene builder for the HTML preview.
//!
//! `SceneBuilder` accumulates scene objects (instanced box groups, labels,
//! lights, platforms, wireframe spheres) and serializes them to JavaScript
//! that constructs a Three.js scene. All geometry is emitted procedurally
//! from instance buffers; no external model files.

use std::fmt::Write;

use crate::camera::CameraPose;
use crate::color::{rgb_to_hex, rgb_to_threejs_hex, Rgb};
use crate::composer::GroupState;
use crate::instance::InstanceBuffer;
use crate::label::LabelPlacement;
use crate::template::script_safe;

/// One instanced draw of unit boxes (or spheres) inside a transformed group.
#[derive(Debug, Clone)]
pub struct InstancedGroup {
    pub name: String,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    /// Column-major 4x4 matrices, 16 floats per instance.
    pub matrices: Vec<f32>,
    /// Flat RGB, 3 floats per instance.
    pub colors: Vec<f32>,
    pub shape: InstanceShape,
    /// Per-instance opacity. When set, each instance becomes its own mesh so
    /// it can fade independently.
    pub opacities: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceShape {
    Box,
    Sphere,
}

/// A flat square under a group, in the group's local frame.
#[derive(Debug, Clone)]
pub struct ScenePlane {
    pub group: String,
    pub size: f64,
    pub y: f64,
    pub color: Rgb,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
pub struct WireSphere {
    pub position: [f64; 3],
    pub radius: f64,
    pub color: Rgb,
    pub emissive: Rgb,
}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: [f64; 3],
    pub color: u32,
    pub intensity: f64,
}

/// Accumulates objects and emits scene-construction JavaScript.
///
/// ```ignore
/// let mut scene = SceneBuilder::new();
/// scene.set_camera(&pose, 50.0);
/// scene.add_point_light([10.0, 10.0, 10.0], 0xffffff, 1.0);
/// scene.add_instances(&group, &buffer, InstanceShape::Box);
/// let js = scene.build_js();
/// ```
pub struct SceneBuilder {
    camera: CameraPose,
    fov: f64,
    ambient_intensity: f64,
    point_lights: Vec<PointLight>,
    groups: Vec<InstancedGroup>,
    planes: Vec<ScenePlane>,
    spheres: Vec<WireSphere>,
    labels: Vec<LabelPlacement>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            camera: CameraPose {
                position: [0.0, 0.0, 40.0],
                look_at: [0.0, 0.0, 0.0],
            },
            fov: 50.0,
            ambient_intensity: 0.5,
            point_lights: Vec::new(),
            groups: Vec::new(),
            planes: Vec::new(),
            spheres: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn set_camera(&mut self, pose: &CameraPose, fov: f64) {
        self.camera = *pose;
        self.fov = fov;
    }

    pub fn set_ambient_light(&mut self, intensity: f64) {
        self.ambient_intensity = intensity;
    }

    pub fn add_point_light(&mut self, position: [f64; 3], color: u32, intensity: f64) {
        self.point_lights.push(PointLight { position, color, intensity });
    }

    /// Instanced draw of `buffer` inside `group`. Empty buffers add nothing.
    pub fn add_instances(&mut self, group: &GroupState, buffer: &InstanceBuffer, shape: InstanceShape) {
        if buffer.is_empty() {
            return;
        }
        self.groups.push(InstancedGroup {
            name: group.name.to_string(),
            position: group.position,
            rotation: group.rotation,
            matrices: buffer.matrices(),
            colors: buffer.colors().to_vec(),
            shape,
            opacities: None,
        });
    }

    /// Like [`add_instances`](Self::add_instances), with one opacity per
    /// instance. Missing entries are opaque.
    pub fn add_faded_instances(
        &mut self,
        group: &GroupState,
        buffer: &InstanceBuffer,
        shape: InstanceShape,
        opacities: &[f64],
    ) {
        if buffer.is_empty() {
            return;
        }
        let opacities = (0..buffer.len())
            .map(|i| opacities.get(i).copied().unwrap_or(1.0).clamp(0.0, 1.0))
            .collect();
        self.groups.push(InstancedGroup {
            name: group.name.to_string(),
            position: group.position,
            rotation: group.rotation,
            matrices: buffer.matrices(),
            colors: buffer.colors().to_vec(),
            shape,
            opacities: Some(opacities),
        });
    }

    pub fn add_plane(&mut self, group: &str, size: f64, y: f64, color: Rgb, opacity: f64) {
        self.planes.push(ScenePlane {
            group: group.to_string(),
            size,
            y,
            color,
            opacity,
        });
    }

    pub fn add_wire_sphere(&mut self, position: [f64; 3], radius: f64, color: Rgb, emissive: Rgb) {
        self.spheres.push(WireSphere {
            position,
            radius,
            color,
            emissive,
        });
    }

    pub fn add_labels(&mut self, labels: impl IntoIterator<Item = LabelPlacement>) {
        self.labels.extend(labels);
    }

    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(|g| g.colors.len() / 3).sum()
    }

    /// Emit the complete Three.js scene construction as a JavaScript string.
    pub fn build_js(&self) -> String {
        let mut js = String::with_capacity(65536);

        let p = self.camera.position;
        let l = self.camera.look_at;
        let _ = write!(
            js,
            r#"
camera.fov = {fov};
camera.updateProjectionMatrix();
camera.position.set({}, {}, {});
camera.lookAt({}, {}, {});
"#,
            p[0],
            p[1],
            p[2],
            l[0],
            l[1],
            l[2],
            fov = self.fov,
        );

        let _ = writeln!(js, "scene.add(new THREE.AmbientLight(0xffffff, {}));", self.ambient_intensity);
        for light in &self.point_lights {
            let _ = write!(
                js,
                r#"{{
    const l = new THREE.PointLight(0x{color:06x}, {intensity});
    l.position.set({x}, {y}, {z});
    scene.add(l);
}}
"#,
                color = light.color,
                intensity = light.intensity,
                x = light.position[0],
                y = light.position[1],
                z = light.position[2],
            );
        }

        js.push_str("const groups = {};\n");
        for group in &self.groups {
            self.build_group_js(&mut js, group);
        }
        for plane in &self.planes {
            self.build_plane_js(&mut js, plane);
        }
        for sphere in &self.spheres {
            self.build_sphere_js(&mut js, sphere);
        }
        for (i, label) in self.labels.iter().enumerate() {
            self.build_label_js(&mut js, label, i);
        }

        js
    }

    fn build_group_js(&self, js: &mut String, g: &InstancedGroup) {
        let n = g.colors.len() / 3;
        let geometry = match g.shape {
            InstanceShape::Box => "new THREE.BoxGeometry(1, 1, 1)",
            InstanceShape::Sphere => "new THREE.SphereGeometry(1, 16, 12)",
        };
        let _ = write!(
            js,
            r#"{{
    const group = new THREE.Group();
    group.name = '{name}';
    group.position.set({px}, {py}, {pz});
    group.rotation.set({rx}, {ry}, {rz});
"#,
            name = g.name,
            px = g.position[0],
            py = g.position[1],
            pz = g.position[2],
            rx = g.rotation[0],
            ry = g.rotation[1],
            rz = g.rotation[2],
        );

        match &g.opacities {
            None => {
                let _ = write!(
                    js,
                    r#"    const mat = new THREE.MeshStandardMaterial({{ metalness: 0.3, roughness: 0.4 }});
    const mesh = new THREE.InstancedMesh({geometry}, mat, {n});
    const m = new THREE.Matrix4();
    const matrices = new Float32Array([{matrices}]);
    for (let i = 0; i < {n}; i++) {{ m.fromArray(matrices, i * 16); mesh.setMatrixAt(i, m); }}
    mesh.instanceMatrix.needsUpdate = true;
    mesh.instanceColor = new THREE.InstancedBufferAttribute(new Float32Array([{colors}]), 3);
    group.add(mesh);
"#,
                    geometry = geometry,
                    n = n,
                    matrices = join_floats(&g.matrices),
                    colors = join_floats(&g.colors),
                );
            }
            Some(opacities) => {
                let opacities: Vec<f32> = opacities.iter().map(|o| *o as f32).collect();
                let _ = write!(
                    js,
                    r#"    const geometry = {geometry};
    const matrices = new Float32Array([{matrices}]);
    const colors = new Float32Array([{colors}]);
    const opacities = [{opacities}];
    const m = new THREE.Matrix4();
    group.userData.nodes = [];
    for (let i = 0; i < {n}; i++) {{
        const mat = new THREE.MeshBasicMaterial({{ transparent: true, opacity: opacities[i] }});
        mat.color.setRGB(colors[i * 3], colors[i * 3 + 1], colors[i * 3 + 2]);
        const node = new THREE.Mesh(geometry, mat);
        m.fromArray(matrices, i * 16);
        node.applyMatrix4(m);
        group.add(node);
        group.userData.nodes.push(node);
    }}
"#,
                    geometry = geometry,
                    n = n,
                    matrices = join_floats(&g.matrices),
                    colors = join_floats(&g.colors),
                    opacities = join_floats(&opacities),
                );
            }
        }

        let _ = write!(
            js,
            r#"    scene.add(group);
    groups['{name}'] = group;
}}
"#,
            name = g.name,
        );
    }

    fn build_plane_js(&self, js: &mut String, plane: &ScenePlane) {
        let _ = write!(
            js,
            r#"{{
    const plane = new THREE.Mesh(
        new THREE.PlaneGeometry({size}, {size}),
        new THREE.MeshStandardMaterial({{ color: {color}, transparent: true, opacity: {opacity} }})
    );
    plane.position.set(0, {y}, 0);
    plane.rotation.x = -Math.PI / 2;
    (groups['{group}'] || scene).add(plane);
}}
"#,
            size = plane.size,
            color = rgb_to_threejs_hex(plane.color),
            opacity = plane.opacity,
            y = plane.y,
            group = plane.group,
        );
    }

    fn build_sphere_js(&self, js: &mut String, s: &WireSphere) {
        let _ = write!(
            js,
            r#"{{
    const core = new THREE.Mesh(
        new THREE.SphereGeometry({r}, 32, 32),
        new THREE.MeshStandardMaterial({{ color: {color}, emissive: {emissive}, emissiveIntensity: 1.5, wireframe: true }})
    );
    core.position.set({x}, {y}, {z});
    core.name = 'core';
    scene.add(core);
}}
"#,
            r = s.radius,
            color = rgb_to_threejs_hex(s.color),
            emissive = rgb_to_threejs_hex(s.emissive),
            x = s.position[0],
            y = s.position[1],
            z = s.position[2],
        );
    }

    fn build_label_js(&self, js: &mut String, label: &LabelPlacement, idx: usize) {
        let weight = if label.emphasis { "bold " } else { "" };
        let _ = write!(
            js,
            r#"{{
    const canvas = document.createElement('canvas');
    canvas.width = 512; canvas.height = 128;
    const ctx = canvas.getContext('2d');
    ctx.globalAlpha = {opacity};
    ctx.fillStyle = '{color}';
    ctx.font = '{weight}{px}px sans-serif';
    ctx.textAlign = 'center';
    ctx.textBaseline = 'middle';
    ctx.translate(256, 64);
    ctx.rotate({rot} * Math.PI / 180);
    ctx.fillText({text}, 0, 0);
    const sprite = new THREE.Sprite(new THREE.SpriteMaterial({{ map: new THREE.CanvasTexture(canvas), transparent: true, depthWrite: false }}));
    sprite.position.set({x}, {y}, {z});
    sprite.scale.set({sw}, {sh}, 1);
    sprite.name = 'label_{idx}';
    scene.add(sprite);
}}
"#,
            opacity = label.opacity,
            color = rgb_to_hex(label.color),
            weight = weight,
            px = label.font_px * 2.0,
            rot = label.rotation_deg,
            text = js_string(&label.text),
            x = label.position[0],
            y = label.position[1],
            z = label.position[2],
            sw = label.font_px / 4.0,
            sh = label.font_px / 16.0,
            idx = idx,
        );
    }
}

fn join_floats(values: &[f32]) -> String {
    let mut out = String::with_capacity(values.len() * 8);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{v}");
    }
    out
}

/// Quoted JavaScript string literal for `text`.
fn js_string(text: &str) -> String {
    script_safe(&serde_json::Value::String(text.to_string()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use latent_math::InstanceTransform;

    fn group(name: &'static str) -> GroupState {
        GroupState {
            name,
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.5, 0.0],
        }
    }

    fn buffer(n: usize) -> InstanceBuffer {
        let mut buf = InstanceBuffer::with_capacity(n);
        buf.resize(n);
        for i in 0..n {
            buf.set(i, InstanceTransform::new([i as f32, 0.0, 0.0], [1.0, 1.0, 2.0]), (1.0, 0.0, 0.0));
        }
        buf
    }

    #[test]
    fn test_empty_scene() {
        let js = SceneBuilder::new().build_js();
        assert!(js.contains("camera.position.set(0, 0, 40)"));
        assert!(js.contains("AmbientLight"));
    }

    #[test]
    fn test_camera_pose() {
        let mut scene = SceneBuilder::new();
        let pose = CameraPose {
            position: [1.0, 2.0, 3.0],
            look_at: [4.0, 5.0, 6.0],
        };
        scene.set_camera(&pose, 60.0);
        let js = scene.build_js();
        assert!(js.contains("camera.position.set(1, 2, 3)"));
        assert!(js.contains("camera.lookAt(4, 5, 6)"));
        assert!(js.contains("camera.fov = 60"));
    }

    #[test]
    fn test_point_light() {
        let mut scene = SceneBuilder::new();
        scene.add_point_light([10.0, 10.0, 10.0], 0x5588ff, 0.5);
        let js = scene.build_js();
        assert!(js.contains("PointLight(0x5588ff, 0.5)"));
    }

    #[test]
    fn test_instanced_group() {
        let mut scene = SceneBuilder::new();
        scene.add_instances(&group("embedding"), &buffer(4), InstanceShape::Box);
        assert_eq!(scene.instance_count(), 4);
        let js = scene.build_js();
        assert!(js.contains("InstancedMesh(new THREE.BoxGeometry(1, 1, 1), mat, 4)"));
        assert!(js.contains("group.name = 'embedding'"));
        assert!(js.contains("group.rotation.set(0, 0.5, 0)"));
    }

    #[test]
    fn test_empty_buffer_skipped() {
        let mut scene = SceneBuilder::new();
        scene.add_instances(&group("attention"), &InstanceBuffer::new(), InstanceShape::Box);
        assert_eq!(scene.instance_count(), 0);
        assert!(!scene.build_js().contains("InstancedMesh"));
    }

    #[test]
    fn test_plane_and_core() {
        let mut scene = SceneBuilder::new();
        scene.add_plane("logits", 12.0, -0.2, (0.0, 0.0, 0.0), 0.5);
        scene.add_wire_sphere([0.0; 3], 1.0, (1.0, 1.0, 1.0), (0.0, 0.0, 1.0));
        let js = scene.build_js();
        assert!(js.contains("PlaneGeometry(12, 12)"));
        assert!(js.contains("(groups['logits'] || scene)"));
        assert!(js.contains("wireframe: true"));
    }

    #[test]
    fn test_label_escaping() {
        let mut scene = SceneBuilder::new();
        scene.add_labels([LabelPlacement::new("it's", [0.0, 1.0, 0.0], (1.0, 1.0, 1.0), 16.0).emphasized()]);
        let js = scene.build_js();
        assert!(js.contains(r#"ctx.fillText("it's", 0, 0)"#));
        assert!(js.contains("bold 32px"));
        assert!(js.contains("Sprite"));
    }

    #[test]
    fn test_label_text_cannot_break_out() {
        let mut scene = SceneBuilder::new();
        let text = "a\"b\\c\n</script><script>alert(1)</script>";
        scene.add_labels([LabelPlacement::new(text, [0.0; 3], (1.0, 1.0, 1.0), 12.0)]);
        let js = scene.build_js();
        assert!(js.contains(r#"ctx.fillText("a\"b\\c\n\u003c/script>\u003cscript>alert(1)\u003c/script>", 0, 0)"#));
        assert!(!js.contains("<script"));
    }

    #[test]
    fn test_faded_instances_get_own_meshes() {
        let mut scene = SceneBuilder::new();
        scene.add_faded_instances(&group("cloud"), &buffer(3), InstanceShape::Sphere, &[0.0, 0.5]);
        assert_eq!(scene.instance_count(), 3);
        let js = scene.build_js();
        assert!(js.contains("const opacities = [0,0.5,1];"));
        assert!(js.contains("MeshBasicMaterial({ transparent: true, opacity: opacities[i] })"));
        assert!(js.contains("group.userData.nodes.push(node)"));
        assert!(!js.contains("InstancedMesh"));
    }

    #[test]
    fn test_opaque_instances_stay_instanced() {
        let mut scene = SceneBuilder::new();
        scene.add_instances(&group("logits"), &buffer(2), InstanceShape::Box);
        let js = scene.build_js();
        assert!(!js.contains("transparent"));
        assert!(!js.contains("userData.nodes"));
    }
}
