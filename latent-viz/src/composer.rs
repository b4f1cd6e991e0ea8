// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Scene composition: owns a composition's geometry buffers and derives the
//! per-frame state handed to a renderer.
//!
//! Geometry is rebuilt only when the dataset changes identity (a different
//! `Arc`), never per frame. Everything a frame needs beyond that (camera pose,
//! caption opacities, group rotations, the target pop) is a pure function of
//! the frame number, so frames can be evaluated in any order.

use std::sync::Arc;

use anyhow::{bail, Result};
use nalgebra::Vector3;
use serde::Serialize;
use tracing::debug;

use latent_math::{euler_rotation, spring};
use latent_tensor::{generate_word_nodes, rng, DatasetCache, TransformerDataset, WordNode};

use crate::camera::{CameraPathController, CameraPose};
use crate::config::{CompositionConfig, CompositionKind, Palette};
use crate::instance::InstanceBuffer;
use crate::label::LabelPlacement;
use crate::mapper::{
    attention_labels, embedding_labels, logit_labels, map_attention_into, map_embedding_into, map_logits_into,
    map_word_cloud_into, word_labels, word_opacity,
};
use crate::timeline::{embedding_sway, latent_drift, logit_spin, CaptionTrack, Stage};

/// Fixed viewpoint of the word-cloud composition.
pub const LATENT_CAMERA: CameraPose = CameraPose {
    position: [0.0, 0.0, 40.0],
    look_at: [0.0, 0.0, 0.0],
};

/// World placement of one stage group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupState {
    pub name: &'static str,
    pub position: [f64; 3],
    /// XYZ Euler angles in radians.
    pub rotation: [f64; 3],
}

impl GroupState {
    /// Carry a point from group-local to world space.
    pub fn to_world(&self, local: [f32; 3]) -> [f32; 3] {
        let [rx, ry, rz] = self.rotation;
        let p = euler_rotation(rx, ry, rz) * Vector3::new(local[0] as f64, local[1] as f64, local[2] as f64);
        [
            (p.x + self.position[0]) as f32,
            (p.y + self.position[1]) as f32,
            (p.z + self.position[2]) as f32,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionState {
    pub stage: Stage,
    pub text: &'static str,
    pub opacity: f64,
}

/// Everything a renderer needs for one frame besides the instance buffers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameState {
    pub frame: f64,
    pub camera: CameraPose,
    pub captions: Vec<CaptionState>,
    pub groups: Vec<GroupState>,
    /// Spring progress of the target-word pop (0 until the trigger).
    pub logit_pop: f64,
    /// Overlay labels, already in world space.
    pub labels: Vec<LabelPlacement>,
}

impl FrameState {
    pub fn group(&self, name: &str) -> Option<&GroupState> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn caption(&self, stage: Stage) -> Option<&CaptionState> {
        self.captions.iter().find(|c| c.stage == stage)
    }
}

fn place(group: &GroupState, labels: Vec<LabelPlacement>) -> impl Iterator<Item = LabelPlacement> + '_ {
    labels.into_iter().map(move |mut l| {
        l.position = group.to_world(l.position);
        l
    })
}

/// The three-stage walk through embeddings, attention and logits.
pub struct TransformerScene {
    config: CompositionConfig,
    palette: Palette,
    camera: CameraPathController,
    captions: CaptionTrack,
    dataset: Option<Arc<TransformerDataset>>,
    embedding: InstanceBuffer,
    attention: InstanceBuffer,
    logits: InstanceBuffer,
    geometry_version: u64,
}

impl TransformerScene {
    pub fn new(config: &CompositionConfig) -> Result<Self> {
        if config.kind != CompositionKind::TransformerFlow {
            bail!("composition '{}' is not a transformer flow", config.id);
        }
        config.validate()?;

        Ok(Self {
            palette: config.palette.resolve()?,
            camera: CameraPathController::transformer_flow(&config.timeline, config.duration())?,
            captions: CaptionTrack::new(&config.timeline, config.duration())?,
            config: config.clone(),
            dataset: None,
            embedding: InstanceBuffer::new(),
            attention: InstanceBuffer::new(),
            logits: InstanceBuffer::new(),
            geometry_version: 0,
        })
    }

    /// Adopt `dataset`, remapping the buffers if it is not the one already held.
    /// Returns true when any buffer content changed and must be re-uploaded.
    pub fn prepare(&mut self, dataset: &Arc<TransformerDataset>) -> bool {
        if let Some(current) = &self.dataset {
            if Arc::ptr_eq(current, dataset) {
                return false;
            }
        }

        let mut changed = map_embedding_into(&dataset.embedding, &self.palette.embedding, &mut self.embedding);
        changed |= map_attention_into(&dataset.attention, &self.palette.attention, &mut self.attention);
        changed |= map_logits_into(&dataset.logits, &self.palette.logit, &mut self.logits);

        if changed {
            self.geometry_version += 1;
        }
        debug!(
            tokens = dataset.token_count(),
            changed,
            version = self.geometry_version,
            "Mapped transformer dataset"
        );
        self.dataset = Some(Arc::clone(dataset));
        changed
    }

    /// Fetch (or generate) this composition's dataset from `cache` and prepare it.
    pub fn prepare_from_cache(&mut self, cache: &mut DatasetCache) -> bool {
        let dataset = cache.get_or_generate(&self.config.dataset_key());
        self.prepare(&dataset)
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn camera(&self) -> &CameraPathController {
        &self.camera
    }

    pub fn dataset(&self) -> Option<&Arc<TransformerDataset>> {
        self.dataset.as_ref()
    }

    pub fn embedding_buffer(&self) -> &InstanceBuffer {
        &self.embedding
    }

    pub fn attention_buffer(&self) -> &InstanceBuffer {
        &self.attention
    }

    pub fn logit_buffer(&self) -> &InstanceBuffer {
        &self.logits
    }

    /// Bumped every time a `prepare` changes buffer contents.
    pub fn geometry_version(&self) -> u64 {
        self.geometry_version
    }

    pub fn logit_pop(&self, frame: f64) -> f64 {
        let offset = frame - self.config.timeline.pop_trigger();
        spring(offset, self.config.fps, &self.config.spring)
    }

    pub fn groups(&self, frame: f64) -> Vec<GroupState> {
        let anchors = &self.config.anchors;
        vec![
            GroupState {
                name: "embedding",
                position: anchors.embedding,
                rotation: embedding_sway(frame),
            },
            GroupState {
                name: "attention",
                position: anchors.attention,
                rotation: [0.0; 3],
            },
            GroupState {
                name: "logits",
                position: anchors.logits,
                rotation: logit_spin(frame),
            },
        ]
    }

    pub fn frame_state(&self, frame: f64) -> FrameState {
        let groups = self.groups(frame);
        let logit_pop = self.logit_pop(frame);

        let mut labels = Vec::new();
        if let Some(data) = &self.dataset {
            let colors = &self.palette.labels;
            labels.extend(place(&groups[0], embedding_labels(&data.embedding, colors)));
            labels.extend(place(&groups[1], attention_labels(&data.attention, colors)));
            labels.extend(place(&groups[2], logit_labels(&data.logits, colors, logit_pop as f32)));
        }

        let captions = Stage::ALL
            .iter()
            .map(|&stage| CaptionState {
                stage,
                text: stage.caption(),
                opacity: self.captions.opacity(stage, frame),
            })
            .collect();

        FrameState {
            frame,
            camera: self.camera.pose_at(frame),
            captions,
            groups,
            logit_pop,
            labels,
        }
    }
}

/// Per-frame state of the word cloud.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatentFrameState {
    pub frame: f64,
    pub camera: CameraPose,
    pub cloud: GroupState,
    pub node_opacity: Vec<f64>,
    pub labels: Vec<LabelPlacement>,
}

/// Word nodes on a spherical shell drifting around a wireframe core.
pub struct LatentSpaceScene {
    config: CompositionConfig,
    palette: Palette,
    nodes: Vec<WordNode>,
    buffer: InstanceBuffer,
}

impl LatentSpaceScene {
    pub fn new(config: &CompositionConfig) -> Result<Self> {
        if config.kind != CompositionKind::LatentSpace {
            bail!("composition '{}' is not a latent-space scene", config.id);
        }
        config.validate()?;

        let palette = config.palette.resolve()?;
        let nodes = generate_word_nodes(config.word_count, &mut rng::for_seed(config.seed));
        let mut buffer = InstanceBuffer::with_capacity(nodes.len());
        map_word_cloud_into(&nodes, &palette.words, &mut buffer);
        debug!(nodes = nodes.len(), "Mapped word cloud");

        Ok(Self {
            config: config.clone(),
            palette,
            nodes,
            buffer,
        })
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn nodes(&self) -> &[WordNode] {
        &self.nodes
    }

    pub fn buffer(&self) -> &InstanceBuffer {
        &self.buffer
    }

    pub fn frame_state(&self, frame: f64) -> LatentFrameState {
        let cloud = GroupState {
            name: "cloud",
            position: [0.0; 3],
            rotation: latent_drift(frame),
        };
        let labels = place(&cloud, word_labels(&self.nodes, &self.palette.labels, frame)).collect();
        LatentFrameState {
            frame,
            camera: LATENT_CAMERA,
            node_opacity: (0..self.nodes.len()).map(|i| word_opacity(i, frame)).collect(),
            cloud,
            labels,
        }
    }
}
