// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Geometry, camera and preview output for the transformer animation.
//!
//! Datasets from `latent-tensor` are mapped into caller-owned instance
//! buffers (`mapper`), composed with a frame-indexed camera path and
//! narrative timeline (`composer`), and emitted as self-contained Three.js
//! previews (`renderers`).

pub mod color;
pub mod instance;
pub mod label;
pub mod mapper;
pub mod camera;
pub mod timeline;
pub mod config;
pub mod composer;
pub mod scene;
pub mod template;
pub mod renderers;

pub use camera::{CameraPathController, CameraPose, CameraWaypoint};
pub use composer::{FrameState, LatentFrameState, LatentSpaceScene, TransformerScene};
pub use config::{CompositionConfig, CompositionKind, Palette};
pub use instance::InstanceBuffer;
pub use label::LabelPlacement;
pub use renderers::{render_latent_space, render_transformer_flow};
pub use timeline::{Stage, StageTimeline};
