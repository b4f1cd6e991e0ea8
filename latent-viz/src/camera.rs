// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Camera path over the three narrative stages.
//!
//! Four named waypoints (overview, embedding, attention, logits) plus a closing
//! key at the last frame. Each of the six channels (position x/y/z, look-at
//! x/y/z) is its own clamped keyframe curve over the shared breakpoints, so the
//! sweep is continuous across stage boundaries.

use anyhow::{bail, Result};
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use latent_math::Keyframes;

use crate::timeline::StageTimeline;

/// A named camera key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraWaypoint {
    pub name: String,
    pub frame: f64,
    pub position: [f64; 3],
    pub look_at: [f64; 3],
}

impl CameraWaypoint {
    pub fn new(name: &str, frame: f64, position: [f64; 3], look_at: [f64; 3]) -> Self {
        Self {
            name: name.to_string(),
            frame,
            position,
            look_at,
        }
    }
}

/// Camera placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: [f64; 3],
    pub look_at: [f64; 3],
}

impl CameraPose {
    fn eye(&self) -> Point3<f64> {
        Point3::from(self.position)
    }

    fn target(&self) -> Point3<f64> {
        Point3::from(self.look_at)
    }

    /// Up vector, swapped for +Z when looking straight up or down.
    fn up(&self) -> Vector3<f64> {
        let dir = self.target() - self.eye();
        if dir.norm() > 1e-9 && dir.normalize().cross(&Vector3::y()).norm() < 1e-6 {
            Vector3::z()
        } else {
            Vector3::y()
        }
    }

    fn forward(&self) -> Vector3<f64> {
        let dir = self.target() - self.eye();
        if dir.norm() < 1e-9 {
            -Vector3::z()
        } else {
            dir
        }
    }

    pub fn distance(&self) -> f64 {
        (self.target() - self.eye()).norm()
    }

    /// Right-handed world → view matrix.
    pub fn view_matrix(&self) -> Matrix4<f64> {
        let eye = self.eye();
        Matrix4::look_at_rh(&eye, &(eye + self.forward()), &self.up())
    }

    /// World-space camera rotation: local −Z points at the target.
    pub fn orientation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::face_towards(&-self.forward(), &self.up())
    }
}

pub struct CameraPathController {
    waypoints: Vec<CameraWaypoint>,
    channels: [Keyframes; 6],
}

impl CameraPathController {
    /// Sweep used by the transformer composition:
    /// wide shot → embedding (left) → attention (high angle) → logits (low angle, zoomed).
    pub fn transformer_flow(timeline: &StageTimeline, duration: f64) -> Result<Self> {
        let [t0, t1, t2, t3, end] = timeline.breakpoints(duration);
        Self::new(vec![
            CameraWaypoint::new("overview", t0, [-50.0, 20.0, 30.0], [-30.0, 0.0, 0.0]),
            CameraWaypoint::new("embedding", t1, [-30.0, 10.0, 25.0], [-30.0, 0.0, 0.0]),
            CameraWaypoint::new("attention", t2, [0.0, 40.0, 40.0], [0.0, 0.0, 0.0]),
            CameraWaypoint::new("logits", t3, [35.0, 5.0, 30.0], [35.0, -5.0, 0.0]),
            CameraWaypoint::new("closing", end, [35.0, -5.0, 20.0], [35.0, 5.0, 0.0]),
        ])
    }

    pub fn new(waypoints: Vec<CameraWaypoint>) -> Result<Self> {
        if waypoints.len() < 2 {
            bail!("camera path needs at least two waypoints, got {}", waypoints.len());
        }
        let frames: Vec<f64> = waypoints.iter().map(|w| w.frame).collect();
        let channel = |f: &dyn Fn(&CameraWaypoint) -> f64| -> Result<Keyframes> {
            let values: Vec<f64> = waypoints.iter().map(f).collect();
            Keyframes::new(&frames, &values)
        };
        let channels = [
            channel(&|w: &CameraWaypoint| w.position[0])?,
            channel(&|w: &CameraWaypoint| w.position[1])?,
            channel(&|w: &CameraWaypoint| w.position[2])?,
            channel(&|w: &CameraWaypoint| w.look_at[0])?,
            channel(&|w: &CameraWaypoint| w.look_at[1])?,
            channel(&|w: &CameraWaypoint| w.look_at[2])?,
        ];
        Ok(Self { waypoints, channels })
    }

    pub fn waypoints(&self) -> &[CameraWaypoint] {
        &self.waypoints
    }

    pub fn waypoint(&self, name: &str) -> Option<&CameraWaypoint> {
        self.waypoints.iter().find(|w| w.name == name)
    }

    pub fn pose_at(&self, frame: f64) -> CameraPose {
        let c = &self.channels;
        CameraPose {
            position: [c[0].sample(frame), c[1].sample(frame), c[2].sample(frame)],
            look_at: [c[3].sample(frame), c[4].sample(frame), c[5].sample(frame)],
        }
    }
}
