// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Per-instance transforms for instanced draws.
//!
//! Each tensor cell becomes one copy of a unit box, placed by a translation and
//! stretched by a non-uniform scale. Rotation is only ever applied to whole
//! groups, so instances carry none.

use nalgebra::{Matrix4, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstanceTransform {
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl InstanceTransform {
    pub const IDENTITY: Self = Self {
        position: [0.0; 3],
        scale: [1.0; 3],
    };

    pub fn new(position: [f32; 3], scale: [f32; 3]) -> Self {
        Self { position, scale }
    }

    /// Model matrix `T · S`, as the engine's instance matrix attribute expects.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::from(self.position))
            * Matrix4::new_nonuniform_scaling(&Vector3::from(self.scale))
    }

    /// Write the column-major model matrix into `out[..16]`.
    pub fn write_matrix(&self, out: &mut [f32]) {
        out[..16].copy_from_slice(self.matrix().as_slice());
    }

    /// True when every scale axis is strictly positive (non-degenerate geometry).
    pub fn is_solid(&self) -> bool {
        self.scale.iter().all(|s| *s > 0.0)
    }
}

/// Rotation applied as X, then Y, then Z about the group's local axes
/// (the `XYZ` Euler order of the scene graph).
pub fn euler_rotation(x: f64, y: f64, z: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), x)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), y)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_identity_matrix() {
        assert_eq!(InstanceTransform::IDENTITY.matrix(), Matrix4::identity());
    }

    #[test]
    fn test_matrix_scales_then_translates() {
        let t = InstanceTransform::new([1.0, 2.0, 3.0], [1.0, 1.0, 4.0]);
        let p = t.matrix().transform_point(&Point3::new(0.5, 0.5, 0.5));
        assert!((p.x - 1.5).abs() < 1e-6);
        assert!((p.y - 2.5).abs() < 1e-6);
        assert!((p.z - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_write_matrix_column_major() {
        let t = InstanceTransform::new([7.0, 8.0, 9.0], [2.0, 3.0, 4.0]);
        let mut out = [0.0f32; 16];
        t.write_matrix(&mut out);
        assert_eq!(&out[12..15], &[7.0, 8.0, 9.0]);
        assert_eq!(out[0], 2.0);
        assert_eq!(out[5], 3.0);
        assert_eq!(out[10], 4.0);
        assert_eq!(out[15], 1.0);
    }

    #[test]
    fn test_is_solid() {
        assert!(InstanceTransform::IDENTITY.is_solid());
        assert!(!InstanceTransform::new([0.0; 3], [1.0, 0.0, 1.0]).is_solid());
    }

    #[test]
    fn test_euler_single_axis() {
        let r = euler_rotation(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        let v = r * Vector3::new(1.0, 0.0, 0.0);
        assert!((v.z + 1.0).abs() < 1e-12);
        assert!(v.x.abs() < 1e-12);
    }
}
