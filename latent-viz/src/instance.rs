// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Caller-owned instance buffers.
//!
//! One buffer backs one instanced draw: a transform per instance plus a flat
//! `[r, g, b, r, g, b, ...]` color array. Writers report whether they changed
//! anything, and the owner re-uploads only when they did. A buffer is never
//! shared between compositions.

use latent_math::InstanceTransform;
use serde::Serialize;

use crate::color::Rgb;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstanceBuffer {
    transforms: Vec<InstanceTransform>,
    colors: Vec<f32>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            transforms: Vec::with_capacity(n),
            colors: Vec::with_capacity(n * 3),
        }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Flat RGB buffer, `3 * len()` floats.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn transform(&self, i: usize) -> InstanceTransform {
        self.transforms[i]
    }

    pub fn color(&self, i: usize) -> Rgb {
        (self.colors[i * 3], self.colors[i * 3 + 1], self.colors[i * 3 + 2])
    }

    /// Grow or shrink to `n` instances. New slots are identity/black.
    /// Returns true if the length changed.
    pub fn resize(&mut self, n: usize) -> bool {
        if n == self.len() {
            return false;
        }
        self.transforms.resize(n, InstanceTransform::IDENTITY);
        self.colors.resize(n * 3, 0.0);
        true
    }

    /// Store instance `i`. Returns true if either value differs from what was there.
    pub fn set(&mut self, i: usize, transform: InstanceTransform, color: Rgb) -> bool {
        let rgb = [color.0, color.1, color.2];
        let slot = &mut self.colors[i * 3..i * 3 + 3];
        let changed = self.transforms[i] != transform || slot[..] != rgb[..];
        self.transforms[i] = transform;
        slot.copy_from_slice(&rgb);
        changed
    }

    /// Column-major 4×4 model matrices, 16 floats per instance.
    pub fn matrices(&self) -> Vec<f32> {
        let mut out = vec![0.0f32; self.len() * 16];
        for (t, chunk) in self.transforms.iter().zip(out.chunks_exact_mut(16)) {
            t.write_matrix(chunk);
        }
        out
    }
}
