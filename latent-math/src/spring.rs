// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Damped-spring response for "pop into place" reveals.
//!
//! Models a unit mass-spring-damper released from rest at displacement 1 and
//! reports progress toward the rest position, so the output starts at 0 and
//! settles at 1. The response is evaluated in closed form at
//! `t = offset / fps` seconds, which keeps it frame-indexed and memoryless.
//!
//! With `ζ = c / (2√(km))` and `ω₀ = √(k/m)` the displacement is
//!
//! ```text
//! ζ < 1:  e^(−ζω₀t) · (cos ω₁t + (ζω₀/ω₁) sin ω₁t),      ω₁ = ω₀√(1−ζ²)
//! ζ = 1:  e^(−ω₀t) · (1 + ω₀t)
//! ζ > 1:  ½[(1+r) e^((−ζω₀+ω₂)t) + (1−r) e^((−ζω₀−ω₂)t)],  ω₂ = ω₀√(ζ²−1), r = ζω₀/ω₂
//! ```
//!
//! The overdamped branch is written with plain exponentials because
//! `cosh`/`sinh` overflow long before their product with the envelope does.

use serde::{Deserialize, Serialize};

/// Frame rate assumed when a caller passes a non-positive one.
pub const DEFAULT_FPS: f64 = 30.0;

const CRITICAL_EPS: f64 = 1e-9;

/// Physical parameters of the spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub damping: f64,
    pub mass: f64,
    pub stiffness: f64,
    /// Never report progress past the rest position.
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            mass: 0.5,
            stiffness: 100.0,
            overshoot_clamping: false,
        }
    }
}

impl SpringConfig {
    pub fn new(damping: f64, mass: f64, stiffness: f64) -> Self {
        Self {
            damping,
            mass,
            stiffness,
            overshoot_clamping: false,
        }
    }

    pub fn with_overshoot_clamping(mut self, clamp: bool) -> Self {
        self.overshoot_clamping = clamp;
        self
    }

    /// Damping ratio ζ. Below 1 the spring overshoots.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Undamped natural frequency ω₀ in rad/s.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Mass and stiffness must be positive, damping non-negative, all finite.
    pub fn is_physical(&self) -> bool {
        self.mass.is_finite()
            && self.stiffness.is_finite()
            && self.damping.is_finite()
            && self.mass > 0.0
            && self.stiffness > 0.0
            && self.damping >= 0.0
    }

    /// Remaining displacement from rest after `t` seconds.
    fn displacement(&self, t: f64) -> f64 {
        let zeta = self.damping_ratio();
        let w0 = self.natural_frequency();

        if (zeta - 1.0).abs() < CRITICAL_EPS {
            return (-w0 * t).exp() * (1.0 + w0 * t);
        }

        if zeta < 1.0 {
            let w1 = w0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * w0 * t).exp();
            envelope * ((w1 * t).cos() + (zeta * w0 / w1) * (w1 * t).sin())
        } else {
            let w2 = w0 * (zeta * zeta - 1.0).sqrt();
            let r = zeta * w0 / w2;
            let fast = (-zeta * w0 - w2) * t;
            let slow = (-zeta * w0 + w2) * t;
            0.5 * ((1.0 + r) * slow.exp() + (1.0 - r) * fast.exp())
        }
    }
}

/// Spring progress in `[0, ~1]` at `offset` frames after the trigger.
///
/// Offsets at or before the trigger return exactly 0. A non-physical
/// configuration behaves as an infinitely stiff spring and returns 1 as soon
/// as the trigger has passed.
pub fn spring(offset: f64, fps: f64, config: &SpringConfig) -> f64 {
    if !(offset > 0.0) {
        return 0.0;
    }
    if !config.is_physical() {
        return 1.0;
    }
    let fps = if fps > 0.0 { fps } else { DEFAULT_FPS };
    let t = offset / fps;

    // Released from rest, the displacement never exceeds its starting value.
    let progress = (1.0 - config.displacement(t)).max(0.0);
    if config.overshoot_clamping {
        progress.min(1.0)
    } else {
        progress
    }
}

/// [`spring`] mapped onto `from..to`.
pub fn spring_between(offset: f64, fps: f64, config: &SpringConfig, from: f64, to: f64) -> f64 {
    from + (to - from) * spring(offset, fps, config)
}

/// First frame offset after which the response stays within `threshold` of rest,
/// searching at most `max_frames`.
pub fn settle_frames(fps: f64, config: &SpringConfig, threshold: f64, max_frames: u32) -> Option<u32> {
    let mut last_outside = None;
    for f in 0..=max_frames {
        if (1.0 - spring(f as f64, fps, config)).abs() > threshold {
            last_outside = Some(f);
        }
    }
    match last_outside {
        None => Some(0),
        Some(f) if f < max_frames => Some(f + 1),
        Some(_) => None,
    }
}
