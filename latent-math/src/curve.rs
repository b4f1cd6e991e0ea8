// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Piecewise-linear keyframe interpolation.
//!
//! A curve is an ascending list of breakpoint frames with one output value per
//! breakpoint. Between two breakpoints the output is the straight line joining
//! them; outside the table the behavior is chosen per side by [`Extrapolate`].
//! Everything here is a pure function of the frame, so evaluating the same frame
//! twice always yields the same value.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// What a curve does for frames outside its first/last breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Hold the edge value.
    #[default]
    Clamp,
    /// Continue the slope of the edge segment.
    Extend,
    /// Return the input frame unchanged.
    Identity,
}

/// Interpolate `frame` over `frames` → `values`, clamping on both sides.
///
/// `frames` must be ascending. Only the first `min(frames.len(), values.len())`
/// pairs are used; an empty table yields 0.
pub fn interpolate(frame: f64, frames: &[f64], values: &[f64]) -> f64 {
    interpolate_with(frame, frames, values, Extrapolate::Clamp, Extrapolate::Clamp)
}

/// Interpolate with explicit extrapolation policies for each side.
pub fn interpolate_with(
    frame: f64,
    frames: &[f64],
    values: &[f64],
    left: Extrapolate,
    right: Extrapolate,
) -> f64 {
    let n = frames.len().min(values.len());
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return values[0];
    }

    let (frames, values) = (&frames[..n], &values[..n]);
    if frame.is_nan() {
        return values[0];
    }

    if frame < frames[0] {
        return extrapolate(frame, left, frames[0], values[0], frames[1], values[1]);
    }
    if frame >= frames[n - 1] {
        if frame == frames[n - 1] {
            return values[n - 1];
        }
        return extrapolate(
            frame,
            right,
            frames[n - 1],
            values[n - 1],
            frames[n - 2],
            values[n - 2],
        );
    }

    // frames[i] <= frame < frames[i + 1]
    let i = frames.partition_point(|&k| k <= frame).saturating_sub(1).min(n - 2);
    lerp_segment(frame, frames[i], values[i], frames[i + 1], values[i + 1])
}

fn lerp_segment(frame: f64, k0: f64, v0: f64, k1: f64, v1: f64) -> f64 {
    let span = k1 - k0;
    if span <= 0.0 {
        return v0;
    }
    let t = (frame - k0) / span;
    v0 + (v1 - v0) * t
}

/// `edge` is the breakpoint being crossed, `inner` its neighbor inside the table.
fn extrapolate(
    frame: f64,
    policy: Extrapolate,
    edge_frame: f64,
    edge_value: f64,
    inner_frame: f64,
    inner_value: f64,
) -> f64 {
    match policy {
        Extrapolate::Clamp => edge_value,
        Extrapolate::Identity => frame,
        Extrapolate::Extend => lerp_segment(frame, inner_frame, inner_value, edge_frame, edge_value),
    }
}

/// A validated keyframe table with its extrapolation policy.
///
/// Deserialization goes through [`Keyframes::new`], so a table read from a
/// config is held to the same rules as one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "KeyframesDef")]
pub struct Keyframes {
    frames: Vec<f64>,
    values: Vec<f64>,
    left: Extrapolate,
    right: Extrapolate,
}

#[derive(Deserialize)]
struct KeyframesDef {
    frames: Vec<f64>,
    values: Vec<f64>,
    #[serde(default)]
    left: Extrapolate,
    #[serde(default)]
    right: Extrapolate,
}

impl TryFrom<KeyframesDef> for Keyframes {
    type Error = anyhow::Error;

    fn try_from(def: KeyframesDef) -> Result<Self> {
        Ok(Keyframes::new(&def.frames, &def.values)?.with_extrapolation(def.left, def.right))
    }
}

impl Keyframes {
    /// Build a clamped curve. Fails on empty, mismatched, non-finite or
    /// non-strictly-ascending breakpoints.
    pub fn new(frames: &[f64], values: &[f64]) -> Result<Self> {
        if frames.is_empty() {
            bail!("keyframe table is empty");
        }
        if frames.len() != values.len() {
            bail!(
                "keyframe table has {} frames but {} values",
                frames.len(),
                values.len()
            );
        }
        if frames.iter().chain(values).any(|v| !v.is_finite()) {
            bail!("keyframe table contains a non-finite entry");
        }
        if let Some(w) = frames.windows(2).find(|w| w[1] <= w[0]) {
            bail!("keyframes must be strictly ascending ({} then {})", w[0], w[1]);
        }
        Ok(Self {
            frames: frames.to_vec(),
            values: values.to_vec(),
            left: Extrapolate::Clamp,
            right: Extrapolate::Clamp,
        })
    }

    pub fn with_extrapolation(mut self, left: Extrapolate, right: Extrapolate) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    pub fn sample(&self, frame: f64) -> f64 {
        interpolate_with(frame, &self.frames, &self.values, self.left, self.right)
    }

    pub fn frames(&self) -> &[f64] {
        &self.frames
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first_frame(&self) -> f64 {
        self.frames[0]
    }

    pub fn last_frame(&self) -> f64 {
        self.frames[self.frames.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STAGES: [f64; 5] = [0.0, 80.0, 160.0, 240.0, 300.0];
    const VALUES: [f64; 5] = [-50.0, -30.0, 0.0, 35.0, 12.5];

    #[test]
    fn test_clamps_before_first_breakpoint() {
        assert_eq!(interpolate(-10.0, &STAGES, &VALUES), -50.0);
    }

    #[test]
    fn test_clamps_after_last_breakpoint() {
        assert_eq!(interpolate(400.0, &STAGES, &VALUES), 12.5);
    }

    #[test]
    fn test_exact_at_breakpoints() {
        for (k, v) in STAGES.iter().zip(VALUES.iter()) {
            assert_eq!(interpolate(*k, &STAGES, &VALUES), *v);
        }
    }

    #[test]
    fn test_midpoint_is_linear() {
        let v = interpolate(40.0, &STAGES, &VALUES);
        assert!((v - (-40.0)).abs() < 1e-12);
        let v = interpolate(200.0, &STAGES, &VALUES);
        assert!((v - 17.5).abs() < 1e-12);
    }

    #[test]
    fn test_extend_continues_edge_slope() {
        let v = interpolate_with(
            -10.0,
            &[0.0, 10.0],
            &[0.0, 1.0],
            Extrapolate::Extend,
            Extrapolate::Extend,
        );
        assert!((v + 1.0).abs() < 1e-12);
        let v = interpolate_with(
            20.0,
            &[0.0, 10.0],
            &[0.0, 1.0],
            Extrapolate::Extend,
            Extrapolate::Extend,
        );
        assert!((v - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_identity_returns_frame() {
        let v = interpolate_with(
            55.0,
            &[0.0, 10.0],
            &[0.0, 1.0],
            Extrapolate::Clamp,
            Extrapolate::Identity,
        );
        assert_eq!(v, 55.0);
    }

    #[test]
    fn test_degenerate_tables() {
        assert_eq!(interpolate(3.0, &[], &[]), 0.0);
        assert_eq!(interpolate(3.0, &[5.0], &[7.0]), 7.0);
        // Extra values beyond the frame list are ignored
        assert_eq!(interpolate(10.0, &[0.0, 10.0], &[0.0, 1.0, 99.0]), 1.0);
        assert_eq!(interpolate(f64::NAN, &[0.0, 10.0], &[4.0, 1.0]), 4.0);
    }

    #[test]
    fn test_keyframes_validation() {
        assert!(Keyframes::new(&[], &[]).is_err());
        assert!(Keyframes::new(&[0.0, 1.0], &[0.0]).is_err());
        assert!(Keyframes::new(&[0.0, 0.0], &[0.0, 1.0]).is_err());
        assert!(Keyframes::new(&[0.0, f64::NAN], &[0.0, 1.0]).is_err());
        assert!(Keyframes::new(&STAGES, &VALUES).is_ok());
    }

    #[test]
    fn test_keyframes_sample_matches_free_function() {
        let curve = Keyframes::new(&STAGES, &VALUES).unwrap();
        for f in [-20.0, 0.0, 33.3, 80.0, 159.9, 250.0, 300.0, 999.0] {
            assert_eq!(curve.sample(f), interpolate(f, &STAGES, &VALUES));
        }
        assert_eq!(curve.first_frame(), 0.0);
        assert_eq!(curve.last_frame(), 300.0);
    }

    #[test]
    fn test_keyframes_serde() {
        let curve = Keyframes::new(&[0.0, 20.0], &[0.0, 1.0]).unwrap();
        let json = serde_json::to_string(&curve).unwrap();
        let restored: Keyframes = serde_json::from_str(&json).unwrap();
        assert_eq!(curve, restored);
    }

    #[test]
    fn test_deserialized_keyframes_are_validated() {
        let parse = |json: &str| serde_json::from_str::<Keyframes>(json);
        assert!(parse(r#"{"frames": [], "values": []}"#).is_err());
        assert!(parse(r#"{"frames": [0, 10], "values": [1]}"#).is_err());
        assert!(parse(r#"{"frames": [10, 0], "values": [0, 1]}"#).is_err());

        let curve = parse(r#"{"frames": [0, 10], "values": [0, 1], "right": "extend"}"#).unwrap();
        assert_eq!(curve.last_frame(), 10.0);
        assert!((curve.sample(20.0) - 2.0).abs() < 1e-12);
        assert_eq!(curve.sample(-5.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_output_stays_within_value_range(frame in -1000.0f64..1000.0) {
            let v = interpolate(frame, &STAGES, &VALUES);
            let lo = VALUES.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = VALUES.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }

        #[test]
        fn prop_restartable(frame in -1000.0f64..1000.0) {
            prop_assert_eq!(
                interpolate(frame, &STAGES, &VALUES),
                interpolate(frame, &STAGES, &VALUES)
            );
        }
    }
}
