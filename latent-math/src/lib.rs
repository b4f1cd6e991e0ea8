// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Stateless, frame-indexed math for the transformer animation.
//!
//! - `curve`: piecewise-linear keyframe interpolation with per-side extrapolation
//! - `spring`: closed-form damped-spring response used for "pop" reveals
//! - `transform`: per-instance position/scale and the model matrices built from them

pub mod curve;
pub mod spring;
pub mod transform;

pub use curve::{interpolate, interpolate_with, Extrapolate, Keyframes};
pub use spring::{settle_frames, spring, spring_between, SpringConfig};
pub use transform::{euler_rotation, InstanceTransform};
