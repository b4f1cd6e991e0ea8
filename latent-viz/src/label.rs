//! Text-label placements for the overlay renderer.

use serde::Serialize;

use crate::color::Rgb;

/// One overlay label anchored at a 3D point, centered on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub text: String,
    pub position: [f32; 3],
    pub color: Rgb,
    pub font_px: f32,
    pub opacity: f32,
    /// In-screen rotation in degrees (column headers are tilted to avoid overlap).
    pub rotation_deg: f32,
    /// Bold with glow.
    pub emphasis: bool,
}

impl LabelPlacement {
    pub fn new(text: impl Into<String>, position: [f32; 3], color: Rgb, font_px: f32) -> Self {
        Self {
            text: text.into(),
            position,
            color,
            font_px,
            opacity: 1.0,
            rotation_deg: 0.0,
            emphasis: false,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_deg = degrees;
        self
    }

    pub fn emphasized(mut self) -> Self {
        self.emphasis = true;
        self
    }
}
