//! Color ramps for instance buffers.
//!
//! All colors are (r, g, b) tuples in [0.0, 1.0], parsed from "#RRGGBB" hex
//! strings at config time and emitted back as hex for HTML/Three.js.

use anyhow::{bail, Context, Result};

pub type Rgb = (f32, f32, f32);

/// Parse "#RRGGBB" (or "RRGGBB") into an (r, g, b) tuple.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("expected a #RRGGBB color, got {hex:?}");
    }
    let channel = |i: usize| -> Result<f32> {
        let v = u8::from_str_radix(&digits[i..i + 2], 16)
            .with_context(|| format!("bad channel in {hex:?}"))?;
        Ok(v as f32 / 255.0)
    };
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// Linear blend `a → b`; `t` is clamped to [0, 1].
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let s = 1.0 - t;
    (a.0 * s + b.0 * t, a.1 * s + b.1 * t, a.2 * s + b.2 * t)
}

/// Signed value in [-1, 1]: blend from `zero` toward `negative` or `positive` by |v|.
pub fn diverging_color(value: f32, negative: Rgb, zero: Rgb, positive: Rgb) -> Rgb {
    if value < 0.0 {
        lerp_rgb(zero, negative, value.abs())
    } else {
        lerp_rgb(zero, positive, value.abs())
    }
}

/// Two linear stages meeting at `knee`: low→mid on [0, knee), mid→high on [knee, 1].
pub fn two_stage_color(t: f32, knee: f32, low: Rgb, mid: Rgb, high: Rgb) -> Rgb {
    if t < knee {
        lerp_rgb(low, mid, t / knee)
    } else {
        lerp_rgb(mid, high, (t - knee) / (1.0 - knee))
    }
}

/// Convert (r, g, b) in [0,1] to a CSS hex color string "#RRGGBB".
pub fn rgb_to_hex(c: Rgb) -> String {
    let (r, g, b) = to_bytes(c);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Convert (r, g, b) in [0,1] to a Three.js hex integer "0xRRGGBB".
pub fn rgb_to_threejs_hex(c: Rgb) -> String {
    let (r, g, b) = to_bytes(c);
    format!("0x{:02x}{:02x}{:02x}", r, g, b)
}

fn to_bytes(c: Rgb) -> (u8, u8, u8) {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    (q(c.0), q(c.1), q(c.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5 && (a.2 - b.2).abs() < 1e-5
    }

    #[test]
    fn test_hex_round_trip() {
        for hex in ["#2563eb", "#171717", "#dc2626", "#06b6d4", "#000000", "#ffffff"] {
            assert_eq!(rgb_to_hex(hex_to_rgb(hex).unwrap()), hex);
        }
        assert_eq!(hex_to_rgb("ff0000").unwrap(), (1.0, 0.0, 0.0));
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(hex_to_rgb("#12345").is_err());
        assert!(hex_to_rgb("#12345g").is_err());
        assert!(hex_to_rgb("").is_err());
        assert!(hex_to_rgb("#ff00ff00").is_err());
    }

    #[test]
    fn test_lerp_endpoints_and_clamp() {
        let a = (0.0, 0.0, 0.0);
        let b = (1.0, 0.5, 0.25);
        assert!(close(lerp_rgb(a, b, 0.0), a));
        assert!(close(lerp_rgb(a, b, 1.0), b));
        assert!(close(lerp_rgb(a, b, 3.0), b));
        assert!(close(lerp_rgb(a, b, 0.5), (0.5, 0.25, 0.125)));
    }

    #[test]
    fn test_diverging_sides() {
        let neg = (0.0, 0.0, 1.0);
        let zero = (0.1, 0.1, 0.1);
        let pos = (1.0, 0.0, 0.0);
        assert!(close(diverging_color(-1.0, neg, zero, pos), neg));
        assert!(close(diverging_color(1.0, neg, zero, pos), pos));
        assert!(close(diverging_color(0.0, neg, zero, pos), zero));
    }

    #[test]
    fn test_two_stage_knee() {
        let low = (0.0, 0.0, 0.0);
        let mid = (0.5, 0.5, 0.5);
        let high = (1.0, 1.0, 1.0);
        assert!(close(two_stage_color(0.0, 0.2, low, mid, high), low));
        assert!(close(two_stage_color(0.1, 0.2, low, mid, high), (0.25, 0.25, 0.25)));
        assert!(close(two_stage_color(0.2, 0.2, low, mid, high), mid));
        assert!(close(two_stage_color(1.0, 0.2, low, mid, high), high));
    }

    #[test]
    fn test_threejs_hex() {
        assert_eq!(rgb_to_threejs_hex((1.0, 0.0, 0.0)), "0xff0000");
    }
}
