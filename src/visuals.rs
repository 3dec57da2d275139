//! Visual configuration for particle rendering.
//!
//! This module holds the look of the field, separate from the forces that
//! move it: particle colors, the line style used to connect near particles,
//! and the glow drawn around each disc.
//!
//! # Usage
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_palette(vec![Rgba::rgb8(255, 120, 40, 0.6), Rgba::rgb8(255, 200, 80, 0.6)])
//!     .with_links(LinkStyle { radius: 90.0, ..Default::default() });
//! ```

use serde::{Deserialize, Serialize};

/// A straight-alpha color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    /// Create a color from float channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGB channels and a float alpha,
    /// the way CSS `rgba(74, 158, 255, 0.6)` is written.
    pub fn rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// Same color with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Quantize to 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// CSS color string for canvas fill/stroke styles.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({}, {}, {}, {})", r, g, b, self.a.clamp(0.0, 1.0))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::TRANSPARENT
    }
}

/// The four blue/cyan/violet tones particles are drawn from by default.
pub fn default_palette() -> Vec<Rgba> {
    vec![
        Rgba::rgb8(74, 158, 255, 0.6),  // Blue
        Rgba::rgb8(0, 212, 255, 0.6),   // Cyan
        Rgba::rgb8(139, 92, 246, 0.6),  // Violet
        Rgba::rgb8(167, 139, 250, 0.6), // Lavender
    ]
}

/// How connective lines between near particles are drawn.
///
/// Two particles closer than `radius` are joined by a line whose opacity
/// rises linearly from 0 at `radius` to `max_opacity` at zero separation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
    /// Planar separation (pixels) below which a line is drawn.
    pub radius: f32,
    /// Opacity of a line between coincident particles.
    pub max_opacity: f32,
    /// Line hue. Its alpha is replaced by the distance-derived opacity.
    pub color: Rgba,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            radius: 120.0,
            max_opacity: 0.3,
            color: Rgba::rgb8(74, 158, 255, 1.0),
            width: 1.0,
        }
    }
}

/// Soft glow drawn around each particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowStyle {
    /// Blur radius in pixels at perspective scale 1.
    pub blur: f32,
}

impl Default for GlowStyle {
    fn default() -> Self {
        Self { blur: 10.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb8_round_trip() {
        let c = Rgba::rgb8(74, 158, 255, 0.6);
        let [r, g, b, a] = c.to_rgba8();
        assert_eq!((r, g, b), (74, 158, 255));
        assert_eq!(a, 153);
    }

    #[test]
    fn test_to_css() {
        let c = Rgba::rgb8(0, 212, 255, 0.5);
        assert_eq!(c.to_css(), "rgba(0, 212, 255, 0.5)");
    }

    #[test]
    fn test_default_palette_has_four_entries() {
        let palette = default_palette();
        assert_eq!(palette.len(), 4);
        assert!(palette.iter().all(|c| (c.a - 0.6).abs() < 1e-6));
    }

    #[test]
    fn test_with_alpha_keeps_hue() {
        let link = LinkStyle::default();
        let faded = link.color.with_alpha(0.175);
        assert_eq!(faded.r, link.color.r);
        assert_eq!(faded.a, 0.175);
    }
}
