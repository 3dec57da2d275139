//! Force and shading math shared by the field update, connect and draw passes.
//!
//! Everything here is a pure function of its inputs so the per-frame passes
//! stay small and each piece of physics can be tested on its own.
//!
//! - **Boundaries**: [`wrap`] (toroidal, never bounce or clamp)
//! - **Pointer force**: [`Falloff`], [`repulsion`]
//! - **Friction**: [`damp`]
//! - **Shading**: [`link_opacity`], [`perspective_scale`]

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a radius-limited force falls off with distance.
///
/// Every variant is zero at and beyond the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Falloff {
    /// Full strength anywhere inside the radius.
    Constant,

    /// `(radius - dist) / radius`: 1 at the center, 0 at the edge.
    #[default]
    Linear,

    /// Smoothstep from 1 at the center to 0 at the edge.
    Smooth,
}

impl Falloff {
    /// Falloff factor in `0.0..=1.0` for a point `dist` away from the center.
    pub fn factor(&self, dist: f32, radius: f32) -> f32 {
        if radius <= 0.0 || dist >= radius {
            return 0.0;
        }
        let t = (dist / radius).max(0.0);
        match self {
            Falloff::Constant => 1.0,
            Falloff::Linear => 1.0 - t,
            Falloff::Smooth => 1.0 - t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Wrap a coordinate into `[0, extent)` (toroidal boundary).
///
/// A value below zero snaps to the far edge, the largest float under
/// `extent`. A value at or past `extent` snaps to 0. Overshoot is discarded,
/// so a particle left far outside after a viewport shrink lands on an edge
/// rather than somewhere inside. A degenerate extent (zero or negative)
/// collapses the axis to 0.
pub fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    if value < 0.0 {
        below(extent)
    } else if value >= extent {
        0.0
    } else {
        value
    }
}

/// Next representable `f32` toward zero. `extent` is positive and finite.
#[inline]
fn below(extent: f32) -> f32 {
    f32::from_bits(extent.to_bits() - 1)
}

/// Scalar strength of the pointer push at `dist` pixels.
///
/// Zero at and beyond `radius`, `strength` at the pointer itself.
#[inline]
pub fn repulsion_strength(dist: f32, radius: f32, strength: f32, falloff: Falloff) -> f32 {
    falloff.factor(dist, radius) * strength
}

/// Velocity change that pushes a particle at `position` away from `pointer`.
///
/// The push is along the displacement from the pointer, scaled by the
/// falloff-weighted strength. Particles outside `radius` are untouched.
pub fn repulsion(position: Vec2, pointer: Vec2, radius: f32, strength: f32, falloff: Falloff) -> Vec2 {
    let away = position - pointer;
    let dist = away.length();
    if dist >= radius {
        return Vec2::ZERO;
    }
    away * repulsion_strength(dist, radius, strength, falloff)
}

/// Apply one frame of multiplicative damping.
#[inline]
pub fn damp(velocity: Vec2, damping: f32) -> Vec2 {
    velocity * damping
}

/// Opacity of a connective line between particles `dist` pixels apart.
pub fn link_opacity(dist: f32, radius: f32, max_opacity: f32) -> f32 {
    if radius <= 0.0 || dist >= radius {
        return 0.0;
    }
    (radius - dist.max(0.0)) / radius * max_opacity
}

/// Depth-derived size multiplier: 1 at `z = 0`, shrinking with distance.
#[inline]
pub fn perspective_scale(z: f32, depth: f32) -> f32 {
    depth / (depth + z)
}
