//! The particle type owned by a [`ParticleField`](crate::ParticleField).

use crate::visuals::Rgba;
use glam::{Vec2, Vec3};

/// A point particle with screen-space position and a depth coordinate.
///
/// `position.x`/`position.y` are pixels on the drawing surface; `position.z`
/// is depth in `[0, depth)` and only affects drawn size. The color is picked
/// from the palette at spawn time and never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Base disc radius before perspective scaling.
    pub size: f32,
    color: Rgba,
}

impl Particle {
    /// Create a particle.
    pub fn new(position: Vec3, velocity: Vec3, size: f32, color: Rgba) -> Self {
        Self {
            position,
            velocity,
            size,
            color,
        }
    }

    /// Palette color assigned at spawn.
    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Position projected onto the drawing plane.
    #[inline]
    pub fn planar(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Planar speed (depth motion excluded).
    #[inline]
    pub fn planar_speed(&self) -> f32 {
        self.velocity.truncate().length()
    }
}
