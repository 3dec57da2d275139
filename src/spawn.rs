//! Spawn context for particle initialization.
//!
//! Wraps a seeded RNG with the handful of draws a particle field needs:
//! uniform positions over the surface, small random velocities, sizes, and
//! a palette pick.

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::visuals::Rgba;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Context used to populate a field with randomized particles.
///
/// ```ignore
/// let mut ctx = SpawnContext::seeded(7);
/// let particles = ctx.spawn_all(&config, 1280.0, 720.0);
/// ```
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context seeded from the wall clock.
    ///
    /// Different every page load, which is what a background wants.
    pub fn from_clock() -> Self {
        let seed = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    /// Create a reproducible context.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Context for a configuration: fixed seed if set, clock otherwise.
    pub fn for_config(config: &FieldConfig) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_clock(),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. An empty range yields `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random value centered on zero, spanning `width` in total.
    #[inline]
    pub fn random_centered(&mut self, width: f32) -> f32 {
        let half = width * 0.5;
        self.random_range(-half, half)
    }

    /// Uniform pick from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rng.gen_range(0..items.len())])
        }
    }

    // ========== Particle helpers ==========

    /// Random point over a `width` x `height` surface at a random depth.
    pub fn random_position(&mut self, width: f32, height: f32, depth: f32) -> Vec3 {
        Vec3::new(
            self.random_range(0.0, width),
            self.random_range(0.0, height),
            self.random_range(0.0, depth),
        )
    }

    /// One particle with every attribute drawn from the configured ranges.
    pub fn spawn_particle(&mut self, config: &FieldConfig, width: f32, height: f32) -> Particle {
        let position = self.random_position(width, height, config.depth);
        let velocity = Vec3::new(
            self.random_centered(config.planar_speed),
            self.random_centered(config.planar_speed),
            self.random_centered(config.depth_speed),
        );
        let (min_size, max_size) = config.size_range;
        let size = self.random_range(min_size, max_size);
        let color = self.pick(&config.palette).copied().unwrap_or(Rgba::TRANSPARENT);
        Particle::new(position, velocity, size, color)
    }

    /// The full particle set for a surface.
    pub fn spawn_all(&mut self, config: &FieldConfig, width: f32, height: f32) -> Vec<Particle> {
        (0..config.particle_count)
            .map(|_| self.spawn_particle(config, width, height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_within_ranges() {
        let config = FieldConfig::default();
        let mut ctx = SpawnContext::seeded(3);
        let particles = ctx.spawn_all(&config, 640.0, 480.0);
        assert_eq!(particles.len(), 100);
        for p in &particles {
            assert!((0.0..640.0).contains(&p.position.x));
            assert!((0.0..480.0).contains(&p.position.y));
            assert!((0.0..1000.0).contains(&p.position.z));
            assert!(p.velocity.x.abs() <= 0.25 && p.velocity.y.abs() <= 0.25);
            assert!(p.velocity.z.abs() <= 1.0);
            assert!((1.0..3.0).contains(&p.size));
            assert!(config.palette.contains(&p.color()));
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let config = FieldConfig::default();
        let a = SpawnContext::seeded(9).spawn_all(&config, 100.0, 100.0);
        let b = SpawnContext::seeded(9).spawn_all(&config, 100.0, 100.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_surface() {
        let config = FieldConfig::default();
        let mut ctx = SpawnContext::seeded(1);
        let p = ctx.spawn_particle(&config, 0.0, 0.0);
        assert_eq!(p.position.x, 0.0);
        assert_eq!(p.position.y, 0.0);
    }

    #[test]
    fn test_pick_empty() {
        let mut ctx = SpawnContext::seeded(0);
        let empty: [u8; 0] = [];
        assert!(ctx.pick(&empty).is_none());
    }
}
