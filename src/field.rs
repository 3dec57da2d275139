//! The particle field simulator.
//!
//! A [`ParticleField`] owns a fixed set of particles and the surface they are
//! drawn on. Each [`step`](ParticleField::step) runs the four passes of a
//! frame in order:
//!
//! 1. **clear** the surface
//! 2. **update** every particle: integrate, wrap, pointer repulsion, damping
//! 3. **connect** every near pair with a fading line
//! 4. **draw** every particle as a perspective-scaled glowing disc
//!
//! Scheduling is not the field's concern; see
//! [`AnimationLoop`](crate::AnimationLoop) for the visibility-gated frame
//! loop that calls `step`.
//!
//! # Inert fields
//!
//! A field built without a surface is inert: it holds no particles and every
//! operation is a no-op. Hosts use this when the canvas they were pointed at
//! does not exist, so a missing element never surfaces as an error. A field
//! handed an invalid configuration goes inert the same way instead of drawing
//! NaN-sized discs.

use crate::config::FieldConfig;
use crate::forces::{damp, link_opacity, perspective_scale, repulsion, wrap};
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::surface::Surface;
use glam::Vec2;

/// A cursor-reactive particle field bound to one drawing surface.
pub struct ParticleField<S: Surface> {
    surface: Option<S>,
    config: FieldConfig,
    particles: Vec<Particle>,
    pointer: Vec2,
    frame: u64,
}

impl<S: Surface> ParticleField<S> {
    /// Create a field on `surface`, sized to `viewport`, with a freshly
    /// spawned particle set.
    ///
    /// Passing `None` creates an inert field. So does a config that fails
    /// [`FieldConfig::validate`]; the rejection is logged as a warning.
    pub fn new(surface: Option<S>, config: FieldConfig, viewport: (u32, u32)) -> Self {
        let surface = match config.validate() {
            Ok(()) => surface,
            Err(e) => {
                log::warn!("{}; particle field stays inert", e);
                None
            }
        };
        let mut field = Self {
            surface,
            config,
            particles: Vec::new(),
            pointer: Vec2::ZERO,
            frame: 0,
        };
        if field.surface.is_some() {
            field.reinitialize(viewport);
        } else {
            log::debug!("particle field created without a surface; staying inert");
        }
        field
    }

    /// Create a field around a prepared particle set.
    ///
    /// The surface keeps its current size. Useful for deterministic scenes.
    pub fn from_particles(surface: S, config: FieldConfig, particles: Vec<Particle>) -> Self {
        Self {
            surface: Some(surface),
            config,
            particles,
            pointer: Vec2::ZERO,
            frame: 0,
        }
    }

    /// Resize the surface to `viewport` and respawn every particle.
    pub fn reinitialize(&mut self, viewport: (u32, u32)) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(viewport.0, viewport.1);
        let mut ctx = SpawnContext::for_config(&self.config);
        self.particles = ctx.spawn_all(&self.config, viewport.0 as f32, viewport.1 as f32);
        log::debug!(
            "spawned {} particles over {}x{}",
            self.particles.len(),
            viewport.0,
            viewport.1
        );
    }

    /// Resize the surface. Particles keep their positions and wrap into the
    /// new bounds on the next update.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
    }

    /// Move the repulsion center.
    #[inline]
    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Last known pointer position.
    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Whether the field was created without a surface.
    #[inline]
    pub fn is_inert(&self) -> bool {
        self.surface.is_none()
    }

    /// Read-only view of the particles.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The configuration the field was built with.
    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The drawing surface, if any.
    #[inline]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Surface size, `(0, 0)` when inert.
    pub fn size(&self) -> (u32, u32) {
        self.surface.as_ref().map(|s| s.size()).unwrap_or((0, 0))
    }

    /// Number of completed frame steps.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Run one full frame: clear, update, connect, draw.
    pub fn step(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.clear();
        self.update();
        self.connect();
        self.draw();
        self.frame += 1;
    }

    /// Advance every particle by one frame.
    pub fn update(&mut self) {
        let (width, height) = self.size();
        let (width, height) = (width as f32, height as f32);
        let FieldConfig {
            depth,
            repel_radius,
            repel_strength,
            repel_falloff,
            damping,
            ..
        } = self.config;
        let pointer = self.pointer;

        for p in &mut self.particles {
            p.position += p.velocity;

            p.position.x = wrap(p.position.x, width);
            p.position.y = wrap(p.position.y, height);
            p.position.z = wrap(p.position.z, depth);

            let push = repulsion(p.planar(), pointer, repel_radius, repel_strength, repel_falloff);
            let planar = damp(p.velocity.truncate() + push, damping);
            p.velocity.x = planar.x;
            p.velocity.y = planar.y;
        }
    }

    /// Draw a line between every pair of particles closer than the link radius.
    pub fn connect(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let links = self.config.links;
        let radius_sq = links.radius * links.radius;

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let (pa, pb) = (a.planar(), b.planar());
                let dist_sq = pa.distance_squared(pb);
                if dist_sq >= radius_sq {
                    continue;
                }
                let opacity = link_opacity(dist_sq.sqrt(), links.radius, links.max_opacity);
                surface.stroke_line(pa, pb, links.color.with_alpha(opacity), links.width);
            }
        }
    }

    /// Draw every particle, nearer ones larger and brighter-glowing.
    pub fn draw(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let depth = self.config.depth;
        let glow = self.config.glow.blur;

        for p in &self.particles {
            let scale = perspective_scale(p.position.z, depth);
            surface.fill_disc(p.planar(), p.size * scale, p.color(), glow * scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Recorder};
    use crate::visuals::Rgba;
    use glam::Vec3;

    fn seeded() -> FieldConfig {
        FieldConfig::default().with_seed(5)
    }

    #[test]
    fn test_new_spawns_configured_count() {
        let field = ParticleField::new(Some(Recorder::new(0, 0)), seeded(), (800, 600));
        assert_eq!(field.particles().len(), 100);
        assert_eq!(field.size(), (800, 600));
        assert!(!field.is_inert());
    }

    #[test]
    fn test_inert_field_does_nothing() {
        let mut field: ParticleField<Recorder> = ParticleField::new(None, seeded(), (800, 600));
        assert!(field.is_inert());
        assert!(field.particles().is_empty());
        field.step();
        field.reinitialize((100, 100));
        assert_eq!(field.frame_count(), 0);
        assert!(field.particles().is_empty());
        assert_eq!(field.size(), (0, 0));
    }

    #[test]
    fn test_invalid_config_yields_inert_field() {
        let config = seeded().with_depth(0.0);
        let mut field = ParticleField::new(Some(Recorder::new(0, 0)), config, (800, 600));
        assert!(field.is_inert());
        for _ in 0..10 {
            field.step();
        }
        assert!(field.particles().is_empty());
        assert_eq!(field.frame_count(), 0);
        assert!(field.surface().is_none());
    }

    #[test]
    fn test_step_draws_every_particle() {
        let mut field = ParticleField::new(Some(Recorder::new(0, 0)), seeded(), (800, 600));
        field.step();
        let rec = field.surface().unwrap();
        assert_eq!(rec.clear_count(), 1);
        assert_eq!(rec.discs().count(), 100);
        assert_eq!(field.frame_count(), 1);
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut field = ParticleField::new(Some(Recorder::new(0, 0)), seeded(), (800, 600));
        let before = field.particles().to_vec();
        field.resize(400, 300);
        assert_eq!(field.particles(), &before[..]);
        field.update();
        for p in field.particles() {
            assert!((0.0..400.0).contains(&p.position.x));
            assert!((0.0..300.0).contains(&p.position.y));
        }
    }

    #[test]
    fn test_reinitialize_respawns() {
        let config = FieldConfig::default().with_particle_count(12);
        let mut field = ParticleField::new(Some(Recorder::new(0, 0)), config, (800, 600));
        field.reinitialize((50, 40));
        assert_eq!(field.particles().len(), 12);
        for p in field.particles() {
            assert!(p.position.x < 50.0 && p.position.y < 40.0);
        }
    }

    #[test]
    fn test_depth_is_not_damped() {
        let color = Rgba::BLACK;
        let particle = Particle::new(Vec3::new(500.0, 500.0, 10.0), Vec3::new(0.1, 0.1, 0.5), 1.0, color);
        let mut field = ParticleField::from_particles(Recorder::new(1000, 1000), FieldConfig::default(), vec![particle]);
        field.set_pointer(Vec2::new(-1000.0, -1000.0));
        field.update();
        let p = field.particles()[0];
        assert_eq!(p.velocity.z, 0.5);
        assert!((p.velocity.x - 0.099).abs() < 1e-6);
    }

    #[test]
    fn test_draw_scales_with_depth() {
        let near = Particle::new(Vec3::new(10.0, 10.0, 0.0), Vec3::ZERO, 2.0, Rgba::BLACK);
        let far = Particle::new(Vec3::new(500.0, 500.0, 1000.0 - 1e-3), Vec3::ZERO, 2.0, Rgba::BLACK);
        let mut field = ParticleField::from_particles(Recorder::new(1000, 1000), FieldConfig::default(), vec![near, far]);
        field.draw();
        let radii: Vec<(f32, f32)> = field
            .surface()
            .unwrap()
            .discs()
            .map(|c| match c {
                DrawCommand::Disc { radius, glow, .. } => (*radius, *glow),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(radii[0], (2.0, 10.0));
        assert!(radii[1].0 < 1.001 && radii[1].0 > 0.999);
    }
}
