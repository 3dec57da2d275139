//! Configuration for a particle field.
//!
//! Every constant the simulator uses lives in [`FieldConfig`], so one
//! component covers all the page variants: a denser hero background, a
//! calmer footer, a different palette. Configurations serialize to JSON and
//! omitted fields fall back to the defaults.
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_particle_count(80)
//!     .with_repel(200.0, 0.02)
//!     .with_seed(7);
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use crate::forces::Falloff;
use crate::visuals::{default_palette, GlowStyle, LinkStyle, Rgba};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete particle field configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles, fixed for the lifetime of a field.
    pub particle_count: u32,
    /// Depth range: `z` lives in `[0, depth)`.
    pub depth: f32,
    /// Width of the uniform range initial `vx`/`vy` are drawn from.
    pub planar_speed: f32,
    /// Width of the uniform range initial `vz` is drawn from.
    pub depth_speed: f32,
    /// Base radius range `[min, max)`.
    pub size_range: (f32, f32),
    /// Colors assigned uniformly at spawn.
    pub palette: Vec<Rgba>,
    /// Pointer distance (pixels) below which particles are pushed away.
    pub repel_radius: f32,
    /// Push strength at zero distance.
    pub repel_strength: f32,
    /// Shape of the push between the pointer and the radius.
    pub repel_falloff: Falloff,
    /// Per-frame multiplier on `vx`/`vy`.
    pub damping: f32,
    /// Connective line style.
    pub links: LinkStyle,
    /// Particle glow.
    pub glow: GlowStyle,
    /// Fixed RNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            depth: 1000.0,
            planar_speed: 0.5,
            depth_speed: 2.0,
            size_range: (1.0, 3.0),
            palette: default_palette(),
            repel_radius: 150.0,
            repel_strength: 0.01,
            repel_falloff: Falloff::Linear,
            damping: 0.99,
            links: LinkStyle::default(),
            glow: GlowStyle::default(),
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the depth range.
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the palette particles pick their color from.
    pub fn with_palette(mut self, palette: Vec<Rgba>) -> Self {
        self.palette = palette;
        self
    }

    /// Set the pointer repulsion radius and strength.
    pub fn with_repel(mut self, radius: f32, strength: f32) -> Self {
        self.repel_radius = radius;
        self.repel_strength = strength;
        self
    }

    /// Set the repulsion falloff curve.
    pub fn with_repel_falloff(mut self, falloff: Falloff) -> Self {
        self.repel_falloff = falloff;
        self
    }

    /// Set the per-frame velocity damping.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Set the connective line style.
    pub fn with_links(mut self, links: LinkStyle) -> Self {
        self.links = links;
        self
    }

    /// Set the glow style.
    pub fn with_glow(mut self, glow: GlowStyle) -> Self {
        self.glow = glow;
        self
    }

    /// Use a fixed seed so spawning is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration for values the simulator cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.palette.is_empty() && self.particle_count > 0 {
            return invalid("palette must hold at least one color".into());
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return invalid(format!("damping must be within 0..=1, got {}", self.damping));
        }
        if !(self.depth > 0.0) {
            return invalid(format!("depth must be positive, got {}", self.depth));
        }
        let (min, max) = self.size_range;
        if !(min >= 0.0 && max >= min) {
            return invalid(format!("size range must satisfy 0 <= min <= max, got ({}, {})", min, max));
        }
        for (name, value) in [
            ("repel_radius", self.repel_radius),
            ("links.radius", self.links.radius),
            ("planar_speed", self.planar_speed),
            ("depth_speed", self.depth_speed),
            ("glow.blur", self.glow.blur),
        ] {
            if !(value >= 0.0) {
                return invalid(format!("{} must be non-negative, got {}", name, value));
            }
        }
        Ok(())
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(FieldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FieldConfig::from_json(r#"{ "particle_count": 80, "links": { "radius": 90.0 } }"#).unwrap();
        assert_eq!(config.particle_count, 80);
        assert_eq!(config.links.radius, 90.0);
        assert_eq!(config.links.max_opacity, 0.3);
        assert_eq!(config.damping, 0.99);
        assert_eq!(config.palette.len(), 4);
    }

    #[test]
    fn test_json_round_trip() {
        let config = FieldConfig::default().with_seed(11).with_repel_falloff(Falloff::Smooth);
        let json = config.to_json().unwrap();
        assert_eq!(FieldConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_damping() {
        let err = FieldConfig::default().with_damping(1.5).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_palette() {
        assert!(FieldConfig::default().with_palette(vec![]).validate().is_err());
        // An empty field never needs a color.
        assert!(FieldConfig::default()
            .with_palette(vec![])
            .with_particle_count(0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("backdrop-config-{}.json", std::process::id()));
        let config = FieldConfig::default().with_particle_count(42);
        config.save(&path).unwrap();
        let loaded = FieldConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.particle_count, 42);
    }
}
