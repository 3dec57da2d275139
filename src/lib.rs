//! # Backdrop - Interactive Particle Backgrounds
//!
//! A cursor-reactive particle field for web pages and native previews.
//!
//! A fixed set of particles drifts slowly through a shallow 3D volume, wraps
//! around the edges of its surface, and is pushed away by the pointer. Every
//! frame, near pairs are joined by fading lines and each particle is drawn as
//! a glowing disc sized by its depth. The animation only runs while the
//! surface is in view.
//!
//! ## Quick Start
//!
//! ```ignore
//! use backdrop::prelude::*;
//!
//! let config = FieldConfig::default().with_particle_count(120);
//! let mut field = ParticleField::new(Some(Pixmap::new(0, 0)), config, (800, 600));
//! let mut frame_loop = AnimationLoop::new(ManualHost::new());
//!
//! frame_loop.start(&mut field);
//! for _ in 0..60 {
//!     field.set_pointer(Vec2::new(400.0, 300.0));
//!     frame_loop.tick(&mut field);
//! }
//! field.surface().unwrap().save_png("frame.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Surfaces
//!
//! The field draws through the [`Surface`] trait: clear, stroke a line, fill
//! a glowing disc. [`Pixmap`] rasterizes in software, [`Recorder`] keeps the
//! draw calls for inspection, and in the browser the canvas 2D context is
//! wrapped by the `web` module.
//!
//! ### Frame hosts
//!
//! [`AnimationLoop`] never sleeps or spins. It asks a [`FrameHost`] for the
//! next frame callback (`requestAnimationFrame`, a window redraw, or a manual
//! tick) and stops asking when the field scrolls out of view.
//!
//! ### Configuration
//!
//! [`FieldConfig`] holds every tunable: particle count, depth, speeds,
//! palette, pointer repulsion, damping, link and glow styles. It loads from
//! JSON with serde, and omitted keys keep their defaults.
//!
//! ## Feature Overview
//!
//! | Category | Items |
//! |----------|-------|
//! | Simulation | [`ParticleField`], [`Particle`], [`SpawnContext`] |
//! | Forces | [`forces::wrap`], [`forces::repulsion`], [`forces::damp`], [`Falloff`] |
//! | Drawing | [`Surface`], [`Pixmap`], [`Recorder`], [`LinkStyle`], [`GlowStyle`] |
//! | Scheduling | [`AnimationLoop`], [`FrameHost`], [`ManualHost`], [`Time`] |
//! | Page | [`showcase::TeaserPlaylist`], [`showcase::CounterAnimation`], [`showcase::ParallaxLayer`], [`showcase::PlayButton`], [`showcase::LazyLoad`] |

pub mod config;
pub mod error;
pub mod field;
pub mod forces;
pub mod frame_loop;
pub mod input;
pub mod particle;
pub mod raster;
pub mod showcase;
pub mod spawn;
pub mod surface;
pub mod time;
pub mod visuals;

#[cfg(not(target_arch = "wasm32"))]
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bytemuck;
pub use config::FieldConfig;
pub use error::{ConfigError, ExportError};
#[cfg(not(target_arch = "wasm32"))]
pub use error::{GpuError, ViewerError};
pub use field::ParticleField;
pub use forces::Falloff;
pub use frame_loop::{AnimationLoop, FrameHost, ManualHost};
pub use glam::{Vec2, Vec3};
pub use input::{Input, KeyCode};
pub use particle::Particle;
pub use raster::Pixmap;
pub use spawn::SpawnContext;
pub use surface::{DrawCommand, Recorder, Surface};
pub use time::Time;
pub use visuals::{GlowStyle, LinkStyle, Rgba};
#[cfg(not(target_arch = "wasm32"))]
pub use viewer::Viewer;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use backdrop::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::FieldConfig;
    pub use crate::field::ParticleField;
    pub use crate::forces::Falloff;
    pub use crate::frame_loop::{AnimationLoop, FrameHost, ManualHost};
    pub use crate::input::{Input, KeyCode};
    pub use crate::particle::Particle;
    pub use crate::raster::Pixmap;
    pub use crate::spawn::SpawnContext;
    pub use crate::surface::{Recorder, Surface};
    pub use crate::time::Time;
    pub use crate::visuals::{GlowStyle, LinkStyle, Rgba};
    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::viewer::Viewer;
    pub use crate::{Vec2, Vec3};
}
