//! Drawing surfaces.
//!
//! The field only ever does four things to its surface: resize it, clear it,
//! stroke a line, and fill a glowing disc. [`Surface`] captures exactly that,
//! so the same simulation drives a browser canvas, the software [`Pixmap`]
//! and the command [`Recorder`] used by tests and benchmarks.
//!
//! [`Pixmap`]: crate::raster::Pixmap

use crate::visuals::Rgba;
use glam::Vec2;

/// A 2D drawing target owned by a particle field.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize to `width` x `height` pixels. Contents may be discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Erase the whole drawable region.
    fn clear(&mut self);

    /// Draw a straight line.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);

    /// Draw a filled disc with a soft glow of `glow` pixels around it.
    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba, glow: f32);
}

/// A single recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
        width: f32,
    },
    Disc {
        center: Vec2,
        radius: f32,
        color: Rgba,
        glow: f32,
    },
}

/// Surface that records draw calls instead of rasterizing them.
///
/// `clear` drops everything recorded so far, so after a frame step the
/// recorder holds exactly that frame's commands.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl Recorder {
    /// Create a recorder of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Commands recorded since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Lines recorded since the last clear.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Discs recorded since the last clear.
    pub fn discs(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
    }

    /// Number of times the surface has been cleared.
    pub fn clear_count(&self) -> u64 {
        self.clears
    }
}

impl Surface for Recorder {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba, glow: f32) {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
            glow,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_clear_drops_commands() {
        let mut rec = Recorder::new(10, 10);
        rec.fill_disc(Vec2::new(1.0, 1.0), 2.0, Rgba::BLACK, 0.0);
        rec.stroke_line(Vec2::ZERO, Vec2::ONE, Rgba::BLACK, 1.0);
        assert_eq!(rec.commands().len(), 2);
        assert_eq!(rec.lines().count(), 1);
        assert_eq!(rec.discs().count(), 1);

        rec.clear();
        assert!(rec.commands().is_empty());
        assert_eq!(rec.clear_count(), 1);
    }

    #[test]
    fn test_recorder_resize() {
        let mut rec = Recorder::new(10, 10);
        rec.resize(30, 20);
        assert_eq!(rec.size(), (30, 20));
    }
}
