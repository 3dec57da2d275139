//! Software rasterizer surface.
//!
//! [`Pixmap`] draws the field into an RGBA8 buffer on the CPU. The native
//! preview uploads that buffer to a GPU texture each frame, and headless runs
//! export it to PNG.

use crate::error::ExportError;
use crate::surface::Surface;
use crate::visuals::Rgba;
use glam::Vec2;
use std::path::Path;

/// Share of the particle alpha used at the inner edge of its glow halo.
const GLOW_INTENSITY: f32 = 0.35;

/// An RGBA8 pixel buffer that implements [`Surface`].
///
/// Drawing uses straight-alpha source-over blending with anti-aliased edges.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    background: Rgba,
    pixels: Vec<[u8; 4]>,
}

impl Pixmap {
    /// Create a transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Rgba::TRANSPARENT)
    }

    /// Create a pixmap that clears to `background`.
    pub fn with_background(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background.to_rgba8(); (width as usize) * (height as usize)],
        }
    }

    /// Color `clear` fills with.
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Raw pixel bytes, row-major RGBA8.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Copy into an `image` buffer.
    pub fn to_image(&self) -> Result<image::RgbaImage, ExportError> {
        let bytes = self.as_bytes().to_vec();
        let len = bytes.len();
        image::RgbaImage::from_raw(self.width, self.height, bytes).ok_or(ExportError::BufferSize {
            width: self.width,
            height: self.height,
            len,
        })
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let img = self.to_image()?;
        img.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Blend `color` scaled by `coverage` over the pixel at `(x, y)`.
    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let sa = (color.a * coverage).clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + x as usize;
        let dst = self.pixels[idx];
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let channel = |s: f32, d: u8| {
            let d = d as f32 / 255.0;
            ((s * sa + d * da * (1.0 - sa)) / out_a * 255.0).round().clamp(0.0, 255.0) as u8
        };
        self.pixels[idx] = [
            channel(color.r, dst[0]),
            channel(color.g, dst[1]),
            channel(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ];
    }

    /// Pixel bounds `[x0, x1] x [y0, y1]` of a box, clipped to the buffer.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(i64, i64, i64, i64)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }
}

impl Surface for Pixmap {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![self.background.to_rgba8(); (width as usize) * (height as usize)];
    }

    fn clear(&mut self) {
        let bg = self.background.to_rgba8();
        self.pixels.fill(bg);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        let half = (width * 0.5).max(0.5);
        let pad = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(from.min(to) - pad, from.max(to) + pad) else {
            return;
        };
        let seg = to - from;
        let len_sq = seg.length_squared();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dist = p.distance(from + seg * t);
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba, glow: f32) {
        let glow = glow.max(0.0);
        let reach = radius + glow + 1.0;
        let Some((x0, y0, x1, y1)) = self.clip(center - Vec2::splat(reach), center + Vec2::splat(reach)) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let dist = p.distance(center);
                let body = (radius + 0.5 - dist).clamp(0.0, 1.0);
                let halo = if glow > 0.0 && dist > radius {
                    let t = (1.0 - (dist - radius) / glow).clamp(0.0, 1.0);
                    t * t * GLOW_INTENSITY
                } else {
                    0.0
                };
                let coverage = body.max(halo);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_every_pixel() {
        let bg = Rgba::rgb8(10, 14, 39, 1.0);
        let mut pix = Pixmap::with_background(8, 8, bg);
        pix.fill_disc(Vec2::new(4.0, 4.0), 3.0, Rgba::rgb8(255, 0, 0, 1.0), 0.0);
        pix.clear();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(pix.pixel(x, y), Some(bg.to_rgba8()));
            }
        }
    }

    #[test]
    fn test_disc_colors_center() {
        let mut pix = Pixmap::with_background(16, 16, Rgba::BLACK);
        pix.fill_disc(Vec2::new(8.0, 8.0), 3.0, Rgba::rgb8(0, 212, 255, 1.0), 4.0);
        assert_eq!(pix.pixel(8, 8), Some([0, 212, 255, 255]));
        // Far corner stays untouched.
        assert_eq!(pix.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_line_covers_midpoint() {
        let mut pix = Pixmap::new(20, 5);
        pix.stroke_line(Vec2::new(0.0, 2.5), Vec2::new(20.0, 2.5), Rgba::rgb8(74, 158, 255, 0.5), 1.0);
        let mid = pix.pixel(10, 2).unwrap();
        assert!(mid[3] > 0);
        assert_eq!(pix.pixel(10, 0).unwrap()[3], 0);
    }

    #[test]
    fn test_zero_sized_accepts_everything() {
        let mut pix = Pixmap::new(0, 0);
        pix.clear();
        pix.fill_disc(Vec2::ZERO, 5.0, Rgba::BLACK, 10.0);
        pix.stroke_line(Vec2::ZERO, Vec2::ONE, Rgba::BLACK, 1.0);
        assert!(pix.as_bytes().is_empty());
        assert!(pix.pixel(0, 0).is_none());
    }

    #[test]
    fn test_resize_and_export() {
        let mut pix = Pixmap::new(4, 4);
        pix.resize(6, 3);
        assert_eq!(pix.size(), (6, 3));
        assert_eq!(pix.as_bytes().len(), 6 * 3 * 4);
        let img = pix.to_image().unwrap();
        assert_eq!(img.dimensions(), (6, 3));
    }
}
