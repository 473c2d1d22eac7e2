//! Software renderer for headless screenshot generation.
//!
//! Executes a `DisplayList` to a pixel buffer using fontdue for text rasterization.
//!
//! # Architecture
//!
//! The renderer is the final stage in the pipeline:
//!
//! ```text
//! Style → Layout → Paint → Render
//!                    ↓        ↓
//!              DisplayList → Pixels
//! ```
//!
//! The renderer knows nothing about CSS, layout, or the DOM. It is a
//! [`Surface`]: it only knows how to fill rectangles and draw words at
//! viewport coordinates.

use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use wren_css::{ColorValue, DisplayList, FontKey, MAX_FONT_SIZE_PX, Surface};

use crate::font_metrics::SystemFonts;

/// Software renderer that executes a display list to a pixel buffer.
pub struct Renderer {
    /// RGBA pixel buffer
    buffer: RgbaImage,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Faces used for glyph rasterization.
    fonts: SystemFonts,
}

impl Renderer {
    /// Create a white canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32, fonts: SystemFonts) -> Self {
        Self {
            buffer: ImageBuffer::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            width,
            height,
            fonts,
        }
    }

    /// Clear to white, then execute every command of `display_list` that is
    /// visible with the page scrolled down by `scroll` pixels.
    ///
    /// Commands are executed in order (back to front), which is the correct
    /// painting order established by the painter.
    pub fn render(&mut self, display_list: &DisplayList, scroll: f32) {
        for pixel in self.buffer.pixels_mut() {
            *pixel = Rgba([255, 255, 255, 255]);
        }
        display_list.execute_visible(scroll, self.height as f32, self);
    }

    /// The rendered pixels.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Save the rendered image to a file. The format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be saved to the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .with_context(|| format!("failed to save screenshot to '{}'", path.display()))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn blend_pixel(&mut self, px: i64, py: i64, color: ColorValue, coverage: u8) {
        if px < 0 || py < 0 || px >= i64::from(self.width) || py >= i64::from(self.height) {
            return;
        }
        let (px, py) = (px as u32, py as u32);
        let alpha = ((u16::from(color.a) * u16::from(coverage)) / 255) as u8;
        if alpha == 0 {
            return;
        }
        let fg = Rgba([color.r, color.g, color.b, 255]);
        if alpha == 255 {
            self.buffer.put_pixel(px, py, fg);
        } else {
            let bg = *self.buffer.get_pixel(px, py);
            self.buffer.put_pixel(px, py, alpha_blend(fg, bg, alpha));
        }
    }
}

impl Surface for Renderer {
    /// Fill a rectangle with the given color.
    #[allow(clippy::cast_possible_truncation)]
    fn fill_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32, color: ColorValue) {
        let x0 = (left.round() as i64).max(0);
        let y0 = (top.round() as i64).max(0);
        let x1 = (right.round() as i64).min(i64::from(self.width));
        let y1 = (bottom.round() as i64).min(i64::from(self.height));

        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, 255);
            }
        }
    }

    /// Draw a word with its top-left corner at `(left, top)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw_text(&mut self, left: f32, top: f32, text: &str, font: FontKey, color: ColorValue) {
        let Some(face) = self.fonts.select(font.weight, font.style) else {
            return;
        };
        // Keys built by hand can skip the clamp in `FontKey::new`.
        let size = font.size.min(MAX_FONT_SIZE_PX) as f32;
        let ascent = face
            .horizontal_line_metrics(size)
            .map_or(size * 0.8, |m| m.ascent);
        let baseline = top + ascent;
        let mut cursor_x = left;

        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let (metrics, bitmap) = face.rasterize(ch, size);

            // fontdue gives the bitmap offset from the pen position, with
            // y measured upward from the baseline.
            let glyph_x = cursor_x.round() as i64 + i64::from(metrics.xmin);
            let glyph_y = baseline.round() as i64
                - i64::from(metrics.ymin)
                - metrics.height as i64;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage > 0 {
                        let (px, py) = (glyph_x + gx as i64, glyph_y + gy as i64);
                        self.blend_pixel(px, py, color, coverage);
                    }
                }
            }

            cursor_x += metrics.advance_width;
        }
    }
}

/// Alpha blend a foreground color onto a background color.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ])
}
