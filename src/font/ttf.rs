//! TrueType faces rendered with ab_glyph.
//!
//! Glyph coverage is anti-aliased; thermal heads print 1-bit, so a pixel is
//! black once its coverage reaches [`COVERAGE_THRESHOLD`].

use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};

use super::Typeface;
use crate::error::LabelError;
use crate::raster::RasterImage;

const COVERAGE_THRESHOLD: f32 = 0.5;

/// A scalable font fixed at one pixel height.
#[derive(Clone)]
pub struct TtfFace {
    font: FontArc,
    pixel_height: f32,
}

impl std::fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFace")
            .field("pixel_height", &self.pixel_height)
            .finish()
    }
}

impl TtfFace {
    pub fn from_bytes(bytes: Vec<u8>, pixel_height: f32) -> Result<Self, LabelError> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| LabelError::Asset(format!("Invalid font data: {}", e)))?;
        Ok(Self { font, pixel_height })
    }

    /// Glyph ids with their caret positions, kerning applied.
    fn layout(&self, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(self.pixel_height);
        let mut glyphs = Vec::new();
        let mut caret_x = 0.0f32;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                caret_x += scaled.kern(prev, glyph_id);
            }
            glyphs.push((glyph_id, caret_x));
            caret_x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }

        (glyphs, caret_x)
    }
}

impl Typeface for TtfFace {
    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.pixel_height);
        (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32
    }

    fn measure(&self, text: &str) -> u32 {
        let (_, width) = self.layout(text);
        width.ceil() as u32
    }

    fn draw(&self, text: &str, image: &mut RasterImage, x: u32, y: u32) {
        let baseline_y = self.font.as_scaled(self.pixel_height).ascent();
        let (glyphs, _) = self.layout(text);

        for (glyph_id, glyph_x) in glyphs {
            let glyph = glyph_id.with_scale_and_position(
                self.pixel_height,
                point(x as f32 + glyph_x, y as f32 + baseline_y),
            );

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    if coverage < COVERAGE_THRESHOLD {
                        return;
                    }
                    let gx = px as i64 + bounds.min.x as i64;
                    let gy = py as i64 + bounds.min.y as i64;
                    if gx >= 0 && gy >= 0 {
                        image.set(gx as u32, gy as u32, true);
                    }
                });
            }
        }
    }
}
