//! Bitmap faces built from the Spleen PSF2 fonts.
//!
//! Glyphs are looked up on demand from the font data compiled into the
//! binary and scaled by an integer factor with nearest-neighbor sampling, so
//! strokes stay crisp on a 203 DPI head.

use spleen_font::{PSF2Font, FONT_12X24, FONT_8X16};

use super::Typeface;
use crate::error::LabelError;
use crate::raster::RasterImage;

/// Fixed-cell bitmap face.
#[derive(Debug, Clone)]
pub struct BitmapFace {
    data: &'static [u8],
    cell_width: u32,
    cell_height: u32,
    scale: u32,
}

impl BitmapFace {
    /// Wrap PSF2 font data whose cells are `cell_width` × `cell_height`.
    pub fn new(
        data: &'static [u8],
        cell_width: u32,
        cell_height: u32,
        scale: u32,
    ) -> Result<Self, LabelError> {
        if PSF2Font::new(data).is_err() {
            return Err(LabelError::Asset(format!(
                "Invalid PSF2 font data for {}x{} face",
                cell_width, cell_height
            )));
        }
        if scale == 0 {
            return Err(LabelError::Asset("Font scale must be at least 1".to_string()));
        }
        Ok(Self {
            data,
            cell_width,
            cell_height,
            scale,
        })
    }

    pub fn spleen_12x24(scale: u32) -> Result<Self, LabelError> {
        Self::new(FONT_12X24, 12, 24, scale)
    }

    pub fn spleen_8x16(scale: u32) -> Result<Self, LabelError> {
        Self::new(FONT_8X16, 8, 16, scale)
    }

    fn advance(&self) -> u32 {
        self.cell_width * self.scale
    }

    /// Unscaled glyph bitmap, row-major, `true` = black.
    fn glyph(&self, ch: char) -> Vec<bool> {
        let w = self.cell_width as usize;
        let h = self.cell_height as usize;
        let mut glyph = vec![false; w * h];

        let mut utf8 = [0u8; 4];
        let found = match PSF2Font::new(self.data) {
            Ok(mut font) => match font.glyph_for_utf8(ch.encode_utf8(&mut utf8).as_bytes()) {
                Some(rows) => {
                    for (row_y, row) in rows.enumerate() {
                        for (col_x, on) in row.enumerate() {
                            if row_y < h && col_x < w {
                                glyph[row_y * w + col_x] = on;
                            }
                        }
                    }
                    true
                }
                None => false,
            },
            Err(_) => false,
        };

        if !found && !ch.is_whitespace() {
            draw_box(&mut glyph, w, h);
        }
        glyph
    }
}

impl Typeface for BitmapFace {
    fn line_height(&self) -> u32 {
        self.cell_height * self.scale
    }

    fn measure(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance()
    }

    fn draw(&self, text: &str, image: &mut RasterImage, x: u32, y: u32) {
        let w = self.cell_width;
        let s = self.scale;

        for (i, ch) in text.chars().enumerate() {
            let origin_x = x + i as u32 * self.advance();
            if origin_x >= image.width() {
                break;
            }
            let glyph = self.glyph(ch);
            for (idx, _) in glyph.iter().enumerate().filter(|&(_, &on)| on) {
                let gx = idx as u32 % w;
                let gy = idx as u32 / w;
                image.fill_rect(origin_x + gx * s, y + gy * s, s, s);
            }
        }
    }
}

/// Outline box used for characters the font does not cover.
fn draw_box(glyph: &mut [bool], width: usize, height: usize) {
    for x in 1..width - 1 {
        glyph[2 * width + x] = true;
        glyph[(height - 3) * width + x] = true;
    }
    for y in 2..height - 2 {
        glyph[y * width + 1] = true;
        glyph[y * width + width - 2] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let face = BitmapFace::spleen_12x24(2).unwrap();
        assert_eq!(face.line_height(), 48);
        assert_eq!(face.measure("Milk"), 96);
        assert_eq!(face.measure(""), 0);
    }

    #[test]
    fn test_measure_counts_chars_not_bytes() {
        let face = BitmapFace::spleen_8x16(1).unwrap();
        assert_eq!(face.measure("Käse"), 32);
    }

    #[test]
    fn test_glyph_has_ink() {
        let face = BitmapFace::spleen_12x24(1).unwrap();
        assert!(face.glyph('A').iter().any(|&on| on));
        assert!(!face.glyph(' ').iter().any(|&on| on));
    }

    #[test]
    fn test_unknown_char_draws_box() {
        let face = BitmapFace::spleen_8x16(1).unwrap();
        let glyph = face.glyph('\u{10FFFD}');
        assert!(glyph.iter().any(|&on| on));
    }

    #[test]
    fn test_draw_scaled() {
        let face = BitmapFace::spleen_8x16(2).unwrap();
        let mut img = RasterImage::new(64, 32);
        face.draw("I", &mut img, 0, 0);

        let ink = img.count_black();
        assert!(ink > 0);
        // Every lit source pixel becomes a 2x2 block
        assert_eq!(ink % 4, 0);
        // Nothing beyond the first cell
        for y in 0..32 {
            for x in 16..64 {
                assert!(!img.get(x, y));
            }
        }
    }

    #[test]
    fn test_draw_clips_at_edge() {
        let face = BitmapFace::spleen_12x24(2).unwrap();
        let mut img = RasterImage::new(30, 48);
        face.draw("WWWW", &mut img, 0, 0);
        assert!(img.count_black() > 0);
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(BitmapFace::spleen_8x16(0).is_err());
    }
}
