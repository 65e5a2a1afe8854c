//! # Raster Images
//!
//! A 1-bit bitmap in the printer's native layout.
//!
//! ## Bit Packing
//!
//! Rows are stored top to bottom, each padded to a whole number of bytes:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! width = 12 dots → 2 bytes per row
//!
//! byte 0     byte 1
//! ████░░░░   ██░░····   (· = padding, always 0)
//! ```
//!
//! This is exactly the data block of the `GS v 0` raster command, so the
//! transport sends [`RasterImage::data`] without conversion.

use image::{GrayImage, ImageEncoder, Luma};

use crate::error::LabelError;

/// Monochrome bitmap, origin top-left.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl RasterImage {
    /// Create an all-white image.
    pub fn new(width: u32, height: u32) -> Self {
        let width_bytes = width.div_ceil(8) as usize;
        Self {
            width,
            height,
            data: vec![0; width_bytes * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, including padding.
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    /// Packed pixel data, `width_bytes() * height` bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Packed data for rows `start..end`.
    pub fn rows(&self, start: u32, end: u32) -> &[u8] {
        let wb = self.width_bytes();
        let end = end.min(self.height) as usize;
        let start = (start as usize).min(end);
        &self.data[start * wb..end * wb]
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * self.width_bytes() + (x / 8) as usize;
        (self.data[idx] >> (7 - (x % 8))) & 1 == 1
    }

    /// Set a pixel. Coordinates outside the image are ignored.
    pub fn set(&mut self, x: u32, y: u32, black: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.width_bytes() + (x / 8) as usize;
        let mask = 1u8 << (7 - (x % 8));
        if black {
            self.data[idx] |= mask;
        } else {
            self.data[idx] &= !mask;
        }
    }

    /// Fill a rectangle with black, clipped to the image.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        for py in y..y.saturating_add(h).min(self.height) {
            for px in x..x.saturating_add(w).min(self.width) {
                self.set(px, py, true);
            }
        }
    }

    /// Draw a rectangle outline `thickness` dots wide.
    pub fn stroke_rect(&mut self, x: u32, y: u32, w: u32, h: u32, thickness: u32) {
        let t = thickness.min(w / 2).min(h / 2).max(1);
        self.fill_rect(x, y, w, t);
        self.fill_rect(x, (y + h).saturating_sub(t), w, t);
        self.fill_rect(x, y, t, h);
        self.fill_rect((x + w).saturating_sub(t), y, t, h);
    }

    /// Number of black pixels.
    pub fn count_black(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Whether any pixel in rows `start..end` is black.
    pub fn has_ink(&self, start: u32, end: u32) -> bool {
        self.rows(start, end).iter().any(|&b| b != 0)
    }

    /// Convert to an 8-bit grayscale image (black = 0, white = 255).
    pub fn to_gray_image(&self) -> GrayImage {
        let mut img = GrayImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let color = if self.get(x, y) { 0u8 } else { 255u8 };
                img.put_pixel(x, y, Luma([color]));
            }
        }
        img
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, LabelError> {
        let img = self.to_gray_image();

        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                img.as_raw(),
                self.width,
                self.height,
                image::ExtendedColorType::L8,
            )
            .map_err(|e: image::ImageError| LabelError::Image(e.to_string()))?;

        Ok(png_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_white() {
        let img = RasterImage::new(384, 10);
        assert_eq!(img.width_bytes(), 48);
        assert_eq!(img.data().len(), 48 * 10);
        assert_eq!(img.count_black(), 0);
    }

    #[test]
    fn test_width_padding() {
        let img = RasterImage::new(12, 3);
        assert_eq!(img.width_bytes(), 2);
        assert_eq!(img.data().len(), 6);
    }

    #[test]
    fn test_bit_order_msb_left() {
        let mut img = RasterImage::new(16, 1);
        img.set(0, 0, true);
        img.set(9, 0, true);
        assert_eq!(img.data(), &[0x80, 0x40]);
        assert!(img.get(0, 0));
        assert!(!img.get(1, 0));

        img.set(0, 0, false);
        assert_eq!(img.data(), &[0x00, 0x40]);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut img = RasterImage::new(8, 2);
        img.set(8, 0, true);
        img.set(0, 2, true);
        assert_eq!(img.count_black(), 0);
        assert!(!img.get(100, 100));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut img = RasterImage::new(10, 10);
        img.fill_rect(8, 8, 5, 5);
        assert_eq!(img.count_black(), 4);
    }

    #[test]
    fn test_stroke_rect() {
        let mut img = RasterImage::new(10, 10);
        img.stroke_rect(0, 0, 10, 10, 1);
        assert_eq!(img.count_black(), 36);
        assert!(!img.get(5, 5));
    }

    #[test]
    fn test_rows_slice() {
        let mut img = RasterImage::new(8, 4);
        img.set(0, 2, true);
        assert_eq!(img.rows(2, 3), &[0x80]);
        assert_eq!(img.rows(3, 10), &[0x00]);
        assert!(img.has_ink(0, 4));
        assert!(!img.has_ink(3, 4));
    }

    #[test]
    fn test_png_encoding() {
        let mut img = RasterImage::new(20, 5);
        img.fill_rect(0, 0, 10, 5);
        let png = img.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (20, 5));
        assert_eq!(decoded.get_pixel(0, 0)[0], 0);
        assert_eq!(decoded.get_pixel(15, 0)[0], 255);
    }
}
