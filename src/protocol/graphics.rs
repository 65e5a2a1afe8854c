//! # ESC/POS Raster Graphics
//!
//! Bitmaps are printed with the raster bit image command `GS v 0`.
//!
//! ## Coordinate System
//!
//! ```text
//! (0,0) ──────────────────────► X (horizontal, 384 dots on 58 mm paper)
//!   │
//!   │   ████████  ← Each dot is ~0.125mm (203 DPI)
//!   │   ████████
//!   ▼
//!   Y (vertical, paper feed direction)
//! ```
//!
//! ## Bit Packing
//!
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! This matches [`crate::raster::RasterImage`], so image data is copied as-is.
//!
//! ## Bands
//!
//! Many printers only buffer a limited number of raster rows per command.
//! Tall labels are therefore sent as consecutive bands of at most
//! [`MAX_BAND_ROWS`] rows; bands print back to back without a gap.

use super::commands::{GS, u16_le};
use crate::raster::RasterImage;

/// Maximum rows sent in one `GS v 0` command.
pub const MAX_BAND_ROWS: u32 = 256;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Scaling mode (0 = normal density)
/// - `xL, xH`: Width in **bytes**, little-endian
/// - `yL, yH`: Height in dots, little-endian
/// - `d1...dk`: Image data, k = width_bytes × height
///
/// ## Example
///
/// ```
/// use grocy_label::protocol::graphics;
///
/// // 384 dots (48 bytes) wide, 10 rows tall
/// let data = vec![0xAA; 48 * 10];
/// let cmd = graphics::raster(384, 10, &data);
///
/// assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0]);
/// assert_eq!(cmd[4], 48); // xL
/// assert_eq!(cmd[5], 0);  // xH
/// assert_eq!(cmd[6], 10); // yL
/// assert_eq!(cmd[7], 0);  // yH
/// assert_eq!(cmd.len(), 8 + 48 * 10);
/// ```
pub fn raster(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8);

    debug_assert!(
        data.len() == width_bytes as usize * height as usize,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        width_bytes as usize * height as usize,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.push(GS);
    cmd.push(b'v');
    cmd.push(b'0');
    cmd.push(0); // m = 0 (normal)
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(data);
    cmd
}

/// Encode a whole image as consecutive `GS v 0` bands of at most
/// `max_rows` rows each.
///
/// An image with zero rows produces no commands.
pub fn raster_bands(image: &RasterImage, max_rows: u32) -> Vec<u8> {
    let max_rows = max_rows.clamp(1, u16::MAX as u32);
    let width = image.width().min(u16::MAX as u32) as u16;

    let mut out = Vec::with_capacity(image.data().len() + 8 * image.height().div_ceil(max_rows) as usize);
    let mut start = 0;
    while start < image.height() {
        let end = (start + max_rows).min(image.height());
        out.extend(raster(width, (end - start) as u16, image.rows(start, end)));
        start = end;
    }
    out
}
