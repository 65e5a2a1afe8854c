//! # ESC/POS Protocol
//!
//! Byte-level command builders for the ESC/POS subset a network label
//! printer needs: reset, raster bitmap, feed and cut.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control commands (init, feed, cut)
//! - [`graphics`]: `GS v 0` raster bitmap commands
//!
//! ## Job Layout
//!
//! A print job is a single byte stream:
//!
//! ```text
//! ESC @                      reset
//! GS v 0 ... (one per band)  label bitmap, top to bottom
//! ESC d n                    feed past the tear bar
//! GS V 66 0                  full cut (optional)
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use grocy_label::protocol::{self, JobOptions};
//! use grocy_label::raster::RasterImage;
//!
//! let image = RasterImage::new(384, 40);
//! let bytes = protocol::job(&image, &JobOptions::default());
//!
//! assert_eq!(&bytes[0..2], &[0x1B, 0x40]);
//! assert_eq!(&bytes[bytes.len() - 4..], &[0x1D, 0x56, 0x42, 0]);
//! ```

pub mod commands;
pub mod graphics;

use crate::raster::RasterImage;

/// Lines fed after the bitmap by default.
pub const DEFAULT_FEED_LINES: u8 = 4;

/// Trailer settings for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    /// Lines to feed after the bitmap
    pub feed_lines: u8,
    /// Whether to send a full cut after feeding
    pub cut: bool,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            feed_lines: DEFAULT_FEED_LINES,
            cut: true,
        }
    }
}

/// Build the complete byte stream for one label.
pub fn job(image: &RasterImage, options: &JobOptions) -> Vec<u8> {
    let mut data = Vec::with_capacity(image.data().len() + 64);
    data.extend(commands::init());
    data.extend(graphics::raster_bands(image, graphics::MAX_BAND_ROWS));
    data.extend(commands::feed_lines(options.feed_lines));
    if options.cut {
        data.extend(commands::cut_after_feed(0));
    }
    data
}
