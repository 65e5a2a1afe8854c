//! # Font Assets
//!
//! Typefaces used to measure and draw label text. Two tiers exist:
//!
//! | Tier | Used for | Built-in face | TTF size |
//! |------|----------|---------------|----------|
//! | [`FontTier::Large`] | product name | Spleen 12×24, scaled ×2 (24×48) | 48 px |
//! | [`FontTier::Medium`] | quantity and dates | Spleen 8×16, scaled ×2 (16×32) | 32 px |
//!
//! [`LabelAssets`] is built once at startup and then only read, so it can be
//! shared between request handlers through an `Arc` without locking.

mod bitmap;
mod ttf;

pub use bitmap::BitmapFace;
pub use ttf::TtfFace;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::LabelError;
use crate::raster::RasterImage;

/// Pixel height of the large tier for TrueType faces.
pub const LARGE_PIXEL_HEIGHT: f32 = 48.0;
/// Pixel height of the medium tier for TrueType faces.
pub const MEDIUM_PIXEL_HEIGHT: f32 = 32.0;

/// Font size class of a text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontTier {
    Large,
    Medium,
}

/// A face at a fixed size that can measure and draw one line of text.
pub trait Typeface: Send + Sync {
    /// Height of one line in dots.
    fn line_height(&self) -> u32;

    /// Advance width of `text` in dots.
    fn measure(&self, text: &str) -> u32;

    /// Draw `text` with its top-left corner at (`x`, `y`). Pixels falling
    /// outside the image are dropped.
    fn draw(&self, text: &str, image: &mut RasterImage, x: u32, y: u32);
}

/// Read-only font service injected into the layout engine and the renderer.
#[derive(Clone)]
pub struct LabelAssets {
    large: Arc<dyn Typeface>,
    medium: Arc<dyn Typeface>,
}

impl std::fmt::Debug for LabelAssets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelAssets")
            .field("large_line_height", &self.large.line_height())
            .field("medium_line_height", &self.medium.line_height())
            .finish()
    }
}

impl LabelAssets {
    /// Assemble assets from two faces.
    pub fn new(large: Arc<dyn Typeface>, medium: Arc<dyn Typeface>) -> Self {
        Self { large, medium }
    }

    /// Bitmap faces compiled into the binary.
    pub fn builtin() -> Result<Self, LabelError> {
        let large = BitmapFace::spleen_12x24(2)?;
        let medium = BitmapFace::spleen_8x16(2)?;
        info!("loaded built-in Spleen bitmap fonts");
        Ok(Self::new(Arc::new(large), Arc::new(medium)))
    }

    /// Load a TrueType/OpenType font file for both tiers.
    pub fn from_font_file(path: &Path) -> Result<Self, LabelError> {
        let bytes = std::fs::read(path).map_err(|e| {
            LabelError::Asset(format!("Failed to read font {}: {}", path.display(), e))
        })?;
        let large = TtfFace::from_bytes(bytes.clone(), LARGE_PIXEL_HEIGHT)?;
        let medium = TtfFace::from_bytes(bytes, MEDIUM_PIXEL_HEIGHT)?;
        info!(path = %path.display(), "loaded TrueType font");
        Ok(Self::new(Arc::new(large), Arc::new(medium)))
    }

    /// Built-in faces, or the font at `path` when one is configured.
    pub fn load(path: Option<&Path>) -> Result<Self, LabelError> {
        match path {
            Some(path) => Self::from_font_file(path),
            None => Self::builtin(),
        }
    }

    pub fn face(&self, tier: FontTier) -> &dyn Typeface {
        match tier {
            FontTier::Large => self.large.as_ref(),
            FontTier::Medium => self.medium.as_ref(),
        }
    }
}
