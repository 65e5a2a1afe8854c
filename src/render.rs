//! # Raster Renderer
//!
//! Draws a [`LayoutPlan`] into a [`RasterImage`]. The image is built by
//! folding over the plan's blocks; text is drawn exactly as the layout
//! engine broke and measured it.
//!
//! ## QR Symbols
//!
//! Symbols use error correction level L and a one-module quiet zone. Modules
//! are scaled by the largest integer factor that fits the reserved block and
//! the symbol is centered inside it, so every module has the same size on
//! paper. A label without a grocycode gets an empty outlined block instead.

use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::error::LabelError;
use crate::font::LabelAssets;
use crate::layout::{Block, LayoutPlan, QrBlock, TextLine};
use crate::raster::RasterImage;

/// Quiet zone around the symbol, in modules.
pub const QR_QUIET_ZONE: u32 = 1;

/// Outline thickness of the placeholder drawn when there is no payload.
const PLACEHOLDER_STROKE: u32 = 2;

/// Renders plans with the injected fonts.
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    assets: &'a LabelAssets,
}

impl<'a> Renderer<'a> {
    pub fn new(assets: &'a LabelAssets) -> Self {
        Self { assets }
    }

    /// Render the plan into a new bitmap of exactly `plan.width × plan.height`.
    pub fn render(&self, plan: &LayoutPlan) -> Result<RasterImage, LabelError> {
        let image = plan
            .blocks
            .iter()
            .try_fold(RasterImage::new(plan.width, plan.height), |image, block| {
                self.draw_block(image, block)
            })?;

        debug!(
            width = image.width(),
            height = image.height(),
            black = image.count_black(),
            "rendered label"
        );
        Ok(image)
    }

    fn draw_block(&self, mut image: RasterImage, block: &Block) -> Result<RasterImage, LabelError> {
        match block {
            Block::Qr(qr) => draw_qr(&mut image, qr)?,
            Block::Line(line) => self.draw_line(&mut image, line),
        }
        Ok(image)
    }

    fn draw_line(&self, image: &mut RasterImage, line: &TextLine) {
        let face = self.assets.face(line.tier);
        let x = line.left(image.width());
        face.draw(&line.text, image, x, line.top);
    }
}

fn draw_qr(image: &mut RasterImage, block: &QrBlock) -> Result<(), LabelError> {
    if block.payload.is_empty() {
        image.stroke_rect(block.left, block.top, block.size, block.size, PLACEHOLDER_STROKE);
        return Ok(());
    }

    let code = QrCode::with_error_correction_level(block.payload.as_bytes(), EcLevel::L)
        .map_err(|e| LabelError::Asset(format!("QR code generation failed: {}", e)))?;

    let modules = code.width() as u32;
    let total = modules + 2 * QR_QUIET_ZONE;
    let cell = block.size / total;
    if cell == 0 {
        return Err(LabelError::Asset(format!(
            "QR code with {} modules does not fit a {} dot block",
            modules, block.size
        )));
    }

    let pad = (block.size - total * cell) / 2 + QR_QUIET_ZONE * cell;
    let origin_x = block.left + pad;
    let origin_y = block.top + pad;

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let qx = i as u32 % modules;
        let qy = i as u32 / modules;
        image.fill_rect(origin_x + qx * cell, origin_y + qy * cell, cell, cell);
    }

    Ok(())
}
