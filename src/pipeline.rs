//! # Label Service
//!
//! Wires the stages together:
//!
//! ```text
//! LabelRecord ─normalize─► CanonicalLabel ─layout─► LayoutPlan ─render─► RasterImage
//!                                                                          │
//!                                                   preview: PNG ◄─────────┤
//!                                                   print: ESC/POS ─► TCP ◄┘
//! ```
//!
//! The service owns nothing mutable; one instance is shared by all request
//! handlers.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::LabelError;
use crate::font::LabelAssets;
use crate::layout::{LayoutEngine, LayoutPlan, DEFAULT_WIDTH};
use crate::normalize::{normalize, CanonicalLabel};
use crate::raster::RasterImage;
use crate::record::{LabelRecord, QuantityUnit, Scalar, StockEntry};
use crate::render::Renderer;
use crate::transport::{Connector, NetworkPrinter};

/// Record → label pipeline bound to one set of fonts and one output width.
#[derive(Debug, Clone)]
pub struct LabelService {
    assets: Arc<LabelAssets>,
    width: u32,
}

impl LabelService {
    pub fn new(assets: Arc<LabelAssets>, width: u32) -> Self {
        Self { assets, width }
    }

    /// Built-in fonts at the default 384 dot width.
    pub fn builtin() -> Result<Self, LabelError> {
        Ok(Self::new(Arc::new(LabelAssets::builtin()?), DEFAULT_WIDTH))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn assets(&self) -> &LabelAssets {
        &self.assets
    }

    pub fn canonicalize(&self, record: &LabelRecord) -> Result<CanonicalLabel, LabelError> {
        normalize(record)
    }

    pub fn plan(&self, label: &CanonicalLabel) -> LayoutPlan {
        LayoutEngine::new(&self.assets).layout(label, self.width)
    }

    /// Normalize, lay out and render a record.
    pub fn render(&self, record: &LabelRecord) -> Result<RasterImage, LabelError> {
        let label = self.canonicalize(record)?;
        let plan = self.plan(&label);
        Renderer::new(&self.assets).render(&plan)
    }

    /// Render a record to PNG bytes without printing.
    #[instrument(skip(self, record))]
    pub fn preview_png(&self, record: &LabelRecord) -> Result<Vec<u8>, LabelError> {
        self.render(record)?.to_png()
    }

    /// Render a record and send it to `printer`.
    #[instrument(skip(self, record, printer), fields(endpoint = %printer.endpoint()))]
    pub fn print<C: Connector>(
        &self,
        record: &LabelRecord,
        printer: &NetworkPrinter<C>,
    ) -> Result<(), LabelError> {
        let image = self.render(record)?;
        printer.transmit(&image)?;
        info!(height = image.height(), "label printed");
        Ok(())
    }
}

/// The record printed by the test endpoint.
pub fn sample_record() -> LabelRecord {
    LabelRecord {
        product: Some(Scalar::Text("Test Product".to_string())),
        grocycode: Some(Scalar::Text("12345".to_string())),
        stock_entry: Some(StockEntry {
            amount: Some(Scalar::Number(2.0)),
            best_before_date: Some("2024-12-31".to_string()),
            purchased_date: Some("2024-10-05".to_string()),
        }),
        quantity_unit_stock: Some(QuantityUnit {
            name: Some("piece".to_string()),
            name_plural: Some("pieces".to_string()),
        }),
        ..Default::default()
    }
}
