//! # grocy-label - Grocy Labels on Network Thermal Printers
//!
//! Turns Grocy's label webhook payloads into printed labels on ESC/POS
//! network printers (raw TCP, port 9100). It provides:
//!
//! - **Normalization**: lenient Grocy records into a strict label model
//! - **Layout**: QR block, word-wrapped title and detail lines
//! - **Rendering**: 1-bit raster with QR symbol and bitmap or TrueType text
//! - **Transport**: ESC/POS raster jobs over TCP
//! - **Server**: the HTTP endpoints Grocy calls
//!
//! ## Quick Start
//!
//! ```no_run
//! use grocy_label::{
//!     pipeline::LabelService,
//!     record::LabelRecord,
//!     transport::{NetworkPrinter, PrinterEndpoint},
//! };
//!
//! let record: LabelRecord = serde_json::from_str(r#"{
//!     "product": "Organic Whole Milk 2L",
//!     "grocycode": "grcy:p:42",
//!     "amount": "1",
//!     "qu_name": "bottle",
//!     "best_before_date": "2024-07-01"
//! }"#)?;
//!
//! let service = LabelService::builtin()?;
//! let printer = NetworkPrinter::new(PrinterEndpoint::new("192.168.1.100", 9100));
//! service.print(&record, &printer)?;
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`record`] | Loosely-typed input from Grocy |
//! | [`normalize`] | Field normalizer |
//! | [`font`] | Font assets |
//! | [`layout`] | Layout engine |
//! | [`render`] | Raster renderer |
//! | [`raster`] | 1-bit bitmaps and PNG export |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | TCP printer connections |
//! | [`pipeline`] | End-to-end label service |
//! | [`server`] | HTTP front end |
//! | [`config`] | CLI flags and environment |
//! | [`error`] | Error types |

pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod protocol;
pub mod raster;
pub mod record;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::{LabelError, TransportError};
pub use pipeline::LabelService;
pub use record::LabelRecord;
pub use transport::{NetworkPrinter, PrinterEndpoint};
