//! Server state and configuration.

use crate::pipeline::LabelService;
use crate::transport::NetworkPrinter;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:5000")
    pub listen_addr: String,
}

/// Application state shared across handlers. Read-only after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: LabelService,
    pub printer: NetworkPrinter,
}

impl AppState {
    pub fn new(service: LabelService, printer: NetworkPrinter) -> Self {
        Self { service, printer }
    }
}
