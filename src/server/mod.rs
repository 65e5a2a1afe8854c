//! # HTTP Server for Grocy Label Printing
//!
//! Grocy's "label printer webhook" posts label data to this server, which
//! renders the label and sends it to the network printer.
//!
//! ## Usage
//!
//! ```bash
//! PRINTER_HOST=192.168.1.50 grocy-label serve --port 5000
//! ```
//!
//! ## Endpoints
//!
//! | Route | Method | Response |
//! |-------|--------|----------|
//! | `/` | GET | status JSON (`?probe=true` also checks the printer) |
//! | `/print` | POST | `OK`, 400 on missing data or name, 500 `Print failed` |
//! | `/image` | GET, POST | `image/png` preview |
//! | `/test` | GET | prints a sample label |
//!
//! In Grocy, set the webhook URL to `http://<server>:5000/print` and enable
//! "Label printer: send JSON".

mod extract;
mod handlers;
mod state;

pub use extract::LabelPayload;
pub use handlers::status::{StatusResponse, SERVICE_NAME};
pub use handlers::ApiError;
pub use state::{AppState, ServerConfig};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the router. Separate from [`serve`] so tests can drive it directly.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::status::status))
        .route("/print", post(handlers::labels::print))
        .route(
            "/image",
            get(handlers::labels::image).post(handlers::labels::image),
        )
        .route("/test", get(handlers::labels::test_label))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
///
/// ## Example
///
/// ```no_run
/// use grocy_label::pipeline::LabelService;
/// use grocy_label::server::{serve, AppState, ServerConfig};
/// use grocy_label::transport::{NetworkPrinter, PrinterEndpoint};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:5000".to_string(),
/// };
/// let state = AppState::new(
///     LabelService::builtin()?,
///     NetworkPrinter::new(PrinterEndpoint::new("192.168.1.100", 9100)),
/// );
///
/// serve(config, state).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, state: AppState) -> std::io::Result<()> {
    let printer = state.printer.endpoint().to_string();
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(listen = %config.listen_addr, %printer, "label server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
