//! Service status.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::super::state::AppState;

pub const SERVICE_NAME: &str = "Grocy Thermal Label Server";

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    /// Also check that the printer accepts connections
    #[serde(default)]
    pub probe: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    pub printer: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub printer_online: Option<bool>,
}

/// Handle GET / - report the configured printer.
pub async fn status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Json<StatusResponse> {
    let printer_online = if query.probe {
        let probe_state = state.clone();
        let reachable = tokio::task::spawn_blocking(move || probe_state.printer.probe())
            .await
            .map_err(|e| e.to_string())
            .and_then(|result| result.map_err(|e| e.to_string()));
        if let Err(e) = &reachable {
            warn!(error = %e, "printer probe failed");
        }
        Some(reachable.is_ok())
    } else {
        None
    };

    Json(StatusResponse {
        status: "running".to_string(),
        printer: state.printer.endpoint().to_string(),
        service: SERVICE_NAME.to_string(),
        printer_online,
    })
}
