//! Label printing and preview handlers.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use super::super::extract::LabelPayload;
use super::super::state::AppState;
use super::{require_data, ApiError};
use crate::error::LabelError;
use crate::pipeline::sample_record;
use crate::record::LabelRecord;

/// Render and print on a blocking thread; socket I/O must not stall the runtime.
async fn print_blocking(state: Arc<AppState>, record: LabelRecord) -> Result<(), LabelError> {
    join_print(tokio::task::spawn_blocking(move || state.service.print(&record, &state.printer)).await)
}

/// Flatten a finished print task. A panic or cancellation is reported as
/// [`LabelError::Task`].
fn join_print(
    joined: Result<Result<(), LabelError>, tokio::task::JoinError>,
) -> Result<(), LabelError> {
    joined.unwrap_or_else(|e| {
        error!(error = %e, "print task did not complete");
        Err(LabelError::Task(e.to_string()))
    })
}

/// Handle POST /print - print a label from Grocy data.
pub async fn print(
    State(state): State<Arc<AppState>>,
    LabelPayload(record): LabelPayload,
) -> Result<&'static str, ApiError> {
    info!(?record, "print requested");
    require_data(&record)?;

    print_blocking(state, record).await.map_err(|e| {
        error!(error = %e, "print failed");
        ApiError::from_label_error(&e, "Print failed")
    })?;

    Ok("OK")
}

/// Handle GET|POST /image - render a label as PNG without printing.
pub async fn image(
    State(state): State<Arc<AppState>>,
    LabelPayload(record): LabelPayload,
) -> Result<Response, ApiError> {
    require_data(&record)?;

    let png = state.service.preview_png(&record).map_err(|e| {
        error!(error = %e, "preview failed");
        ApiError::from_label_error(&e, format!("Error: {}", e))
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Handle GET /test - print a built-in sample label.
pub async fn test_label(State(state): State<Arc<AppState>>) -> Response {
    match print_blocking(state, sample_record()).await {
        Ok(()) => Json(json!({"status": "success", "message": "Test label printed"})).into_response(),
        Err(e) => {
            error!(error = %e, "test print failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": "Print failed"})),
            )
                .into_response()
        }
    }
}
