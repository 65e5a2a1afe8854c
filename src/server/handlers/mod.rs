//! HTTP request handlers.
//!
//! Bodies are plain text (`OK`, error messages) or PNG, except for the
//! status and test endpoints which answer JSON. Grocy only checks the status
//! code.

pub mod labels;
pub mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::LabelError;
use crate::record::LabelRecord;

/// A status code with a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Map a pipeline error: bad input is the caller's fault, everything
    /// else is reported as `server_message`.
    pub fn from_label_error(error: &LabelError, server_message: impl Into<String>) -> Self {
        match error {
            LabelError::InvalidRecord(reason) => Self::bad_request(reason.clone()),
            _ => Self::internal(server_message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Reject requests that carried no recognized field at all.
pub(crate) fn require_data(record: &LabelRecord) -> Result<(), ApiError> {
    if record.is_empty() {
        return Err(ApiError::bad_request("No data received"));
    }
    Ok(())
}
