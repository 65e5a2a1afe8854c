//! # Error Types
//!
//! This module defines the error types used throughout the label pipeline.
//!
//! | Error | Raised by | Caused by | HTTP |
//! |-------|-----------|-----------|------|
//! | [`LabelError::InvalidRecord`] | normalizer | caller sent no usable product name | 400 |
//! | [`LabelError::Asset`] | font loading, renderer | missing font or unencodable QR payload | 500 |
//! | [`LabelError::Image`] | PNG encoding | image codec failure | 500 |
//! | [`LabelError::Transport`] | printer transport | socket or device failure | 500 |
//! | [`LabelError::Task`] | server | a print job thread panicked or was cancelled | 500 |

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for label operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// The record lacks the minimum required field (product name)
    #[error("Invalid label record: {0}")]
    InvalidRecord(String),

    /// A font or the QR symbol could not be produced
    #[error("Asset error: {0}")]
    Asset(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Network or device failure while printing
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Background job did not run to completion
    #[error("Print task failed: {0}")]
    Task(String),
}

impl LabelError {
    /// Whether the failure was caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, LabelError::InvalidRecord(_))
    }
}

/// Failures of the printer transport.
///
/// The underlying socket error is kept as the `source` so it shows up in logs.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Host/port could not be turned into a socket address
    #[error("Invalid printer endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Connection refused, unreachable host, reset during connect
    #[error("Connection to printer {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// Connect or write exceeded the configured timeout
    #[error("Timed out after {timeout:?} while {stage} printer {endpoint}")]
    Timeout {
        endpoint: String,
        stage: &'static str,
        timeout: Duration,
    },

    /// Write to an established connection failed
    #[error("Sending to printer {endpoint} failed: {source}")]
    Send {
        endpoint: String,
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    /// Whether the error was a timeout (connect or write).
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }
}
