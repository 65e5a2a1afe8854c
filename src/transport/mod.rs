//! # Printer Transport Layer
//!
//! Sends finished print jobs to a label printer over raw TCP (the
//! "JetDirect" / port 9100 convention most network thermal printers use).
//!
//! ## Structure
//!
//! - [`PrinterEndpoint`]: where the printer lives and how long to wait for it
//! - [`Connector`] / [`PrinterLink`]: how a connection is opened and closed
//! - [`TcpConnector`]: the real socket implementation
//! - [`NetworkPrinter`]: one connection per job, closed on every path
//!
//! Transport I/O is blocking. Async callers run it on a blocking thread
//! (`tokio::task::spawn_blocking`).

mod network;
mod tcp;

pub use network::{NetworkPrinter, TransmitState};
pub use tcp::TcpConnector;

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use crate::error::TransportError;

/// Raw printing port used by network receipt printers.
pub const DEFAULT_PORT: u16 = 9100;

/// Connect and write timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Network address of a printer plus the timeout bounding each socket operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterEndpoint {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl PrinterEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Display for PrinterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// An open connection to a printer.
pub trait PrinterLink: Write {
    /// Flush and release the connection. Called exactly once per link.
    fn close(&mut self) -> io::Result<()>;
}

/// Opens [`PrinterLink`]s.
pub trait Connector {
    type Link: PrinterLink;

    fn connect(&self, endpoint: &PrinterEndpoint) -> Result<Self::Link, TransportError>;
}

/// Map a socket error to a transport error, separating timeouts.
///
/// `stage` completes the sentence "Timed out while {stage} printer".
pub(crate) fn classify(
    endpoint: &PrinterEndpoint,
    stage: &'static str,
    error: io::Error,
    wrap: fn(String, io::Error) -> TransportError,
) -> TransportError {
    match error.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::Timeout {
            endpoint: endpoint.to_string(),
            stage,
            timeout: endpoint.timeout,
        },
        _ => wrap(endpoint.to_string(), error),
    }
}
