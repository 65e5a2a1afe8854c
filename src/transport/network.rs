//! # Network Printer
//!
//! Sends one print job per connection.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──► Connecting ──► Sending ──► Closing ──► Done
//!              │             │           ▲
//!              └─────────────┴───────────┴──► Failed
//! ```
//!
//! `Closing` is entered on every path, so a connection that was opened is
//! always released, even when the write fails half way. A failure while
//! connecting passes through `Closing` with nothing to release.
//!
//! Jobs are never retried: a repeated job would feed and cut twice.

use std::io::{self, Write};

use tracing::{debug, info, instrument, warn};

use super::{classify, Connector, PrinterEndpoint, PrinterLink, TcpConnector};
use crate::error::TransportError;
use crate::protocol::{self, JobOptions};
use crate::raster::RasterImage;

/// Progress of a single transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitState {
    Idle,
    Connecting,
    Sending,
    Closing,
    Done,
    Failed,
}

impl TransmitState {
    /// Whether `next` is a legal successor of this state.
    pub fn can_enter(self, next: TransmitState) -> bool {
        use TransmitState::*;
        matches!(
            (self, next),
            (Idle, Connecting)
                | (Connecting, Sending)
                | (Connecting, Closing)
                | (Sending, Closing)
                | (Closing, Done)
                | (Closing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransmitState::Done | TransmitState::Failed)
    }
}

/// Records the states a transmission passes through.
#[derive(Debug)]
struct Progress {
    history: Vec<TransmitState>,
}

impl Progress {
    fn new() -> Self {
        Self {
            history: vec![TransmitState::Idle],
        }
    }

    fn current(&self) -> TransmitState {
        self.history.last().copied().unwrap_or(TransmitState::Idle)
    }

    fn enter(&mut self, next: TransmitState) {
        debug_assert!(
            self.current().can_enter(next),
            "illegal transition {:?} -> {:?}",
            self.current(),
            next
        );
        debug!(from = ?self.current(), to = ?next, "transmit state");
        self.history.push(next);
    }
}

/// A printer reachable over the network.
#[derive(Debug, Clone)]
pub struct NetworkPrinter<C = TcpConnector> {
    endpoint: PrinterEndpoint,
    connector: C,
    options: JobOptions,
}

impl NetworkPrinter<TcpConnector> {
    pub fn new(endpoint: PrinterEndpoint) -> Self {
        Self::with_connector(endpoint, TcpConnector)
    }
}

impl<C: Connector> NetworkPrinter<C> {
    pub fn with_connector(endpoint: PrinterEndpoint, connector: C) -> Self {
        Self {
            endpoint,
            connector,
            options: JobOptions::default(),
        }
    }

    /// Set the feed/cut trailer appended to every job.
    pub fn with_options(mut self, options: JobOptions) -> Self {
        self.options = options;
        self
    }

    pub fn endpoint(&self) -> &PrinterEndpoint {
        &self.endpoint
    }

    pub fn options(&self) -> &JobOptions {
        &self.options
    }

    /// Print a label bitmap: reset, raster bands, feed and optional cut.
    #[instrument(skip(self, image), fields(endpoint = %self.endpoint, width = image.width(), height = image.height()))]
    pub fn transmit(&self, image: &RasterImage) -> Result<(), TransportError> {
        let data = protocol::job(image, &self.options);
        self.send(&data)
    }

    /// Send an already encoded job over a fresh connection.
    pub fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        self.run(data).1
    }

    /// Check that the printer accepts connections, without printing.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub fn probe(&self) -> Result<(), TransportError> {
        let mut link = self.connector.connect(&self.endpoint)?;
        if let Err(e) = link.close() {
            debug!(error = %e, "close after probe failed");
        }
        info!("printer reachable");
        Ok(())
    }

    fn run(&self, data: &[u8]) -> (Vec<TransmitState>, Result<(), TransportError>) {
        let mut progress = Progress::new();

        progress.enter(TransmitState::Connecting);
        let mut link = match self.connector.connect(&self.endpoint) {
            Ok(link) => link,
            Err(e) => {
                warn!(error = %e, "could not connect to printer");
                progress.enter(TransmitState::Closing);
                progress.enter(TransmitState::Failed);
                return (progress.history, Err(e));
            }
        };

        progress.enter(TransmitState::Sending);
        info!(bytes = data.len(), "sending job");
        let sent = link
            .write_all(data)
            .and_then(|_| link.flush())
            .map_err(|e| self.send_error(e));

        progress.enter(TransmitState::Closing);
        let closed = link.close();
        drop(link);

        let result = match (sent, closed) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(e)) => {
                warn!(error = %e, "job sent but closing the connection failed");
                Ok(())
            }
            (Err(send), Err(close)) => {
                debug!(error = %close, "close after failed send also failed");
                Err(send)
            }
            (Err(send), Ok(())) => Err(send),
        };

        match &result {
            Ok(()) => {
                progress.enter(TransmitState::Done);
                info!("job sent");
            }
            Err(e) => {
                progress.enter(TransmitState::Failed);
                warn!(error = %e, "job failed");
            }
        }
        (progress.history, result)
    }

    fn send_error(&self, error: io::Error) -> TransportError {
        classify(&self.endpoint, "sending to", error, |endpoint, source| {
            TransportError::Send { endpoint, source }
        })
    }
}
