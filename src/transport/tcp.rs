//! Blocking TCP connections to port-9100 printers.

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::debug;

use super::{classify, Connector, PrinterEndpoint, PrinterLink};
use crate::error::TransportError;

/// Opens plain TCP connections bounded by the endpoint timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl TcpConnector {
    fn resolve(endpoint: &PrinterEndpoint) -> Result<Vec<SocketAddr>, TransportError> {
        let invalid = |reason: String| TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        if endpoint.host.trim().is_empty() {
            return Err(invalid("host is empty".into()));
        }
        if endpoint.timeout.is_zero() {
            return Err(invalid("timeout must be greater than zero".into()));
        }

        let addrs: Vec<SocketAddr> = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .collect();

        if addrs.is_empty() {
            return Err(invalid("host resolved to no addresses".into()));
        }
        Ok(addrs)
    }
}

/// Try each address in turn until one connects. All attempts share a single
/// `timeout`, so a host with many addresses still gives up on time.
fn connect_within<T>(
    addrs: &[SocketAddr],
    timeout: Duration,
    mut attempt: impl FnMut(&SocketAddr, Duration) -> io::Result<T>,
) -> io::Result<T> {
    let deadline = Instant::now() + timeout;
    let mut last_error = None;

    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            last_error = Some(io::Error::from(io::ErrorKind::TimedOut));
            break;
        }
        debug!(%addr, ?remaining, "connecting");
        match attempt(addr, remaining) {
            Ok(link) => return Ok(link),
            Err(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or_else(|| io::Error::from(io::ErrorKind::AddrNotAvailable)))
}

impl Connector for TcpConnector {
    type Link = TcpStream;

    fn connect(&self, endpoint: &PrinterEndpoint) -> Result<TcpStream, TransportError> {
        let addrs = Self::resolve(endpoint)?;

        let stream = connect_within(&addrs, endpoint.timeout, |addr, remaining| {
            TcpStream::connect_timeout(addr, remaining)
        })
        .map_err(|error| {
            classify(endpoint, "connecting to", error, |endpoint, source| {
                TransportError::Connect { endpoint, source }
            })
        })?;

        stream
            .set_write_timeout(Some(endpoint.timeout))
            .and_then(|_| stream.set_nodelay(true))
            .map_err(|source| TransportError::Connect {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Ok(stream)
    }
}

impl PrinterLink for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        self.shutdown(Shutdown::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_connect_and_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).unwrap();
            received
        });

        let endpoint = PrinterEndpoint::new("127.0.0.1", port);
        let mut link = TcpConnector.connect(&endpoint).unwrap();
        link.write_all(b"\x1b@").unwrap();
        link.close().unwrap();

        assert_eq!(server.join().unwrap(), b"\x1b@");
    }

    #[test]
    fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = PrinterEndpoint::new("127.0.0.1", port);
        let err = TcpConnector.connect(&endpoint).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }), "got {err:?}");
    }

    #[test]
    fn test_empty_host_is_invalid() {
        let err = TcpConnector.connect(&PrinterEndpoint::new("  ", 9100)).unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let endpoint = PrinterEndpoint::new("127.0.0.1", 9100).with_timeout(Duration::ZERO);
        let err = TcpConnector.connect(&endpoint).unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_addresses_share_one_timeout() {
        let addrs: Vec<SocketAddr> = (1..=5)
            .map(|i| SocketAddr::from(([10, 0, 0, i], 9100)))
            .collect();
        let timeout = Duration::from_millis(100);
        let mut budgets = Vec::new();

        let err = connect_within(&addrs, timeout, |_, remaining| -> io::Result<()> {
            budgets.push(remaining);
            thread::sleep(remaining.min(Duration::from_millis(40)));
            Err(io::Error::from(io::ErrorKind::ConnectionRefused))
        })
        .unwrap_err();

        assert!(!budgets.is_empty());
        assert!(budgets.len() <= 3, "attempts: {budgets:?}");
        assert!(budgets.iter().all(|b| *b <= timeout));
        assert!(budgets.windows(2).all(|w| w[1] < w[0]));
        assert!(matches!(
            err.kind(),
            io::ErrorKind::TimedOut | io::ErrorKind::ConnectionRefused
        ));
    }

    #[test]
    fn test_first_working_address_wins() {
        let addrs = [
            SocketAddr::from(([10, 0, 0, 1], 9100)),
            SocketAddr::from(([10, 0, 0, 2], 9100)),
        ];
        let picked = connect_within(&addrs, Duration::from_secs(1), |addr, _| {
            if addr.ip().to_string() == "10.0.0.2" {
                Ok(*addr)
            } else {
                Err(io::Error::from(io::ErrorKind::ConnectionRefused))
            }
        })
        .unwrap();
        assert_eq!(picked, addrs[1]);
    }
}
