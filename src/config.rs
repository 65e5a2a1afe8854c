//! # Configuration
//!
//! Command-line flags with environment fallbacks. The environment names are
//! the ones existing Grocy label server deployments already set:
//!
//! | Flag | Environment | Default |
//! |------|-------------|---------|
//! | `--printer-host` | `PRINTER_HOST` | `192.168.1.100` |
//! | `--printer-port` | `PRINTER_PORT` | `9100` |
//! | `--printer-timeout` | `PRINTER_TIMEOUT_SECS` | `5` |
//! | `--cut` | `PRINTER_CUT` | `true` |
//! | `--feed-lines` | `PRINTER_FEED_LINES` | `4` |
//! | `--width` | `LABEL_WIDTH` | `384` |
//! | `--font` | `LABEL_FONT` | built-in bitmap font |
//! | `--host` | `SERVER_HOST` | `0.0.0.0` |
//! | `--port` | `SERVER_PORT` | `5000` |
//! | `--log-level` | `LOG_LEVEL` | `info` |
//! | `--log-file` | `LOG_FILE` | stderr only |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Args};

use crate::error::LabelError;
use crate::font::LabelAssets;
use crate::layout::DEFAULT_WIDTH;
use crate::pipeline::LabelService;
use crate::protocol::{JobOptions, DEFAULT_FEED_LINES};
use crate::transport::{NetworkPrinter, PrinterEndpoint, DEFAULT_PORT};

/// Where and how to print.
#[derive(Args, Debug, Clone)]
pub struct PrinterArgs {
    /// Printer hostname or IP address
    #[arg(long = "printer-host", env = "PRINTER_HOST", default_value = "192.168.1.100")]
    pub printer_host: String,

    /// Printer raw TCP port
    #[arg(long = "printer-port", env = "PRINTER_PORT", default_value_t = DEFAULT_PORT)]
    pub printer_port: u16,

    /// Connect and write timeout in seconds
    #[arg(long = "printer-timeout", env = "PRINTER_TIMEOUT_SECS", default_value_t = 5,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Cut the paper after each label
    #[arg(long, env = "PRINTER_CUT", default_value_t = true, action = ArgAction::Set)]
    pub cut: bool,

    /// Lines to feed after each label
    #[arg(long, env = "PRINTER_FEED_LINES", default_value_t = DEFAULT_FEED_LINES)]
    pub feed_lines: u8,
}

impl PrinterArgs {
    pub fn endpoint(&self) -> PrinterEndpoint {
        PrinterEndpoint::new(self.printer_host.clone(), self.printer_port)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn job_options(&self) -> JobOptions {
        JobOptions {
            feed_lines: self.feed_lines,
            cut: self.cut,
        }
    }

    pub fn printer(&self) -> NetworkPrinter {
        NetworkPrinter::new(self.endpoint()).with_options(self.job_options())
    }
}

/// Label geometry and fonts.
#[derive(Args, Debug, Clone)]
pub struct LabelArgs {
    /// Label width in dots (384 for 58 mm paper, 576 for 80 mm)
    #[arg(long, env = "LABEL_WIDTH", default_value_t = DEFAULT_WIDTH,
          value_parser = clap::value_parser!(u32).range(64..=2048))]
    pub width: u32,

    /// TrueType font used instead of the built-in bitmap font
    #[arg(long, env = "LABEL_FONT", value_name = "FILE")]
    pub font: Option<PathBuf>,
}

impl LabelArgs {
    /// Load the fonts and build the pipeline.
    pub fn service(&self) -> Result<LabelService, LabelError> {
        let assets = LabelAssets::load(self.font.as_deref())?;
        Ok(LabelService::new(Arc::new(assets), self.width))
    }
}

/// HTTP listener.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "SERVER_PORT", default_value_t = 5000)]
    pub port: u16,
}

impl ServerArgs {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log verbosity and destination.
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log filter, e.g. `info` or `grocy_label=debug,tower_http=info`
    #[arg(long = "log-level", env = "LOG_LEVEL", default_value = "info", global = true)]
    pub level: String,

    /// Also append logs to this file
    #[arg(long = "log-file", env = "LOG_FILE", value_name = "FILE", global = true)]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        printer: PrinterArgs,
        #[command(flatten)]
        label: LabelArgs,
        #[command(flatten)]
        server: ServerArgs,
    }

    #[test]
    fn test_flags() {
        let cli = TestCli::try_parse_from([
            "test",
            "--printer-host",
            "10.0.0.7",
            "--printer-port",
            "9200",
            "--printer-timeout",
            "2",
            "--cut",
            "false",
            "--width",
            "576",
            "--port",
            "8080",
        ])
        .unwrap();

        let endpoint = cli.printer.endpoint();
        assert_eq!(endpoint.to_string(), "10.0.0.7:9200");
        assert_eq!(endpoint.timeout, Duration::from_secs(2));
        assert!(!cli.printer.job_options().cut);
        assert_eq!(cli.label.width, 576);
        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.server.host, "0.0.0.0");
    }

    #[test]
    fn test_printer_and_server_ports_are_separate() {
        let cli = TestCli::try_parse_from([
            "test",
            "--host",
            "127.0.0.1",
            "--port",
            "5999",
            "--printer-host",
            "printer.lan",
            "--printer-port",
            "9101",
        ])
        .unwrap();

        assert_eq!(cli.server.listen_addr(), "127.0.0.1:5999");
        assert_eq!(cli.printer.endpoint().to_string(), "printer.lan:9101");
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        TestCli::command().debug_assert();
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(TestCli::try_parse_from(["test", "--printer-timeout", "0"]).is_err());
    }

    #[test]
    fn test_rejects_tiny_width() {
        assert!(TestCli::try_parse_from(["test", "--width", "8"]).is_err());
    }
}
