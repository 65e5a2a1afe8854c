//! # grocy-label CLI
//!
//! Label server for Grocy and ESC/POS network thermal printers.
//!
//! ## Usage
//!
//! ```bash
//! # Run the webhook server (configure through flags or environment)
//! PRINTER_HOST=192.168.1.50 grocy-label serve
//!
//! # Print one label from a JSON file
//! grocy-label print label.json --printer-host 192.168.1.50
//!
//! # Render the label to PNG instead of printing
//! grocy-label print label.json --png label.png
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use grocy_label::{
    config::{LabelArgs, LogArgs, PrinterArgs, ServerArgs},
    logging,
    record::LabelRecord,
    server::{self, AppState, ServerConfig},
};

/// grocy-label - Grocy label server for network thermal printers
#[derive(Parser, Debug)]
#[command(name = "grocy-label")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server Grocy posts labels to
    Serve {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        printer: PrinterArgs,

        #[command(flatten)]
        label: LabelArgs,
    },

    /// Print a label from a JSON record file
    Print {
        /// JSON file with the label record (Grocy webhook format)
        record: PathBuf,

        /// Output to PNG file instead of printing
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        #[command(flatten)]
        printer: PrinterArgs,

        #[command(flatten)]
        label: LabelArgs,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log)?;

    match cli.command {
        Commands::Serve {
            server: server_args,
            printer,
            label,
        } => {
            let state = AppState::new(label.service()?, printer.printer());
            let config = ServerConfig {
                listen_addr: server_args.listen_addr(),
            };

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config, state))?;
        }

        Commands::Print {
            record,
            png,
            printer,
            label,
        } => {
            let text = std::fs::read_to_string(&record)
                .map_err(|e| format!("Failed to read {}: {}", record.display(), e))?;
            let record: LabelRecord = serde_json::from_str(&text)?;
            let service = label.service()?;

            if let Some(png_path) = png {
                std::fs::write(&png_path, service.preview_png(&record)?)?;
                println!("Saved to {}", png_path.display());
            } else {
                service.print(&record, &printer.printer())?;
                info!("label printed");
                println!("Printed successfully!");
            }
        }
    }

    Ok(())
}
