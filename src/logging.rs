//! Tracing subscriber setup.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogArgs;

/// Install the global subscriber: stderr always, plus `LOG_FILE` when set.
///
/// `RUST_LOG` overrides the configured level. Keep the returned guard alive
/// for as long as file logging should keep flushing.
pub fn init(args: &LogArgs) -> std::io::Result<Option<WorkerGuard>> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.level));

    let console = fmt::layer().with_target(true).with_filter(filter());

    let (file, guard) = match &args.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            fs::create_dir_all(dir)?;
            let name = path.file_name().unwrap_or_else(|| "grocy-label.log".as_ref());

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file).init();
    Ok(guard)
}
