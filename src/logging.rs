//! Log setup: stderr plus the append-only `script.log`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Default log file, appended to across runs.
pub const LOG_FILE: &str = "script.log";

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// Keep the returned guard alive until the process ends; dropping it flushes
/// the file writer.
pub fn init(dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr.and(non_blocking))
        .with_ansi(false)
        .with_target(false)
        .init();

    guard
}
