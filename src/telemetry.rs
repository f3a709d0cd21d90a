//! Tracing setup: JSON lines to a log file, human-readable lines to stdout.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{writer::BoxMakeWriter, Layer},
    layer::SubscriberExt,
    EnvFilter, Registry,
};

/// Keeps the background log writers alive; logs are flushed when dropped.
#[must_use = "dropping the guards stops log output"]
pub struct TelemetryGuards {
    _file: WorkerGuard,
    _stdout: WorkerGuard,
}

/// Installs the global subscriber. `RUST_LOG` drives the filter.
pub fn init(log_file: &str) -> Result<TelemetryGuards, tracing::subscriber::SetGlobalDefaultError> {
    let file_appender = tracing_appender::rolling::never(".", log_file);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let file_layer = Layer::new()
        .json()
        .with_writer(BoxMakeWriter::new(move || file_writer.clone()));
    let stdout_layer = Layer::new().with_writer(BoxMakeWriter::new(move || stdout_writer.clone()));

    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(file_layer)
        .with(stdout_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(TelemetryGuards {
        _file: file_guard,
        _stdout: stdout_guard,
    })
}
