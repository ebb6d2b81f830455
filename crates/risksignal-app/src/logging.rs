//! Tracing setup for the `risksignal` binary.
//!
//! Logs always go to `<log dir>/risksignal.log`. `--verbose` mirrors them to
//! stderr, and builds with the `telemetry` feature export spans over OTLP
//! when the standard OTel env vars ask for it.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, LOG_DIR_ENV, LOG_FILE_NAME};

/// Keeps the log writer (and OTel exporter) alive until dropped.
pub struct LogGuard {
    _file: WorkerGuard,
    #[cfg(feature = "telemetry")]
    _otel: Option<risksignal_telemetry::OtelGuard>,
}

/// `$RISKSIGNAL_LOG_DIR`, then the configured directory, then the temp dir.
pub fn resolve_log_dir(env_value: Option<String>, configured: Option<&Path>) -> PathBuf {
    env_value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
        .unwrap_or_else(std::env::temp_dir)
}

/// Install the global subscriber. Returns the log file path with the guard.
pub fn init(configured_dir: Option<&Path>, verbose: bool) -> (PathBuf, LogGuard) {
    let log_dir = resolve_log_dir(std::env::var(LOG_DIR_ENV).ok(), configured_dir);
    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(verbose.then(|| fmt::layer().with_writer(std::io::stderr)));

    #[cfg(feature = "telemetry")]
    let otel_guard = match risksignal_telemetry::otel_enabled()
        .then(|| risksignal_telemetry::otel_layer("risksignal"))
        .flatten()
    {
        Some((layer, guard)) => {
            registry.with(layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };
    #[cfg(not(feature = "telemetry"))]
    registry.init();

    let guard = LogGuard {
        _file: file_guard,
        #[cfg(feature = "telemetry")]
        _otel: otel_guard,
    };
    (log_dir.join(LOG_FILE_NAME), guard)
}
