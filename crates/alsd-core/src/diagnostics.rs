use std::{fs, io, path::Path};

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::DiagnosticsConfig;

pub const DEFAULT_LOG_FILTER: &str = "warn,alsd_core=info";

pub struct TelemetryGuard {
    pub session_id: Uuid,
    _file_guard: Option<WorkerGuard>,
}

pub fn init_tracing() -> anyhow::Result<TelemetryGuard> {
    init_tracing_with_options(None, "alsd", DEFAULT_LOG_FILTER)
}

pub fn init_tracing_with_config(config: &DiagnosticsConfig) -> anyhow::Result<TelemetryGuard> {
    init_tracing_with_options(
        config.log_dir.as_deref(),
        &config.trace_file_prefix,
        &config.rust_log_filter,
    )
}

/// Installs the global subscriber: compact stderr output plus, when `log_dir`
/// is given, a JSON log file per session.
pub fn init_tracing_with_options(
    log_dir: Option<&Path>,
    file_prefix: &str,
    default_filter: &str,
) -> anyhow::Result<TelemetryGuard> {
    let session_id = Uuid::new_v4();

    let (file_layer, file_guard) = match log_dir {
        Some(log_dir) => {
            fs::create_dir_all(log_dir).with_context(|| {
                format!("failed to create log directory: {}", log_dir.display())
            })?;
            let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
            let file_name = format!("{file_prefix}-{timestamp}.log");
            let file_appender = tracing_appender::rolling::never(log_dir, file_name);
            let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(file_writer);
            (Some(layer), Some(file_guard))
        }
        None => (None, None),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(true)
        .with_writer(io::stderr);

    if let Err(error) = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        warn!(?error, "global tracing subscriber already initialized");
    } else {
        info!(%session_id, "tracing initialized");
    }

    Ok(TelemetryGuard {
        session_id,
        _file_guard: file_guard,
    })
}
