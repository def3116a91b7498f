use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{AppError, AppResult};
use crate::models::settings::DashboardSettings;

/// Keeps the background log writer alive for the rest of the process.
static LOG_WRITER: OnceCell<WorkerGuard> = OnceCell::new();

/// Parse `EnvFilter` directives such as `info,app::ingest=debug`.
pub fn parse_directives(directives: &str) -> AppResult<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|err| {
        AppError::validation_with_details(
            "logDirectives is not a valid filter",
            serde_json::json!({
                "field": "logDirectives",
                "value": directives,
                "reason": err.to_string(),
            }),
        )
    })
}

/// Install the global subscriber: a daily rolling file named after
/// `settings.log_file_prefix` plus stdout. `RUST_LOG` overrides
/// `settings.log_directives`. Only the first call has any effect.
pub fn init_logging(log_dir: &Path, settings: &DashboardSettings) -> AppResult<()> {
    LOG_WRITER
        .get_or_try_init(|| {
            std::fs::create_dir_all(log_dir)?;

            let filter = match EnvFilter::try_from_default_env() {
                Ok(filter) => filter,
                Err(_) => parse_directives(&settings.log_directives)?,
            };

            let appender = tracing_appender::rolling::daily(log_dir, &settings.log_file_prefix);
            let (file_writer, guard) = tracing_appender::non_blocking(appender);

            let file_layer = fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true)
                .with_timer(UtcTime::rfc_3339());
            let stdout_layer = fmt::layer()
                .with_target(false)
                .with_timer(UtcTime::rfc_3339());

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(stdout_layer)
                .try_init()
                .map_err(|err| AppError::other(format!("failed to install subscriber: {err}")))?;

            info!(
                target: "app::logging",
                dir = %log_dir.display(),
                prefix = %settings.log_file_prefix,
                "logging started"
            );
            Ok(guard)
        })
        .map(|_| ())
}
