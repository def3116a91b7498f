pub mod cache;
pub mod dashboard;
pub mod settings;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};
use crate::models::settings::DashboardSettings;
use crate::services::analytics_service::AnalyticsService;
use crate::services::dataset_cache::DatasetCache;
use crate::services::session_service::SessionService;
use crate::services::settings_service::SettingsService;

#[derive(Clone)]
pub struct AppState {
    settings_service: Arc<SettingsService>,
    dataset_cache: Arc<DatasetCache>,
    session_service: Arc<SessionService>,
    analytics_service: Arc<AnalyticsService>,
}

impl AppState {
    pub fn new(settings: SettingsService) -> AppResult<Self> {
        let current = settings.get()?;
        let dataset_cache = Arc::new(DatasetCache::new(current.cache_capacity)?);
        let session_service = Arc::new(SessionService::new(Arc::clone(&dataset_cache)));
        let analytics_service = Arc::new(AnalyticsService::new(settings.export_dir()?));

        Ok(Self {
            settings_service: Arc::new(settings),
            dataset_cache,
            session_service,
            analytics_service,
        })
    }

    /// Build state from an optional YAML settings file and start logging
    /// when the settings name a log directory.
    pub fn bootstrap(settings_path: Option<&Path>) -> AppResult<Self> {
        let settings = SettingsService::load(settings_path)?;
        let current = settings.get()?;
        if let Some(log_dir) = current.log_dir.as_deref() {
            crate::utils::logger::init_logging(log_dir, &current)?;
        }
        Self::new(settings)
    }

    pub fn with_settings(settings: DashboardSettings) -> AppResult<Self> {
        Self::new(SettingsService::from_settings(settings)?)
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn datasets(&self) -> Arc<DatasetCache> {
        Arc::clone(&self.dataset_cache)
    }

    pub fn sessions(&self) -> Arc<SessionService> {
        Arc::clone(&self.session_service)
    }

    pub fn analytics(&self) -> Arc<AnalyticsService> {
        Arc::clone(&self.analytics_service)
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Schema(schema) => {
                warn!(target: "app::command", kind = %schema.kind, "upload rejected");
                let message = schema.to_string();
                CommandError::new("SCHEMA_ERROR", message, Some(schema.details()))
            }
            AppError::Validation { message, details } => {
                CommandError::new("VALIDATION_ERROR", message, details)
            }
            AppError::SessionNotFound(session_id) => CommandError::new(
                "SESSION_NOT_FOUND",
                "session not found",
                Some(serde_json::json!({ "sessionId": session_id })),
            ),
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Yaml(error) => {
                error!(target: "app::command", error = %error, "settings error in command");
                CommandError::new("UNKNOWN", "settings could not be read", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "file system error", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

pub(crate) async fn run_blocking<T: Send + 'static>(
    label: &'static str,
    task: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CommandError::new("UNKNOWN", format!("{label} task failed: {err}"), None))?
        .map_err(CommandError::from)
}
