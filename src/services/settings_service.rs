use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::settings::{DashboardSettings, SettingsUpdateInput};
use crate::utils::logger::parse_directives;

const MAX_REMOTE_STEP: u32 = 100;

pub struct SettingsService {
    path: Option<PathBuf>,
    cache: RwLock<DashboardSettings>,
}

impl SettingsService {
    /// Load settings from a YAML file. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let settings = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)?;
                let parsed: DashboardSettings = serde_yaml::from_str(&raw)?;
                info!(target: "app::settings", path = %path.display(), "settings loaded");
                parsed
            }
            Some(path) => {
                warn!(target: "app::settings", path = %path.display(), "settings file not found, using defaults");
                DashboardSettings::default()
            }
            None => DashboardSettings::default(),
        };

        ensure_valid(&settings)?;
        Ok(Self {
            path: path.map(Path::to_path_buf),
            cache: RwLock::new(settings),
        })
    }

    pub fn from_settings(settings: DashboardSettings) -> AppResult<Self> {
        ensure_valid(&settings)?;
        Ok(Self {
            path: None,
            cache: RwLock::new(settings),
        })
    }

    pub fn get(&self) -> AppResult<DashboardSettings> {
        self.cache
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| AppError::other("settings lock poisoned"))
    }

    pub fn update(&self, input: SettingsUpdateInput) -> AppResult<DashboardSettings> {
        let mut next = self.get()?;

        if let Some(capacity) = input.cache_capacity {
            next.cache_capacity = capacity;
        }
        if let Some(step) = input.remote_step {
            next.remote_step = step;
        }
        if let Some(log_dir) = input.log_dir {
            next.log_dir = log_dir;
        }
        if let Some(export_dir) = input.export_dir {
            next.export_dir = export_dir;
        }
        if let Some(prefix) = input.log_file_prefix {
            next.log_file_prefix = prefix;
        }
        if let Some(directives) = input.log_directives {
            next.log_directives = directives;
        }

        ensure_valid(&next)?;

        let mut guard = self
            .cache
            .write()
            .map_err(|_| AppError::other("settings lock poisoned"))?;
        *guard = next.clone();
        Ok(next)
    }

    pub fn has_backing_file(&self) -> bool {
        self.path.is_some()
    }

    /// Write the current settings back to the file they were loaded from.
    pub fn save(&self) -> AppResult<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| AppError::validation("settings have no backing file"))?;
        let settings = self.get()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(&settings)?)?;
        info!(target: "app::settings", path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn export_dir(&self) -> AppResult<PathBuf> {
        let settings = self.get()?;
        Ok(settings
            .export_dir
            .unwrap_or_else(|| std::env::temp_dir().join("pulseboard").join("reports")))
    }
}

fn ensure_valid(settings: &DashboardSettings) -> AppResult<()> {
    if settings.cache_capacity == 0 {
        return Err(AppError::validation_with_details(
            "cacheCapacity must be at least 1",
            serde_json::json!({ "field": "cacheCapacity", "value": settings.cache_capacity }),
        ));
    }
    if settings.remote_step == 0 || settings.remote_step > MAX_REMOTE_STEP {
        return Err(AppError::validation_with_details(
            "remoteStep must be between 1 and 100",
            serde_json::json!({ "field": "remoteStep", "value": settings.remote_step }),
        ));
    }
    let prefix = settings.log_file_prefix.trim();
    if prefix.is_empty() || prefix.contains(|c: char| c == '/' || c == '\\') {
        return Err(AppError::validation_with_details(
            "logFilePrefix must be a plain file name",
            serde_json::json!({ "field": "logFilePrefix", "value": settings.log_file_prefix }),
        ));
    }
    parse_directives(&settings.log_directives)?;
    Ok(())
}
