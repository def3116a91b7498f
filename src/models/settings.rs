use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CACHE_CAPACITY: usize = 8;
pub const DEFAULT_REMOTE_STEP: u32 = 25;
pub const DEFAULT_LOG_FILE_PREFIX: &str = "pulseboard.log";
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,app::ingest=debug,app::ingest::cache=debug";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSettings {
    /// Number of loaded datasets kept in the fingerprint memo table.
    pub cache_capacity: usize,
    pub remote_step: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// File name prefix of the daily rolling log; the date is appended.
    pub log_file_prefix: String,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_directives: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            remote_step: DEFAULT_REMOTE_STEP,
            log_dir: None,
            export_dir: None,
            log_file_prefix: DEFAULT_LOG_FILE_PREFIX.to_string(),
            log_directives: DEFAULT_LOG_DIRECTIVES.to_string(),
        }
    }
}

/// Partial settings change. `None` leaves a field untouched; the nested
/// options on directories allow clearing them.
#[derive(Debug, Default, Clone)]
pub struct SettingsUpdateInput {
    pub cache_capacity: Option<usize>,
    pub remote_step: Option<u32>,
    pub log_dir: Option<Option<PathBuf>>,
    pub export_dir: Option<Option<PathBuf>>,
    pub log_file_prefix: Option<String>,
    pub log_directives: Option<String>,
}
