use serde::Serialize;

use crate::models::analytics::{DashboardExportResult, DashboardSnapshot};
use crate::models::dataset::{FilterOptions, FilterSpec};

use super::{run_blocking, AppState, CommandResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub session_id: String,
    pub fingerprint: String,
    pub record_count: usize,
    pub options: FilterOptions,
}

pub async fn dataset_upload(state: &AppState, bytes: Vec<u8>) -> CommandResult<UploadSummary> {
    let app_state = state.clone();
    run_blocking("upload", move || {
        let (session_id, dataset) = app_state.sessions().open(&bytes)?;
        let remote_step = app_state.settings().get()?.remote_step;
        Ok(UploadSummary {
            session_id,
            fingerprint: dataset.fingerprint().to_string(),
            record_count: dataset.len(),
            options: FilterOptions::from_dataset(&dataset, remote_step),
        })
    })
    .await
}

pub async fn dataset_replace(
    state: &AppState,
    session_id: String,
    bytes: Vec<u8>,
) -> CommandResult<UploadSummary> {
    let app_state = state.clone();
    run_blocking("replace", move || {
        let dataset = app_state.sessions().replace(&session_id, &bytes)?;
        let remote_step = app_state.settings().get()?.remote_step;
        Ok(UploadSummary {
            session_id,
            fingerprint: dataset.fingerprint().to_string(),
            record_count: dataset.len(),
            options: FilterOptions::from_dataset(&dataset, remote_step),
        })
    })
    .await
}

pub async fn dataset_filter_options(
    state: &AppState,
    session_id: String,
) -> CommandResult<FilterOptions> {
    let app_state = state.clone();
    run_blocking("filter options", move || {
        let dataset = app_state.sessions().dataset(&session_id)?;
        let remote_step = app_state.settings().get()?.remote_step;
        Ok(FilterOptions::from_dataset(&dataset, remote_step))
    })
    .await
}

/// Compute every view for a session. No filter means everything selected.
pub async fn dashboard_fetch(
    state: &AppState,
    session_id: String,
    filter: Option<FilterSpec>,
) -> CommandResult<DashboardSnapshot> {
    let app_state = state.clone();
    run_blocking("dashboard", move || {
        let dataset = app_state.sessions().dataset(&session_id)?;
        let filter = filter.unwrap_or_else(|| FilterSpec::select_all(&dataset));
        Ok(app_state.analytics().dashboard(&dataset, &filter))
    })
    .await
}

pub async fn dashboard_export(
    state: &AppState,
    session_id: String,
    filter: Option<FilterSpec>,
) -> CommandResult<DashboardExportResult> {
    let app_state = state.clone();
    run_blocking("export", move || {
        let dataset = app_state.sessions().dataset(&session_id)?;
        let filter = filter.unwrap_or_else(|| FilterSpec::select_all(&dataset));
        app_state.analytics().export(&dataset, &filter)
    })
    .await
}

pub async fn session_close(state: &AppState, session_id: String) -> CommandResult<()> {
    let app_state = state.clone();
    run_blocking("close", move || app_state.sessions().close(&session_id)).await
}
