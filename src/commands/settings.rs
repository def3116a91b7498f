use crate::commands::{run_blocking, AppState, CommandResult};
use crate::models::settings::{DashboardSettings, SettingsUpdateInput};

pub async fn settings_get(state: &AppState) -> CommandResult<DashboardSettings> {
    let app_state = state.clone();
    run_blocking("settings get", move || app_state.settings().get()).await
}

/// Apply a settings change to the running services and persist it when the
/// settings came from a file. Log location and filter take effect on the
/// next bootstrap since the subscriber is installed once per process.
pub async fn settings_update(
    state: &AppState,
    input: SettingsUpdateInput,
) -> CommandResult<DashboardSettings> {
    let app_state = state.clone();
    run_blocking("settings update", move || {
        let settings = app_state.settings();
        let updated = settings.update(input)?;

        app_state.datasets().resize(updated.cache_capacity)?;
        app_state.analytics().set_reports_dir(settings.export_dir()?)?;

        if settings.has_backing_file() {
            settings.save()?;
        }
        Ok(updated)
    })
    .await
}
