use serde::Serialize;

use crate::commands::{run_blocking, AppState, CommandResult};

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheClearResult {
    pub datasets_cleared: usize,
}

/// Drop every memoized dataset. Open sessions keep their own handles.
pub async fn cache_clear_all(state: &AppState) -> CommandResult<CacheClearResult> {
    let app_state = state.clone();
    run_blocking("cache clear", move || {
        let datasets_cleared = app_state.datasets().clear()?;
        Ok(CacheClearResult { datasets_cleared })
    })
    .await
}

pub async fn cache_invalidate(state: &AppState, fingerprint: String) -> CommandResult<bool> {
    let app_state = state.clone();
    run_blocking("cache invalidate", move || app_state.datasets().invalidate(&fingerprint)).await
}
