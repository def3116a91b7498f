use pulseboard_app_lib::commands::cache::{cache_clear_all, cache_invalidate};
use pulseboard_app_lib::commands::dashboard::{
    dashboard_export, dashboard_fetch, dataset_filter_options, dataset_replace, dataset_upload,
    session_close,
};
use pulseboard_app_lib::commands::settings::{settings_get, settings_update};
use pulseboard_app_lib::commands::AppState;
use pulseboard_app_lib::models::settings::{DashboardSettings, SettingsUpdateInput};
use pulseboard_app_lib::{FilterSpec, RemoteRange};

const SAMPLE: &[u8] = include_bytes!("../fixtures/productivity_sample.csv");

fn state(export_dir: &std::path::Path) -> AppState {
    AppState::with_settings(DashboardSettings {
        export_dir: Some(export_dir.to_path_buf()),
        ..Default::default()
    })
    .expect("app state")
}

#[tokio::test]
async fn upload_fetch_and_export() {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = state(dir.path());

    let summary = dataset_upload(&state, SAMPLE.to_vec()).await.expect("upload");
    assert_eq!(summary.record_count, 8);
    assert_eq!(summary.options.departments, vec!["HR", "IT", "Sales"]);
    assert_eq!(summary.options.years, vec![2023, 2024]);
    assert_eq!(summary.options.remote_step, 25);

    let options = dataset_filter_options(&state, summary.session_id.clone())
        .await
        .expect("options");
    assert_eq!(options, summary.options);

    let all = dashboard_fetch(&state, summary.session_id.clone(), None)
        .await
        .expect("dashboard");
    assert_eq!(all.record_count, 8);
    assert_eq!(all.kpis.employee_count, 5);

    let narrowed = dashboard_fetch(
        &state,
        summary.session_id.clone(),
        Some(FilterSpec::new(["Sales"], [2024], RemoteRange::full())),
    )
    .await
    .expect("narrowed dashboard");
    assert_eq!(narrowed.record_count, 2);
    assert_eq!(narrowed.top_employees.len(), 2);

    let export = dashboard_export(&state, summary.session_id.clone(), None)
        .await
        .expect("export");
    assert!(std::path::Path::new(&export.file_path).starts_with(dir.path()));
    assert_eq!(export.fingerprint, summary.fingerprint);

    session_close(&state, summary.session_id.clone()).await.expect("close");
    let err = dashboard_fetch(&state, summary.session_id, None)
        .await
        .expect_err("closed session");
    assert_eq!(err.code, "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn repeated_upload_reuses_the_memoized_dataset() {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = state(dir.path());

    let first = dataset_upload(&state, SAMPLE.to_vec()).await.expect("first");
    let second = dataset_upload(&state, SAMPLE.to_vec()).await.expect("second");
    assert_ne!(first.session_id, second.session_id);
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(state.datasets().len().expect("len"), 1);

    let cleared = cache_clear_all(&state).await.expect("clear");
    assert_eq!(cleared.datasets_cleared, 1);

    // sessions keep their handles after the memo table is cleared
    let snapshot = dashboard_fetch(&state, first.session_id, None)
        .await
        .expect("dashboard after clear");
    assert_eq!(snapshot.record_count, 8);
}

#[tokio::test]
async fn schema_errors_surface_with_details() {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = state(dir.path());

    let err = dataset_upload(&state, b"Employee_ID,Department\nE1,IT\n".to_vec())
        .await
        .expect_err("schema error");
    assert_eq!(err.code, "SCHEMA_ERROR");
    let details = err.details.expect("details");
    assert_eq!(details["kind"], "MISSING_COLUMN");
    assert_eq!(details["column"], "Date");
}

#[tokio::test]
async fn filter_spec_accepts_adapter_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = state(dir.path());
    let summary = dataset_upload(&state, SAMPLE.to_vec()).await.expect("upload");

    let spec: FilterSpec = serde_json::from_value(serde_json::json!({
        "departments": ["IT"],
        "years": [2023, 2024],
        "remoteRange": { "low": 50, "high": 50 }
    }))
    .expect("filter json");

    let snapshot = dashboard_fetch(&state, summary.session_id, Some(spec))
        .await
        .expect("dashboard");
    assert_eq!(snapshot.record_count, 2);
    assert_eq!(snapshot.headcount_by_department.get("IT"), Some(&1));
}

#[test]
fn filter_json_must_name_departments_and_years() {
    for partial in [
        serde_json::json!({ "years": [2024] }),
        serde_json::json!({ "departments": ["IT"] }),
        serde_json::json!({}),
    ] {
        let parsed = serde_json::from_value::<FilterSpec>(partial.clone());
        assert!(parsed.is_err(), "accepted incomplete filter {partial}");
    }

    let spec: FilterSpec = serde_json::from_value(serde_json::json!({
        "departments": ["IT"],
        "years": [2024]
    }))
    .expect("remote range defaults");
    assert_eq!(spec.remote_range, RemoteRange::full());
}

#[tokio::test]
async fn replace_swaps_a_session_dataset() {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = state(dir.path());
    let summary = dataset_upload(&state, SAMPLE.to_vec()).await.expect("upload");

    let hr_only: String = String::from_utf8(SAMPLE.to_vec())
        .expect("utf-8 fixture")
        .lines()
        .enumerate()
        .filter(|(idx, line)| *idx == 0 || line.contains(",HR,"))
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n");

    let replaced = dataset_replace(&state, summary.session_id.clone(), hr_only.into_bytes())
        .await
        .expect("replace");
    assert_eq!(replaced.session_id, summary.session_id);
    assert_eq!(replaced.record_count, 2);
    assert_eq!(replaced.options.departments, vec!["HR"]);
    assert_ne!(replaced.fingerprint, summary.fingerprint);

    assert!(cache_invalidate(&state, summary.fingerprint.clone())
        .await
        .expect("invalidate"));
    assert!(!cache_invalidate(&state, summary.fingerprint)
        .await
        .expect("invalidate again"));
}

/// The sample with `padding` trailing blank lines: same records, new fingerprint.
fn padded_sample(padding: usize) -> Vec<u8> {
    let mut raw = SAMPLE.to_vec();
    raw.extend(std::iter::repeat(b'\n').take(padding));
    raw
}

#[tokio::test]
async fn settings_update_reaches_the_running_services() {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = AppState::with_settings(DashboardSettings {
        cache_capacity: 1,
        export_dir: Some(dir.path().join("before")),
        ..Default::default()
    })
    .expect("app state");

    let updated = settings_update(
        &state,
        SettingsUpdateInput {
            cache_capacity: Some(4),
            export_dir: Some(Some(dir.path().join("after"))),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.cache_capacity, 4);
    assert_eq!(settings_get(&state).await.expect("get"), updated);

    let mut last_session = String::new();
    for padding in 1..=3 {
        last_session = dataset_upload(&state, padded_sample(padding))
            .await
            .expect("upload")
            .session_id;
    }
    assert_eq!(state.datasets().len().expect("len"), 3);

    let export = dashboard_export(&state, last_session, None).await.expect("export");
    assert!(std::path::Path::new(&export.file_path).starts_with(dir.path().join("after")));

    settings_update(
        &state,
        SettingsUpdateInput {
            cache_capacity: Some(1),
            ..Default::default()
        },
    )
    .await
    .expect("shrink");
    assert_eq!(state.datasets().len().expect("len"), 1);

    let err = settings_update(
        &state,
        SettingsUpdateInput {
            cache_capacity: Some(0),
            ..Default::default()
        },
    )
    .await
    .expect_err("zero capacity");
    assert_eq!(err.code, "VALIDATION_ERROR");
    assert_eq!(state.settings().get().expect("settings").cache_capacity, 1);
}

#[tokio::test]
async fn settings_update_persists_to_the_backing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let settings_path = dir.path().join("settings.yaml");
    std::fs::write(&settings_path, "cacheCapacity: 2\n").expect("write settings");
    let state = AppState::bootstrap(Some(settings_path.as_path())).expect("bootstrap");

    settings_update(
        &state,
        SettingsUpdateInput {
            remote_step: Some(5),
            ..Default::default()
        },
    )
    .await
    .expect("update");

    let saved: DashboardSettings =
        serde_yaml::from_str(&std::fs::read_to_string(&settings_path).expect("read settings"))
            .expect("yaml");
    assert_eq!(saved.cache_capacity, 2);
    assert_eq!(saved.remote_step, 5);
}

#[test]
fn bootstrap_reads_settings_and_starts_logging() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_dir = dir.path().join("logs");
    let settings_path = dir.path().join("settings.yaml");
    std::fs::write(
        &settings_path,
        format!(
            "cacheCapacity: 2\nremoteStep: 10\nlogDir: {}\nexportDir: {}\nlogFilePrefix: board.log\nlogDirectives: warn,app::session=debug\n",
            log_dir.display(),
            dir.path().join("exports").display()
        ),
    )
    .expect("write settings");

    let state = AppState::bootstrap(Some(settings_path.as_path())).expect("bootstrap");
    let settings = state.settings().get().expect("settings");
    assert_eq!(settings.cache_capacity, 2);
    assert_eq!(settings.remote_step, 10);
    assert_eq!(settings.log_directives, "warn,app::session=debug");
    assert!(log_dir.is_dir());

    let log_files: Vec<String> = std::fs::read_dir(&log_dir)
        .expect("read log dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert!(!log_files.is_empty());
    assert!(
        log_files.iter().all(|name| name.starts_with("board.log")),
        "unexpected log files {log_files:?}"
    );
}
