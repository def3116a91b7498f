use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::analytics::{
    DailySeries, DashboardExportResult, DashboardSnapshot, DepartmentHeadcount,
    DepartmentProductivity, KpiSummary, Metric, RankedEmployee, TimeSeriesPoint,
};
use crate::models::dataset::{Dataset, FilterSpec, FilteredView};
use crate::services::record_filter;

pub const TOP_N: usize = 3;
const REPORT_PREFIX: &str = "dashboard-snapshot";

/// Running sum and count of defined values.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn finish(self) -> Metric {
        Metric::mean(self.sum, self.count)
    }
}

/// Headline figures. `total_tasks` truncates the summed task counts toward zero.
pub fn kpis(view: &FilteredView<'_>) -> KpiSummary {
    let mut employees: HashSet<&str> = HashSet::new();
    let mut productivity = MeanAccumulator::default();
    let mut satisfaction = MeanAccumulator::default();
    let mut total_tasks = 0.0;

    for record in view.iter() {
        employees.insert(record.employee_id());
        productivity.push(record.productivity);
        satisfaction.push(record.record.employee_satisfaction_score);
        total_tasks += record.record.tasks_completed.unwrap_or(0.0);
    }

    KpiSummary {
        employee_count: employees.len(),
        avg_productivity: productivity.finish(),
        avg_satisfaction: satisfaction.finish(),
        total_tasks: total_tasks.trunc() as i64,
    }
}

/// Employees ranked by mean productivity, highest first.
///
/// Ties keep first-encounter order. Employees without any defined
/// productivity rank after every employee that has one.
pub fn top_n(view: &FilteredView<'_>, n: usize) -> Vec<RankedEmployee> {
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut groups: HashMap<(&str, &str), MeanAccumulator> = HashMap::new();

    for record in view.iter() {
        let key = (
            record.record.employee_id.as_str(),
            record.record.employee_name.as_str(),
        );
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                MeanAccumulator::default()
            })
            .push(record.productivity);
    }

    let mut ranked: Vec<RankedEmployee> = order
        .into_iter()
        .map(|key| RankedEmployee {
            employee_id: key.0.to_string(),
            employee_name: key.1.to_string(),
            mean_productivity: groups.get(&key).copied().unwrap_or_default().finish(),
        })
        .collect();

    ranked.sort_by(|a, b| match (a.mean_productivity.value(), b.mean_productivity.value()) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    ranked.truncate(n);
    ranked
}

pub fn time_series(view: &FilteredView<'_>) -> DailySeries {
    let mut by_date: BTreeMap<NaiveDate, MeanAccumulator> = BTreeMap::new();
    for record in view.iter() {
        by_date.entry(record.date()).or_default().push(record.productivity);
    }

    DailySeries::new(
        by_date
            .into_iter()
            .map(|(date, acc)| TimeSeriesPoint {
                date,
                mean_productivity: acc.finish(),
            })
            .collect(),
    )
}

pub fn headcount_by_department(view: &FilteredView<'_>) -> DepartmentHeadcount {
    let mut employees: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for record in view.iter() {
        employees
            .entry(record.department())
            .or_default()
            .insert(record.employee_id());
    }

    employees
        .into_iter()
        .map(|(department, ids)| (department.to_string(), ids.len()))
        .collect()
}

/// Ratio of summed productive hours to summed clocked hours per department.
///
/// Missing cells are skipped on each side independently. This weights long
/// shifts more than the per-record mean used by the other views.
pub fn productivity_by_department(view: &FilteredView<'_>) -> DepartmentProductivity {
    let mut sums: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for record in view.iter() {
        let entry = sums.entry(record.department()).or_insert((0.0, 0.0));
        entry.0 += record.record.productive_hours.unwrap_or(0.0);
        entry.1 += record.record.clocked_hours.unwrap_or(0.0);
    }

    sums.into_iter()
        .map(|(department, (productive, clocked))| {
            (department.to_string(), Metric::percent(productive, clocked))
        })
        .collect()
}

pub struct AnalyticsService {
    reports_dir: RwLock<PathBuf>,
}

impl AnalyticsService {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: RwLock::new(reports_dir.into()),
        }
    }

    /// Point later exports at another directory.
    pub fn set_reports_dir(&self, reports_dir: impl Into<PathBuf>) -> AppResult<()> {
        let reports_dir = reports_dir.into();
        debug!(target: "app::analytics", dir = %reports_dir.display(), "reports directory changed");
        *self
            .reports_dir
            .write()
            .map_err(|_| AppError::other("reports directory lock poisoned"))? = reports_dir;
        Ok(())
    }

    pub fn dashboard(&self, dataset: &Dataset, filter: &FilterSpec) -> DashboardSnapshot {
        let view = record_filter::apply(dataset, filter);
        let snapshot = build_snapshot(dataset.fingerprint(), &view);
        debug!(
            target: "app::analytics",
            fingerprint = %snapshot.fingerprint,
            records = snapshot.record_count,
            employees = snapshot.kpis.employee_count,
            "dashboard computed"
        );
        snapshot
    }

    pub fn export(&self, dataset: &Dataset, filter: &FilterSpec) -> AppResult<DashboardExportResult> {
        let snapshot = self.dashboard(dataset, filter);
        let reports_dir = self
            .reports_dir
            .read()
            .map_err(|_| AppError::other("reports directory lock poisoned"))?
            .clone();
        std::fs::create_dir_all(&reports_dir)?;

        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let filename = format!("{REPORT_PREFIX}-{timestamp}.json");
        let path = reports_dir.join(filename);
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&path, json)?;

        info!(target: "app::analytics", path = %path.display(), "dashboard snapshot exported");

        Ok(DashboardExportResult {
            file_path: path.to_string_lossy().to_string(),
            fingerprint: snapshot.fingerprint,
            generated_at: snapshot.generated_at,
        })
    }
}

pub fn build_snapshot(fingerprint: &str, view: &FilteredView<'_>) -> DashboardSnapshot {
    DashboardSnapshot {
        fingerprint: fingerprint.to_string(),
        record_count: view.len(),
        kpis: kpis(view),
        top_employees: top_n(view, TOP_N),
        time_series: time_series(view),
        headcount_by_department: headcount_by_department(view),
        productivity_by_department: productivity_by_department(view),
        generated_at: Utc::now().to_rfc3339(),
    }
}
