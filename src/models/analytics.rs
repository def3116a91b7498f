use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Result of a mean or ratio. `NoData` when nothing contributed, serialized as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Value(f64),
    NoData,
}

impl Metric {
    pub fn mean(sum: f64, count: usize) -> Self {
        if count == 0 {
            Metric::NoData
        } else {
            Metric::Value(sum / count as f64)
        }
    }

    pub fn percent(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Metric::NoData
        } else {
            Metric::Value(numerator / denominator * 100.0)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(value) => Some(*value),
            Metric::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Metric::NoData)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub employee_count: usize,
    pub avg_productivity: Metric,
    pub avg_satisfaction: Metric,
    pub total_tasks: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEmployee {
    pub employee_id: String,
    pub employee_name: String,
    pub mean_productivity: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub mean_productivity: Metric,
}

/// Daily mean productivity, ascending by date with one point per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailySeries {
    points: Vec<TimeSeriesPoint>,
}

impl DailySeries {
    pub fn new(points: Vec<TimeSeriesPoint>) -> Self {
        Self { points }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeSeriesPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<'a> IntoIterator for &'a DailySeries {
    type Item = &'a TimeSeriesPoint;
    type IntoIter = std::slice::Iter<'a, TimeSeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

pub type DepartmentHeadcount = BTreeMap<String, usize>;

pub type DepartmentProductivity = BTreeMap<String, Metric>;

/// All five views of one filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub fingerprint: String,
    pub record_count: usize,
    pub kpis: KpiSummary,
    pub top_employees: Vec<RankedEmployee>,
    pub time_series: DailySeries,
    pub headcount_by_department: DepartmentHeadcount,
    pub productivity_by_department: DepartmentProductivity,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardExportResult {
    pub file_path: String,
    pub fingerprint: String,
    pub generated_at: String,
}
