use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::employee::ProductivityRecord;

pub const REMOTE_MIN: f64 = 0.0;
pub const REMOTE_MAX: f64 = 100.0;

/// Validated and derived records of one upload. Never mutated after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    fingerprint: String,
    records: Vec<ProductivityRecord>,
    missing_cells: BTreeMap<String, usize>,
}

impl Dataset {
    pub fn new(
        fingerprint: impl Into<String>,
        records: Vec<ProductivityRecord>,
        missing_cells: BTreeMap<String, usize>,
    ) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            records,
            missing_cells,
        }
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn records(&self) -> &[ProductivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of numeric cells per column that could not be parsed.
    pub fn missing_cells(&self) -> &BTreeMap<String, usize> {
        &self.missing_cells
    }

    pub fn departments(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|record| record.department().to_string())
            .collect()
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|record| record.year).collect()
    }
}

/// Inclusive bounds on `remote_work_frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemoteRange {
    pub low: f64,
    pub high: f64,
}

impl RemoteRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn full() -> Self {
        Self::new(REMOTE_MIN, REMOTE_MAX)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl Default for RemoteRange {
    fn default() -> Self {
        Self::full()
    }
}

/// Conjunctive predicate over a dataset. An empty set admits nothing, so both
/// sets must be spelled out; only the remote range defaults to the full span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub departments: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    #[serde(default)]
    pub remote_range: RemoteRange,
}

impl FilterSpec {
    pub fn new(
        departments: impl IntoIterator<Item = impl Into<String>>,
        years: impl IntoIterator<Item = i32>,
        remote_range: RemoteRange,
    ) -> Self {
        Self {
            departments: departments.into_iter().map(Into::into).collect(),
            years: years.into_iter().collect(),
            remote_range,
        }
    }

    /// Every department and year present in the dataset, full remote range.
    pub fn select_all(dataset: &Dataset) -> Self {
        Self {
            departments: dataset.departments(),
            years: dataset.years(),
            remote_range: RemoteRange::full(),
        }
    }
}

/// Ordered subset of a dataset, borrowing its records.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a ProductivityRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn new(records: Vec<&'a ProductivityRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[&'a ProductivityRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ProductivityRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Choices for populating filter controls, taken from the full dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub years: Vec<i32>,
    pub remote_step: u32,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset, remote_step: u32) -> Self {
        Self {
            departments: dataset.departments().into_iter().collect(),
            years: dataset.years().into_iter().collect(),
            remote_step,
        }
    }
}
