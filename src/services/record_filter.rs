use tracing::debug;

use crate::models::dataset::{Dataset, FilterSpec, FilteredView};
use crate::models::employee::ProductivityRecord;

/// Whether a record satisfies all three predicates.
///
/// A record with a missing remote-work value never falls inside the range.
pub fn matches(record: &ProductivityRecord, spec: &FilterSpec) -> bool {
    spec.departments.contains(record.department())
        && spec.years.contains(&record.year)
        && record
            .record
            .remote_work_frequency
            .map(|value| spec.remote_range.contains(value))
            .unwrap_or(false)
}

pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let view = FilteredView::new(
        dataset
            .records()
            .iter()
            .filter(|record| matches(record, spec))
            .collect(),
    );
    debug!(
        target: "app::filter",
        total = dataset.len(),
        matched = view.len(),
        "filter applied"
    );
    view
}
