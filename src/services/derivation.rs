use chrono::Datelike;

use crate::models::employee::{EmployeeRecord, ProductivityRecord};

/// Productive share of clocked time as a percentage.
///
/// Undefined when clocked hours are zero or either side is missing. Values
/// above 100 are returned as-is.
pub fn productivity(productive_hours: Option<f64>, clocked_hours: Option<f64>) -> Option<f64> {
    match (productive_hours, clocked_hours) {
        (Some(productive), Some(clocked)) if clocked != 0.0 => Some(productive / clocked * 100.0),
        _ => None,
    }
}

pub fn derive_record(record: EmployeeRecord) -> ProductivityRecord {
    let productivity = productivity(record.productive_hours, record.clocked_hours);
    let year = record.date.year();
    ProductivityRecord {
        record,
        productivity,
        year,
    }
}
