use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::models::dataset::Dataset;
use crate::models::employee::*;
use crate::services::derivation::derive_record;
use crate::utils::fingerprint::content_fingerprint;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate and derive an upload in one pass.
///
/// Pure in its input bytes: the same bytes always produce the same dataset or
/// the same error, which is what makes fingerprint memoization sound.
pub fn load(raw: &[u8]) -> Result<Dataset, SchemaError> {
    let fingerprint = content_fingerprint(raw);
    load_with_fingerprint(raw, fingerprint)
}

pub(crate) fn load_with_fingerprint(raw: &[u8], fingerprint: String) -> Result<Dataset, SchemaError> {
    let (records, missing_cells) = parse_records(raw)?;
    let derived = records.into_iter().map(derive_record).collect::<Vec<_>>();

    if !missing_cells.is_empty() {
        let total: usize = missing_cells.values().sum();
        warn!(
            target: "app::ingest",
            total,
            columns = ?missing_cells,
            "non-numeric cells treated as missing"
        );
    }

    debug!(
        target: "app::ingest",
        fingerprint = %fingerprint,
        records = derived.len(),
        "dataset loaded"
    );

    Ok(Dataset::new(fingerprint, derived, missing_cells))
}

/// Positions of the required columns inside the header row.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, SchemaError> {
        let by_name: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim_start_matches('\u{feff}'), idx))
            .collect();

        let mut positions = HashMap::with_capacity(REQUIRED_COLUMNS.len());
        for column in REQUIRED_COLUMNS {
            match by_name.get(column) {
                Some(idx) => {
                    positions.insert(column, *idx);
                }
                None => return Err(SchemaError::missing_column(column)),
            }
        }

        Ok(Self { positions })
    }

    fn text<'r>(&self, row: &'r StringRecord, column: &'static str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|idx| row.get(*idx))
            .unwrap_or("")
    }
}

struct RowReader<'a> {
    columns: &'a ColumnIndex,
    missing_cells: &'a mut BTreeMap<String, usize>,
}

impl RowReader<'_> {
    fn number(&mut self, row: &StringRecord, column: &'static str) -> Option<f64> {
        let parsed = parse_number(self.columns.text(row, column));
        if parsed.is_none() {
            *self.missing_cells.entry(column.to_string()).or_insert(0) += 1;
        }
        parsed
    }

    fn record(&mut self, row: &StringRecord, row_number: usize) -> Result<EmployeeRecord, SchemaError> {
        let raw_date = self.columns.text(row, COL_DATE);
        let date = parse_date(raw_date).ok_or_else(|| SchemaError::invalid_date(row_number, raw_date))?;

        Ok(EmployeeRecord {
            date,
            employee_id: self.columns.text(row, COL_EMPLOYEE_ID).to_string(),
            employee_name: self.columns.text(row, COL_EMPLOYEE_NAME).to_string(),
            department: self.columns.text(row, COL_DEPARTMENT).to_string(),
            job_title: self.columns.text(row, COL_JOB_TITLE).to_string(),
            gender: self.columns.text(row, COL_GENDER).to_string(),
            project: self.columns.text(row, COL_PROJECT).to_string(),
            years_at_company: self.number(row, COL_YEARS_AT_COMPANY),
            performance_score: self.number(row, COL_PERFORMANCE_SCORE),
            monthly_salary: self.number(row, COL_MONTHLY_SALARY),
            clocked_hours: self.number(row, COL_CLOCKED_HOURS),
            productive_hours: self.number(row, COL_PRODUCTIVE_HOURS),
            tasks_completed: self.number(row, COL_TASKS_COMPLETED),
            meetings: self.number(row, COL_MEETINGS),
            break_hours: self.number(row, COL_BREAK_HOURS),
            training_hours: self.number(row, COL_TRAINING_HOURS),
            overtime_hours: self.number(row, COL_OVERTIME_HOURS),
            remote_work_frequency: self.number(row, COL_REMOTE_WORK_FREQUENCY),
            employee_satisfaction_score: self.number(row, COL_SATISFACTION_SCORE),
        })
    }
}

/// Parse the raw CSV into validated records plus per-column missing-cell counts.
pub fn parse_records(
    raw: &[u8],
) -> Result<(Vec<EmployeeRecord>, BTreeMap<String, usize>), SchemaError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(raw);

    let headers = reader
        .headers()
        .map_err(|err| SchemaError::unreadable(None, err.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(SchemaError::unreadable(None, "input has no header row"));
    }
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut missing_cells = BTreeMap::new();
    let mut records = Vec::new();
    let mut row_reader = RowReader {
        columns: &columns,
        missing_cells: &mut missing_cells,
    };

    for (idx, result) in reader.records().enumerate() {
        let row_number = idx + 1;
        let row = result.map_err(|err| SchemaError::unreadable(Some(row_number), err.to_string()))?;
        records.push(row_reader.record(&row, row_number)?);
    }

    Ok((records, missing_cells))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Numeric cell parser. Blank, non-numeric and non-finite text is missing.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}
