use pulseboard_app_lib::models::employee::REQUIRED_COLUMNS;
use pulseboard_app_lib::{load, SchemaErrorKind};

const SAMPLE: &str = include_str!("../fixtures/productivity_sample.csv");

fn without_column(csv: &str, column: &str) -> String {
    let mut lines = csv.lines();
    let header: Vec<&str> = lines.next().expect("header").split(',').collect();
    let drop = header
        .iter()
        .position(|name| *name == column)
        .expect("column present");

    let mut out = Vec::new();
    for line in std::iter::once(header.join(",")).chain(lines.map(str::to_string)) {
        let kept: Vec<&str> = line
            .split(',')
            .enumerate()
            .filter(|(idx, _)| *idx != drop)
            .map(|(_, value)| value)
            .collect();
        out.push(kept.join(","));
    }
    out.join("\n")
}

#[test]
fn missing_date_column_is_reported_by_name() {
    let csv = without_column(SAMPLE, "Date");
    let err = load(csv.as_bytes()).expect_err("schema error");
    assert_eq!(err.kind, SchemaErrorKind::MissingColumn);
    assert_eq!(err.column.as_deref(), Some("Date"));
    assert_eq!(err.row, None);
}

#[test]
fn every_required_column_is_enforced() {
    for column in REQUIRED_COLUMNS {
        let csv = without_column(SAMPLE, column);
        let err = load(csv.as_bytes()).expect_err("schema error");
        assert_eq!(err.kind, SchemaErrorKind::MissingColumn, "column {column}");
        assert_eq!(err.column.as_deref(), Some(column));
    }
}

#[test]
fn bad_date_fails_the_whole_upload() {
    let csv = SAMPLE.replacen("2024-01-03,E005", "2024-02-30,E005", 1);
    let err = load(csv.as_bytes()).expect_err("invalid date");
    assert_eq!(err.kind, SchemaErrorKind::InvalidDate);
    assert_eq!(err.row, Some(7));
}

#[test]
fn blank_date_is_invalid() {
    let csv = SAMPLE.replacen("2023-12-30,E002", ",E002", 1);
    let err = load(csv.as_bytes()).expect_err("blank date");
    assert_eq!(err.kind, SchemaErrorKind::InvalidDate);
    assert_eq!(err.row, Some(2));
}

#[test]
fn empty_upload_is_unreadable() {
    let err = load(b"").expect_err("empty input");
    assert_eq!(err.kind, SchemaErrorKind::UnreadableInput);
    assert_eq!(err.column, None);
    assert_eq!(err.kind.as_str(), "UNREADABLE_INPUT");
}

#[test]
fn same_bytes_fail_the_same_way() {
    let csv = without_column(SAMPLE, "Department");
    let first = load(csv.as_bytes()).expect_err("first");
    let second = load(csv.as_bytes()).expect_err("second");
    assert_eq!(first, second);
}
