use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use spyglass_core::coverage::{Counter, CoverageSource, FileCoverage};
use spyglass_core::{CoverageError, CoverageReport};

#[test]
fn test_parses_report_from_json() {
    let json = r#"{
        "src/a.ts": {
            "branches": {"covered": 1, "total": 2},
            "lines": {"covered": 8, "total": 10},
            "functions": {"covered": 0, "total": 0},
            "statements": {"covered": 5, "total": 5}
        }
    }"#;

    let report = CoverageReport::from_json_str(json).unwrap();
    assert_eq!(report.len(), 1);

    let summary = report.file_summary("src/a.ts").unwrap();
    assert_eq!(summary.branches, Some(50.0));
    assert_eq!(summary.lines, Some(80.0));
    assert_eq!(summary.functions, None);
    assert_eq!(summary.statements, Some(100.0));
}

#[test]
fn test_missing_metrics_parse_as_unmeasured() {
    let json = r#"{"src/a.ts": {"lines": {"covered": 3, "total": 4}}}"#;

    let report = CoverageReport::from_json_str(json).unwrap();
    let summary = report.file_summary("src/a.ts").unwrap();

    assert_eq!(summary.lines, Some(75.0));
    assert_eq!(summary.branches, None);
    assert_eq!(summary.statements, None);
}

#[test]
fn test_unknown_file_has_no_summary() {
    let report = CoverageReport::new();
    assert!(report.file_summary("src/missing.ts").is_none());
}

#[test]
fn test_run_summary_sums_counters_instead_of_averaging() {
    let mut report = CoverageReport::new();
    report.insert(
        "src/a.ts",
        FileCoverage {
            lines: Counter::new(1, 2),
            ..FileCoverage::default()
        },
    );
    report.insert(
        "src/b.ts",
        FileCoverage {
            lines: Counter::new(9, 10),
            ..FileCoverage::default()
        },
    );

    // 10 of 12 lines, not the 70% a percentage average would give
    let total = report.run_summary();
    assert_eq!(total.lines, Some(10.0 * 100.0 / 12.0));
    assert_eq!(total.branches, None);
}

#[test]
fn test_empty_report_has_unmeasured_totals() {
    let report = CoverageReport::new();
    assert!(report.is_empty());

    let total = report.run_summary();
    assert_eq!(total.lines, None);
    assert_eq!(total.branches, None);
    assert_eq!(total.functions, None);
    assert_eq!(total.statements, None);
}

#[test]
fn test_loads_report_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"src/a.ts": {{"lines": {{"covered": 2, "total": 4}}}}}}"#
    )
    .unwrap();

    let report = CoverageReport::from_file(file.path()).unwrap();
    assert_eq!(report.file_summary("src/a.ts").unwrap().lines, Some(50.0));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let result = CoverageReport::from_json_str("not json");
    assert!(matches!(result, Err(CoverageError::Parse(_))));
}

#[test]
fn test_missing_file_is_a_read_error() {
    let result = CoverageReport::from_file("/nonexistent/coverage.json");
    assert!(matches!(result, Err(CoverageError::Read(_))));
}
