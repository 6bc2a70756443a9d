//! End-to-end tests for the export parsing pipeline

use super::{ExportBuilder, TestSample, write_utf16};
use crate::app::models::Cell;
use crate::app::services::psd_parser::{ExportSource, PsdParser, SkipReason};
use crate::config::ParserConfig;
use crate::constants::{BATCH, INTERMEDIATE_FORM, LABEL_OU_SR, METHOD_SHORT, MRA_NO, TRIAL};
use crate::{Error, ErrorKind};
use std::io::Write;
use tempfile::NamedTempFile;

fn parser() -> PsdParser {
    PsdParser::new(ParserConfig::default()).unwrap()
}

#[test]
fn test_well_formed_export_yields_one_record_per_sample_and_class() {
    let file = ExportBuilder::new().write();
    let result = parser().parse_file(file.path()).unwrap();

    // 3 samples x (reference column + 100 size classes)
    assert_eq!(result.records.len(), 303);
    assert_eq!(result.stats.blank_rows, vec![5, 10]);
    assert_eq!(result.stats.measurement_rows, 100);
    assert_eq!(result.stats.chart_rows, 3);
    assert_eq!(result.stats.data_points, 300);
    assert!(result.stats.skipped_points.is_empty());
}

#[test]
fn test_reference_column_comes_first_with_zero_value() {
    let file = ExportBuilder::new().write();
    let records = parser().parse_file(file.path()).unwrap().records;

    for record in &records[..3] {
        assert_eq!(record.size_class, Cell::Text("0.1".into()));
        assert_eq!(record.value, Some(0.0));
    }
    assert_eq!(records[3].size_class, Cell::Number(0.2));
    assert_eq!(records[3].value, Some(ExportBuilder::value(0, 0)));
    assert_eq!(records[302].size_class, Cell::Number(24.95));
    assert_eq!(records[302].value, Some(ExportBuilder::value(2, 99)));
}

#[test]
fn test_record_fields_are_decomposed_and_renamed() {
    let file = ExportBuilder::new().write();
    let records = parser().parse_file(file.path()).unwrap().records;

    let names: Vec<&str> = records[0].fields.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![METHOD_SHORT, TRIAL, INTERMEDIATE_FORM, BATCH, MRA_NO, LABEL_OU_SR, "Obscuration"]
    );

    let first = &records[0];
    assert_eq!(first.field(METHOD_SHORT), Some(&Cell::Text("M2".into())));
    assert_eq!(first.field(TRIAL), Some(&Cell::Text("XYZ12-3A4".into())));
    assert_eq!(first.field(INTERMEDIATE_FORM), Some(&Cell::Text("granulate".into())));
    assert_eq!(first.field(BATCH), Some(&Cell::Text("XYZ12-3A4".into())));
    assert_eq!(first.field(MRA_NO), Some(&Cell::Text("MRA-001".into())));
    assert_eq!(first.field(LABEL_OU_SR), Some(&Cell::Text("XYZ12-3A4 granulate".into())));
    assert_eq!(first.field("Obscuration"), Some(&Cell::Number(12.5)));

    let free_text = &records[2];
    assert_eq!(free_text.field(METHOD_SHORT), Some(&Cell::Empty));
    assert_eq!(free_text.field(TRIAL), Some(&Cell::Text("Free".into())));
    assert_eq!(free_text.field(INTERMEDIATE_FORM), Some(&Cell::Text("text sample".into())));
    assert_eq!(free_text.field(BATCH), Some(&Cell::Text("Free".into())));
}

#[test]
fn test_empty_metadata_sample_contributes_no_records() {
    let file = ExportBuilder::new().with_empty_metadata_sample("S4").write();
    let result = parser().parse_file(file.path()).unwrap();

    assert_eq!(result.records.len(), 303);
    assert_eq!(result.stats.metadata_samples, 4);
    assert_eq!(result.stats.empty_samples_dropped, 1);
}

#[test]
fn test_sample_columns_past_first_blank_line_are_ignored_by_default() {
    let file = ExportBuilder::new().with_measurement_only_sample("S9").write();
    let result = parser().parse_file(file.path()).unwrap();

    assert_eq!(result.records.len(), 303);
    assert_eq!(result.stats.columns_outside_window, 1);
    assert!(result.stats.skipped_points.is_empty());
}

#[test]
fn test_unknown_sample_is_skipped_when_all_columns_are_read() {
    let file = ExportBuilder::new().with_measurement_only_sample("S9").write();
    let parser = PsdParser::new(ParserConfig::default().with_all_sample_columns()).unwrap();
    let result = parser.parse_file(file.path()).unwrap();

    assert_eq!(result.records.len(), 303);
    assert_eq!(result.stats.skipped_points.len(), 100);
    assert!(
        result
            .stats
            .skipped_points
            .iter()
            .all(|p| p.sample == "S9" && p.reason == SkipReason::UnknownSample)
    );
}

#[test]
fn test_fewer_size_classes_melt_only_size_class_columns() {
    let file = ExportBuilder::new().with_bins(2).write();
    let records = parser().parse_file(file.path()).unwrap().records;

    // 3 samples x (reference column + 2 size classes)
    assert_eq!(records.len(), 9);
    assert!(records.iter().all(|r| r.field("Obscuration").is_some()));
    assert!(records[3..].iter().all(|r| matches!(r.size_class, Cell::Number(_))));
}

#[test]
fn test_size_class_json_types() {
    let file = ExportBuilder::new().write();
    let records = parser().parse_file(file.path()).unwrap().records;
    let json: serde_json::Value = serde_json::to_value(&records).unwrap();

    assert_eq!(json[0]["Size_class"], serde_json::json!("0.1"));
    assert!(json[3]["Size_class"].is_number());
    assert_eq!(json[3]["Size_class"].as_f64(), Some(0.2));
}

#[test]
fn test_missing_second_blank_row_is_structural_error() {
    let file = ExportBuilder::new().without_second_blank().write();
    let err = parser().parse_file(file.path()).unwrap_err();

    assert!(matches!(err, Error::Structural { found: 1, .. }));
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("Check file format"));
}

#[test]
fn test_shared_label_fails_positional_join() {
    let samples = vec![
        TestSample::new("S1", "MRA-001", "M1:ABC12-3D same", "1"),
        TestSample::new("S2", "MRA-002", "M1:ABC12-3D same", "2"),
    ];
    let file = ExportBuilder::new().with_samples(samples).write();
    let err = parser().parse_file(file.path()).unwrap_err();

    assert!(matches!(
        err,
        Error::RowCountMismatch {
            metadata_rows: 2,
            chart_rows: 1
        }
    ));
}

#[test]
fn test_non_numeric_metadata_attribute_is_processing_error() {
    let samples = vec![
        TestSample::new("S1", "MRA-001", "Label one", "12,5"),
        TestSample::new("S2", "MRA-002", "Label two", "cloudy"),
    ];
    let file = ExportBuilder::new().with_samples(samples).write();
    let err = parser().parse_file(file.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Processing);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = parser()
        .parse_file(std::path::Path::new("/nonexistent/export.txt"))
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert_eq!(err.kind(), ErrorKind::Read);
}

#[test]
fn test_truncated_utf16_is_decoding_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0xFF, 0xFE, 0x41, 0x00, 0x42]).unwrap();
    file.flush().unwrap();

    let err = parser().parse_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::Decoding { .. }));
}

#[test]
fn test_text_only_file_without_blank_rows() {
    let file = write_utf16("just one line\r\nand another\r\n");
    let err = parser().parse_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::Structural { found: 0, .. }));
}

#[test]
fn test_parse_source_matches_parse_file() {
    let builder = ExportBuilder::new();
    let file = builder.write();
    let source = ExportSource::from_text("in-memory.txt", &builder.build());

    let from_file = parser().parse_file(file.path()).unwrap().records;
    let from_source = parser().parse_source(&source).unwrap().records;
    assert_eq!(from_file, from_source);
}

#[test]
fn test_parsing_twice_gives_identical_records() {
    let file = ExportBuilder::new().write();
    let parser = parser();

    let first = parser.parse_file(file.path()).unwrap().records;
    let second = parser.parse_file(file.path()).unwrap().records;
    assert_eq!(first, second);
}
