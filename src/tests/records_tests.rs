use crate::records::{RecordStore, RecordsError, consider_score, format_records, parse_records};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_score_inserted_before_first_lower_entry() {
    let (scores, is_record) = consider_score(&[300, 200, 100], 250);
    assert_eq!(scores, vec![300, 250, 200]);
    assert!(is_record);
}

#[test]
fn test_new_best_goes_first() {
    let (scores, is_record) = consider_score(&[300, 200, 100], 1000);
    assert_eq!(scores, vec![1000, 300, 200]);
    assert!(is_record);
}

#[test]
fn test_low_score_leaves_list_alone() {
    let (scores, is_record) = consider_score(&[300, 200, 100], 50);
    assert_eq!(scores, vec![300, 200, 100]);
    assert!(!is_record);
}

#[test]
fn test_tie_is_not_a_record() {
    let (scores, is_record) = consider_score(&[300, 200, 100], 100);
    assert_eq!(scores, vec![300, 200, 100]);
    assert!(!is_record);

    let (scores, is_record) = consider_score(&[300, 200, 100], 200);
    assert_eq!(scores, vec![300, 200, 200]);
    assert!(is_record);
}

#[test]
fn test_empty_list_reports_record_without_storing() {
    let (scores, is_record) = consider_score(&[], 10);
    assert!(scores.is_empty());
    assert!(is_record);
}

#[test]
fn test_parse_records() {
    assert_eq!(parse_records("300;200;100").unwrap(), vec![300, 200, 100]);
    assert_eq!(parse_records("300;200;100\n").unwrap(), vec![300, 200, 100]);
    assert_eq!(parse_records(" 300 ; 200 ;").unwrap(), vec![300, 200]);
    assert!(parse_records("").unwrap().is_empty());
    assert!(parse_records("  \n").unwrap().is_empty());
}

#[test]
fn test_parse_keeps_file_order() {
    assert_eq!(parse_records("100;300;200").unwrap(), vec![100, 300, 200]);
}

#[test]
fn test_parse_rejects_garbage() {
    match parse_records("300;abc;100") {
        Err(RecordsError::Parse { value, .. }) => assert_eq!(value, "abc"),
        other => panic!("Expected parse error, got {other:?}"),
    }
    assert!(parse_records("300;;100").is_err());
    assert!(parse_records("-5").is_err());
}

#[test]
fn test_format_records() {
    assert_eq!(format_records(&[300, 250, 200]), "300;250;200");
    assert_eq!(format_records(&[]), "");
}

#[test]
fn test_load_missing_file_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let result = RecordStore::load(temp_dir.path().join("nope.txt"));
    assert!(matches!(result, Err(RecordsError::Io(_))));
}

#[test]
fn test_load_and_submit_rewrites_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("records.txt");
    fs::write(&path, "300;200;100").unwrap();

    let mut store = RecordStore::load(&path).unwrap();
    assert_eq!(store.scores(), &[300, 200, 100]);
    assert_eq!(store.path(), path.as_path());

    assert!(store.submit(250));
    assert_eq!(store.scores(), &[300, 250, 200]);
    assert_eq!(fs::read_to_string(&path).unwrap(), "300;250;200");

    let reloaded = RecordStore::load(&path).unwrap();
    assert_eq!(reloaded.scores(), &[300, 250, 200]);
}

#[test]
fn test_rejected_submit_does_not_write() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("records.txt");
    fs::write(&path, "300; 200; 100\n").unwrap();

    let mut store = RecordStore::load(&path).unwrap();
    assert!(!store.submit(90));

    assert_eq!(fs::read_to_string(&path).unwrap(), "300; 200; 100\n");
}

#[test]
fn test_submit_keeps_entry_when_save_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("missing_dir").join("records.txt");

    let mut store = RecordStore::with_scores(&path, vec![300, 200, 100]);
    assert!(store.submit(400));

    assert_eq!(store.scores(), &[400, 300, 200]);
    assert!(!path.exists());
}

#[test]
fn test_errors_display_the_cause() {
    let err = parse_records("x").unwrap_err();
    assert!(err.to_string().contains("\"x\""));
    assert!(std::error::Error::source(&err).is_some());
}
