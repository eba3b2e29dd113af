//! File-level snapshot behavior: real reads and writes through a
//! temporary directory.

use gridlock_engine::matrix;
use gridlock_io::{
    expected_deadlock, load, load_sample, sample_names, save, SnapshotError, SCHEMA_VERSION,
};
use std::fs;

#[test]
fn every_sample_matches_its_registered_verdict() {
    for name in sample_names() {
        let state = load_sample(name).unwrap();
        let expected = expected_deadlock(name).unwrap();
        assert_eq!(
            matrix::detect(&state).deadlocked,
            expected,
            "sample {name} verdict mismatch"
        );
    }
}

#[test]
fn save_then_load_every_sample() {
    let dir = tempfile::tempdir().unwrap();

    for name in sample_names() {
        let state = load_sample(name).unwrap();
        let path = dir.path().join(format!("{name}.json"));

        save(&state, &path).unwrap();
        let back = load(&path).unwrap();

        assert_eq!(back, state, "sample {name} should round-trip");
    }
}

#[test]
fn loaded_state_gets_the_same_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let state = load_sample("single-instance-deadlock").unwrap();
    let path = dir.path().join("state.json");

    save(&state, &path).unwrap();
    let back = load(&path).unwrap();

    let before = matrix::detect(&state);
    let after = matrix::detect(&back);
    assert_eq!(before.deadlocked, after.deadlocked);
    assert_eq!(before.deadlocked_processes, after.deadlocked_processes);
}

#[test]
fn saved_file_declares_the_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let state = load_sample("empty-template").unwrap();
    let path = dir.path().join("state.json");

    save(&state, &path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["schema_version"], SCHEMA_VERSION);
}

#[test]
fn missing_schema_version_is_rejected_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_version.json");
    fs::write(&path, r#"{"processes": [], "resource_types": []}"#).unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::MissingSchemaVersion));
}

#[test]
fn non_object_document_is_a_json_error_not_a_missing_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("array.json");
    fs::write(&path, "[]").unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
}

#[test]
fn malformed_json_is_an_io_layer_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load("/nonexistent/path/state.json").unwrap_err();
    assert!(matches!(err, SnapshotError::Io(_)));
}

#[test]
fn hand_edited_negative_cell_reaches_the_validator() {
    let dir = tempfile::tempdir().unwrap();
    let state = load_sample("empty-template").unwrap();
    let path = dir.path().join("state.json");
    save(&state, &path).unwrap();

    let mut json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    json["request"][0][0] = serde_json::json!(-3);
    fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::Invalid(_)));
}
