//! Integration tests for the validation battery over real database files.

mod common;

use std::path::PathBuf;

use common::{insert_run_v2, insert_v1, insert_v2, standard_platform, v1_database, v2_database};
use perfgraphs_rs::{Error, data};
use tempfile::TempDir;

fn violations(err: Error) -> Vec<String> {
    match err {
        Error::DataQuality(violations) => violations,
        other => panic!("expected DataQuality, got: {other}"),
    }
}

#[test]
fn valid_database_passes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v2_database(&path);
    standard_platform(&conn, "Windows Desktop", 10.0);
    standard_platform(&conn, "Jetson Nano", 100.0);
    drop(conn);

    data::validate(&[path.clone()], "all").unwrap();
    data::validate(&[path], "Windows Desktop").unwrap();
}

#[test]
fn missing_database_reported_before_any_query() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.db");

    let err = data::validate(&[missing.clone()], "all").unwrap_err();
    match err {
        Error::SourceNotFound(path) => assert_eq!(path, missing),
        other => panic!("expected SourceNotFound, got: {other}"),
    }
}

#[test]
fn mixed_family_names_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v2_database(&path);
    insert_v2(&conn, "Desktop", "YOLOv4", 0, 0, 0, 0, 1, 10.0);
    insert_v2(&conn, "Desktop", "YOLOv7", 0, 0, 0, 0, 2, 20.0);
    drop(conn);

    let found = violations(data::validate(&[path], "all").unwrap_err());
    assert!(found.iter().any(|v| v.contains("YOLO names")), "{found:?}");
}

#[test]
fn baseline_rows_must_not_carry_backend_or_resolution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v2_database(&path);
    insert_v2(&conn, "Desktop", "YOLOv7", 0, 1, 288, 0, 1, 10.0);
    drop(conn);

    let found = violations(data::validate(&[path], "all").unwrap_err());
    assert!(
        found
            .iter()
            .any(|v| v.contains("ObjectDetectorType is zero")),
        "{found:?}"
    );
}

#[test]
fn detector_rows_must_carry_backend_and_resolution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v2_database(&path);
    insert_v2(&conn, "Desktop", "YOLOv7", 1, 0, 288, 0, 1, 10.0);
    drop(conn);

    let found = violations(data::validate(&[path], "all").unwrap_err());
    assert!(
        found
            .iter()
            .any(|v| v.contains("ObjectDetectorType is non-zero")),
        "{found:?}"
    );
}

#[test]
fn enum_domains_are_enforced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v2_database(&path);
    insert_v2(&conn, "Desktop", "YOLOv7", 7, 1, 288, 0, 1, 10.0);
    insert_v2(&conn, "Desktop", "YOLOv7", 1, 9, 288, 0, 1, 10.0);
    insert_v2(&conn, "Desktop", "YOLOv7", 1, 1, 400, 0, 1, 10.0);
    drop(conn);

    let found = violations(data::validate(&[path], "all").unwrap_err());
    assert!(
        found.iter().any(|v| v.contains("ObjectDetectorType")),
        "{found:?}"
    );
    assert!(
        found.iter().any(|v| v.contains("ObjectDetectorBackEnd")),
        "{found:?}"
    );
    assert!(
        found.iter().any(|v| v.contains("ObjectDetectorBlobSize")),
        "{found:?}"
    );
}

#[test]
fn every_violation_is_collected_not_just_the_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v2_database(&path);
    // Two distinct problems: mixed family names and a baseline carrying a
    // backend.
    insert_v2(&conn, "Desktop", "YOLOv4", 0, 0, 0, 0, 1, 10.0);
    insert_v2(&conn, "Desktop", "YOLOv7", 0, 1, 288, 0, 1, 20.0);
    drop(conn);

    let found = violations(data::validate(&[path], "all").unwrap_err());
    assert!(found.len() >= 2, "{found:?}");
    assert!(found.iter().any(|v| v.contains("YOLO names")), "{found:?}");
    assert!(
        found
            .iter()
            .any(|v| v.contains("ObjectDetectorType is zero")),
        "{found:?}"
    );
}

#[test]
fn requested_platform_must_occur_unless_all() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v2_database(&path);
    standard_platform(&conn, "Windows Desktop", 10.0);
    drop(conn);

    let found = violations(data::validate(&[path.clone()], "Mac Desktop").unwrap_err());
    assert!(found.iter().any(|v| v.contains("Mac Desktop")), "{found:?}");

    // The sentinel bypasses the presence check entirely.
    data::validate(&[path], "all").unwrap();
}

#[test]
fn frame_count_mismatch_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v2_database(&path);
    insert_run_v2(&conn, "Desktop", "YOLOv7", (0, 0, 0), &[&[10.0, 20.0]]);
    insert_run_v2(
        &conn,
        "Desktop",
        "YOLOv7",
        (1, 1, 288),
        &[&[10.0, 20.0, 30.0]],
    );
    drop(conn);

    let found = violations(data::validate(&[path], "all").unwrap_err());
    assert!(
        found.iter().any(|v| v.contains("frame counts")),
        "{found:?}"
    );
}

#[test]
fn cross_source_test_sets_must_match() {
    let dir = TempDir::new().unwrap();
    let path_a = dir.path().join("a.db");
    let path_b = dir.path().join("b.db");

    let conn = v2_database(&path_a);
    insert_run_v2(&conn, "Ubuntu Desktop", "YOLOv7", (0, 0, 0), &[&[10.0, 20.0]]);
    insert_run_v2(&conn, "Ubuntu Desktop", "YOLOv7", (1, 1, 288), &[&[30.0, 40.0]]);
    drop(conn);

    let conn = v2_database(&path_b);
    insert_run_v2(&conn, "Jetson Nano", "YOLOv7", (0, 0, 0), &[&[10.0, 20.0]]);
    insert_run_v2(&conn, "Jetson Nano", "YOLOv7", (1, 2, 288), &[&[30.0, 40.0]]);
    drop(conn);

    let found = violations(data::validate(&[path_a, path_b], "all").unwrap_err());
    assert!(
        found.iter().any(|v| v.contains("different tests")),
        "{found:?}"
    );
}

#[test]
fn multi_source_requires_one_platform_per_source() {
    let dir = TempDir::new().unwrap();
    let path_a = dir.path().join("a.db");
    let path_b = dir.path().join("b.db");

    let conn = v2_database(&path_a);
    standard_platform(&conn, "Ubuntu Desktop", 10.0);
    standard_platform(&conn, "Windows Desktop", 20.0);
    drop(conn);

    let conn = v2_database(&path_b);
    standard_platform(&conn, "Jetson Nano", 100.0);
    drop(conn);

    let found = violations(data::validate(&[path_a, path_b], "all").unwrap_err());
    assert!(
        found.iter().any(|v| v.contains("exactly one platform")),
        "{found:?}"
    );
}

#[test]
fn cross_source_units_and_conversions_must_match() {
    let dir = TempDir::new().unwrap();
    let path_a = dir.path().join("a.db");
    let path_b = dir.path().join("b.db");

    // Same measurements, different stored units: one V2 source in ms and
    // one V1 source whose derived conversion factor differs.
    let conn = v2_database(&path_a);
    insert_run_v2(&conn, "Ubuntu Desktop", "YOLOv7", (0, 0, 0), &[&[10.0, 20.0]]);
    drop(conn);

    let conn = v1_database(&path_b);
    insert_v1(&conn, "Jetson Nano", "YOLOv7", 0, 0, 0, 0, 1, 10.0);
    insert_v1(&conn, "Jetson Nano", "YOLOv7", 0, 0, 0, 0, 2, 20.0);
    conn.execute("UPDATE FrameTimes SET Unit = 'us'", [])
        .unwrap();
    drop(conn);

    let found = violations(data::validate(&[path_a, path_b], "all").unwrap_err());
    assert!(found.iter().any(|v| v.contains("time units")), "{found:?}");
    assert!(
        found.iter().any(|v| v.contains("conversion factors")),
        "{found:?}"
    );
}

#[test]
fn unknown_time_unit_without_conversion_column_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.db");
    let conn = v1_database(&path);
    insert_v1(&conn, "Desktop", "YOLOv7", 0, 0, 0, 0, 1, 10.0);
    conn.execute("UPDATE FrameTimes SET Unit = 'fortnights'", [])
        .unwrap();
    drop(conn);

    let found = violations(data::validate(&[path], "all").unwrap_err());
    assert!(found.iter().any(|v| v.contains("fortnights")), "{found:?}");
}

#[test]
fn error_message_lists_every_violation() {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("bench.db");
    let conn = v2_database(&path);
    insert_v2(&conn, "Desktop", "YOLOv4", 0, 0, 0, 0, 1, 10.0);
    insert_v2(&conn, "Desktop", "YOLOv7", 0, 1, 288, 0, 1, 20.0);
    drop(conn);

    let message = data::validate(&[path], "all").unwrap_err().to_string();
    assert!(message.contains("YOLO names"), "{message}");
    assert!(message.contains("ObjectDetectorType is zero"), "{message}");
}
