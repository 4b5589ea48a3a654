//! SQLite fixture helpers shared by the integration tests.

#![allow(dead_code)]

use std::path::Path;

use rusqlite::{Connection, params};

/// Create an empty benchmark database using the current schema revision
/// (`TimeUnit` plus `TimeUnitConversion`).
pub fn v2_database(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS FrameTimes
         (
             Id                     INTEGER PRIMARY KEY NOT NULL,
             Platform               TEXT                NOT NULL,
             YoloName               TEXT                NOT NULL,
             ObjectDetectorType     INTEGER             NOT NULL,
             ObjectDetectorBackEnd  INTEGER             NOT NULL,
             ObjectDetectorBlobSize INTEGER             NOT NULL,
             Repetition             INTEGER             NOT NULL,
             FrameNumber            INTEGER             NOT NULL,
             FrameTime              INTEGER             NOT NULL,
             TimeUnit               TEXT                NOT NULL,
             TimeUnitConversion     INTEGER             NOT NULL
         );",
    )
    .unwrap();
    conn
}

/// Create an empty benchmark database using the original schema revision
/// (`Unit` column, no conversion factor).
pub fn v1_database(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS FrameTimes
         (
             Id                     INTEGER PRIMARY KEY NOT NULL,
             Platform               TEXT                NOT NULL,
             YoloName               TEXT                NOT NULL,
             ObjectDetectorType     INTEGER             NOT NULL,
             ObjectDetectorBackEnd  INTEGER             NOT NULL,
             ObjectDetectorBlobSize INTEGER             NOT NULL,
             Repetition             INTEGER             NOT NULL,
             FrameNumber            INTEGER             NOT NULL,
             FrameTime              INTEGER             NOT NULL,
             Unit                   TEXT                NOT NULL
         );",
    )
    .unwrap();
    conn
}

/// Insert one V2 measurement row with unit "ms" and conversion 1000.
pub fn insert_v2(
    conn: &Connection,
    platform: &str,
    family: &str,
    mode: i64,
    backend: i64,
    blob_size: i64,
    repetition: i64,
    frame_number: i64,
    frame_time: f64,
) {
    conn.execute(
        "INSERT INTO FrameTimes \
         (Platform, YoloName, ObjectDetectorType, ObjectDetectorBackEnd, ObjectDetectorBlobSize, \
          Repetition, FrameNumber, FrameTime, TimeUnit, TimeUnitConversion) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'ms', 1000)",
        params![platform, family, mode, backend, blob_size, repetition, frame_number, frame_time],
    )
    .unwrap();
}

/// Insert one V1 measurement row with unit "ms".
pub fn insert_v1(
    conn: &Connection,
    platform: &str,
    family: &str,
    mode: i64,
    backend: i64,
    blob_size: i64,
    repetition: i64,
    frame_number: i64,
    frame_time: f64,
) {
    conn.execute(
        "INSERT INTO FrameTimes \
         (Platform, YoloName, ObjectDetectorType, ObjectDetectorBackEnd, ObjectDetectorBlobSize, \
          Repetition, FrameNumber, FrameTime, Unit) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'ms')",
        params![platform, family, mode, backend, blob_size, repetition, frame_number, frame_time],
    )
    .unwrap();
}

/// Insert every repetition of one configuration, frame numbers starting at 1.
pub fn insert_run_v2(
    conn: &Connection,
    platform: &str,
    family: &str,
    (mode, backend, blob_size): (i64, i64, i64),
    repetitions: &[&[f64]],
) {
    for (repetition, times) in repetitions.iter().enumerate() {
        for (index, &time) in times.iter().enumerate() {
            insert_v2(
                conn,
                platform,
                family,
                mode,
                backend,
                blob_size,
                repetition as i64,
                index as i64 + 1,
                time,
            );
        }
    }
}

/// A small but complete platform: baseline plus tiny/full runs on two
/// backends, two repetitions of two frames each.
pub fn standard_platform(conn: &Connection, platform: &str, base: f64) {
    insert_run_v2(
        conn,
        platform,
        "YOLOv7",
        (0, 0, 0),
        &[&[base, base + 10.0], &[base + 20.0, base + 30.0]],
    );
    for (config, offset) in [
        ((1, 1, 288), 100.0),
        ((1, 2, 288), 150.0),
        ((2, 1, 288), 200.0),
        ((2, 2, 288), 250.0),
    ] {
        insert_run_v2(
            conn,
            platform,
            "YOLOv7",
            config,
            &[
                &[base + offset, base + offset + 10.0],
                &[base + offset + 20.0, base + offset + 30.0],
            ],
        );
    }
}
