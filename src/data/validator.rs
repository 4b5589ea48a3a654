//! Consistency checks over one or more benchmark databases.
//!
//! The full battery always runs to completion: every failed check appends a
//! violation description, and the caller gets a single [`Error::DataQuality`]
//! listing everything found. One run, one complete diagnosis.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::params;
use tracing::debug;

use crate::data::ALL_PLATFORMS;
use crate::data::database::Database;
use crate::data::schema::{self, BLOB_SIZES, SchemaVersion, TestConfig};
use crate::error::{Error, Result};

/// Facts collected from one source while validating it, compared across
/// sources afterwards.
struct SourceSummary {
    path: PathBuf,
    family: Option<String>,
    unit: Option<String>,
    conversion: Option<i64>,
    frames_per_repetition: Option<i64>,
    configs: BTreeSet<TestConfig>,
    platforms: Vec<String>,
}

/// Validate every source in turn, then their cross-source consistency.
///
/// `requested_platform` is checked for presence unless it is the `"all"`
/// sentinel. Query failures abort immediately; check failures are collected
/// and raised together once the whole battery has run.
pub fn validate(sources: &[PathBuf], requested_platform: &str) -> Result<()> {
    let mut violations = Vec::new();
    let mut summaries = Vec::with_capacity(sources.len());
    let multi_source = sources.len() > 1;

    for path in sources {
        let db = Database::open(path)?;
        let summary = validate_source(&db, requested_platform, multi_source, &mut violations)?;
        summaries.push(summary);
        debug!(path = %path.display(), violations = violations.len(), "validated source");
    }

    if multi_source {
        validate_across_sources(&summaries, &mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::DataQuality(violations))
    }
}

fn validate_source(
    db: &Database,
    requested_platform: &str,
    multi_source: bool,
    violations: &mut Vec<String>,
) -> Result<SourceSummary> {
    let schema = db.schema_version()?;
    let path = db.path().to_path_buf();
    let here = path.display().to_string();

    // Exactly one detector family name.
    let families = db.query_column::<String, _>(
        "SELECT DISTINCT YoloName FROM FrameTimes ORDER BY YoloName",
        [],
    )?;
    if families.is_empty() {
        violations.push(format!("Expected measurements in '{here}' but found none!"));
    } else if families.len() > 1 {
        violations.push(format!(
            "Expected identical YOLO names across all tests in '{here}' but found different YOLO names!"
        ));
    }
    let family = (families.len() == 1).then(|| families[0].clone());

    // Exactly one time unit, and one conversion factor where present.
    let units = db.query_column::<String, _>(
        &format!(
            "SELECT DISTINCT {col} FROM FrameTimes ORDER BY {col}",
            col = schema.time_unit_column
        ),
        [],
    )?;
    if units.len() > 1 {
        violations.push(format!(
            "Expected identical time units across all tests in '{here}' but found different time units!"
        ));
    }
    let unit = (units.len() == 1).then(|| units[0].clone());

    let conversion = unit_conversion(db, schema, unit.as_deref(), &here, violations)?;

    // Identical frame counts for every (platform, configuration, repetition)
    // group. Platform is part of the grouping so a source holding several
    // platforms is checked across all of them in one pass.
    let frame_counts = db.query_column::<i64, _>(
        "SELECT DISTINCT COUNT(*) FROM FrameTimes \
         GROUP BY Platform, ObjectDetectorType, ObjectDetectorBackEnd, ObjectDetectorBlobSize, Repetition",
        [],
    )?;
    if frame_counts.len() > 1 {
        violations.push(format!(
            "Expected identical frame counts across all tests in '{here}' but found different frame counts!"
        ));
    }
    let frames_per_repetition = (frame_counts.len() == 1).then(|| frame_counts[0]);

    // Identical configuration sets across the platforms of this source.
    let configs_per_platform = db.query_column::<i64, _>(
        "WITH Configurations AS \
         ( \
             SELECT DISTINCT Platform, ObjectDetectorType, ObjectDetectorBackEnd, ObjectDetectorBlobSize \
             FROM FrameTimes \
         ) \
         SELECT DISTINCT COUNT(*) FROM Configurations GROUP BY Platform",
        [],
    )?;
    if configs_per_platform.len() > 1 {
        violations.push(format!(
            "Expected identical tests across all platforms in '{here}' but found different tests!"
        ));
    }

    check_enum_domains(db, schema, &here, violations)?;
    check_mode_coupling(db, &here, violations)?;

    // The requested platform must actually occur; "all" bypasses this.
    if requested_platform != ALL_PLATFORMS {
        let rows: i64 = db.query_scalar(
            "SELECT COUNT(*) FROM FrameTimes WHERE Platform = ?1",
            params![requested_platform],
        )?;
        if rows == 0 {
            violations.push(format!(
                "Expected the platform '{requested_platform}' to be found in '{here}' but it was not found!"
            ));
        }
    }

    let platforms = db.query_column::<String, _>(
        "SELECT DISTINCT Platform FROM FrameTimes ORDER BY Platform",
        [],
    )?;
    if multi_source && platforms.len() != 1 {
        violations.push(format!(
            "Expected exactly one platform in '{here}' but found {}!",
            platforms.len()
        ));
    }

    let configs = db
        .query_rows(
            "SELECT DISTINCT ObjectDetectorType, ObjectDetectorBackEnd, ObjectDetectorBlobSize FROM FrameTimes",
            [],
            |row| Ok(TestConfig::new(row.get(0)?, row.get(1)?, row.get(2)?)),
        )?
        .into_iter()
        .collect::<BTreeSet<_>>();

    Ok(SourceSummary {
        path,
        family,
        unit,
        conversion,
        frames_per_repetition,
        configs,
        platforms,
    })
}

/// Resolve the unit conversion factor for one source, reporting a violation
/// when it is ambiguous or underivable.
fn unit_conversion(
    db: &Database,
    schema: SchemaVersion,
    unit: Option<&str>,
    here: &str,
    violations: &mut Vec<String>,
) -> Result<Option<i64>> {
    if schema.has_unit_conversion {
        let factors = db.query_column::<i64, _>(
            "SELECT DISTINCT TimeUnitConversion FROM FrameTimes ORDER BY TimeUnitConversion",
            [],
        )?;
        if factors.len() > 1 {
            violations.push(format!(
                "Expected identical time unit conversion factors across all tests in '{here}' but found different factors!"
            ));
        }
        return Ok((factors.len() == 1).then(|| factors[0]));
    }

    match unit {
        Some(unit) => match schema::conversion_for_unit(unit) {
            Some(factor) => Ok(Some(factor)),
            None => {
                violations.push(format!(
                    "Expected a time unit of 's', 'ms', or 'us' in '{here}' but got '{unit}'!"
                ));
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

fn check_enum_domains(
    db: &Database,
    schema: SchemaVersion,
    here: &str,
    violations: &mut Vec<String>,
) -> Result<()> {
    let out_of_range: i64 = db.query_scalar(
        "SELECT COUNT(*) FROM FrameTimes WHERE ObjectDetectorType NOT IN (0, 1, 2)",
        [],
    )?;
    if out_of_range > 0 {
        violations.push(format!(
            "Expected a value between 0, 1, and 2 for ObjectDetectorType in '{here}' but got other values!"
        ));
    }

    // Domain values come from the trusted schema descriptor, never from the
    // caller, so an inline list is safe here.
    let backend_list = sql_list(&schema.backend_domain());
    let out_of_range: i64 = db.query_scalar(
        &format!("SELECT COUNT(*) FROM FrameTimes WHERE ObjectDetectorBackEnd NOT IN ({backend_list})"),
        [],
    )?;
    if out_of_range > 0 {
        violations.push(format!(
            "Expected a value between {backend_list} for ObjectDetectorBackEnd in '{here}' but got other values!"
        ));
    }

    let blob_list = sql_list(&BLOB_SIZES);
    let out_of_range: i64 = db.query_scalar(
        &format!("SELECT COUNT(*) FROM FrameTimes WHERE ObjectDetectorBlobSize NOT IN ({blob_list})"),
        [],
    )?;
    if out_of_range > 0 {
        violations.push(format!(
            "Expected a value between {blob_list} for ObjectDetectorBlobSize in '{here}' but got other values!"
        ));
    }

    Ok(())
}

/// Baseline rows carry no backend or resolution; every detector row carries
/// both. Checked in both directions.
fn check_mode_coupling(db: &Database, here: &str, violations: &mut Vec<String>) -> Result<()> {
    let baseline_with_backend: i64 = db.query_scalar(
        "SELECT COUNT(*) FROM FrameTimes \
         WHERE ObjectDetectorType = 0 AND (ObjectDetectorBackEnd != 0 OR ObjectDetectorBlobSize != 0)",
        [],
    )?;
    if baseline_with_backend > 0 {
        violations.push(format!(
            "Expected ObjectDetectorBackEnd and ObjectDetectorBlobSize to be zero when ObjectDetectorType is zero in '{here}' but found them to be non-zero!"
        ));
    }

    let detector_without_backend: i64 = db.query_scalar(
        "SELECT COUNT(*) FROM FrameTimes \
         WHERE ObjectDetectorType != 0 AND (ObjectDetectorBackEnd = 0 OR ObjectDetectorBlobSize = 0)",
        [],
    )?;
    if detector_without_backend > 0 {
        violations.push(format!(
            "Expected ObjectDetectorBackEnd and ObjectDetectorBlobSize to be non-zero when ObjectDetectorType is non-zero in '{here}' but found them to be zero!"
        ));
    }

    Ok(())
}

fn validate_across_sources(summaries: &[SourceSummary], violations: &mut Vec<String>) {
    let Some(first) = summaries.first() else {
        return;
    };

    for summary in &summaries[1..] {
        let other = pair(&first.path, &summary.path);

        if first.family != summary.family {
            violations.push(format!(
                "Expected identical YOLO names across {other} but found different YOLO names!"
            ));
        }
        if first.unit != summary.unit {
            violations.push(format!(
                "Expected identical time units across {other} but found different time units!"
            ));
        }
        if first.conversion != summary.conversion {
            violations.push(format!(
                "Expected identical time unit conversion factors across {other} but found different factors!"
            ));
        }
        if first.frames_per_repetition != summary.frames_per_repetition {
            violations.push(format!(
                "Expected identical frame counts across {other} but found different frame counts!"
            ));
        }
        // Unordered set comparison: discovery order does not matter, only
        // equal cardinality and equal members.
        if first.configs != summary.configs {
            violations.push(format!(
                "Expected identical tests across {other} but found different tests!"
            ));
        }
    }
}

fn pair(a: &Path, b: &Path) -> String {
    format!("'{}' and '{}'", a.display(), b.display())
}

fn sql_list(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
