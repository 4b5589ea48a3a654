//! Turns validated measurements into per-category series and FPS summaries.
//!
//! Canonical facts (family name, unit, frame count, test list, configuration
//! list, platforms) are queried once and reused for every platform. Each
//! platform's aggregation is then independent: per configuration, all
//! repetitions are averaged position-wise into one series, filed under a
//! category key that depends on the request mode.

use std::path::PathBuf;

use ndarray::{Array2, Axis};
use rusqlite::params;
use tracing::debug;

use crate::data::ALL_PLATFORMS;
use crate::data::database::Database;
use crate::data::report::{FrameTimeData, FramesPerSecondData, PerformanceReport};
use crate::data::schema::{self, TestConfig};
use crate::error::{Error, Result};

/// Display name used for the combined view.
pub const ALL_PLATFORMS_DISPLAY: &str = "All Platforms";

/// Platform-agnostic values computed once per invocation and shared by
/// every per-platform pass.
struct CanonicalFacts {
    family: String,
    unit: String,
    conversion: i64,
    frames_per_repetition: usize,
    /// Distinct `(mode, blob size)` pairs, ordered by mode then resolution.
    test_keys: Vec<(i64, i64)>,
    /// Display names aligned with `test_keys`.
    test_names: Vec<String>,
    /// Distinct full configuration tuples, ordered by mode, backend, blob.
    configs: Vec<TestConfig>,
    /// `(source index, platform name)` in discovery order, first source wins
    /// when a platform occurs in several sources.
    platforms: Vec<(usize, String)>,
}

/// Compute the aggregated report for one platform, or for the combined view
/// when `requested_platform` is the `"all"` sentinel.
///
/// Assumes [`validate`](crate::data::validate) has already passed; any query
/// failure here is fatal and propagated as-is.
pub fn compute(sources: &[PathBuf], requested_platform: &str) -> Result<PerformanceReport> {
    let databases = sources
        .iter()
        .map(|path| Database::open(path))
        .collect::<Result<Vec<_>>>()?;

    let facts = canonical_facts(&databases)?;
    debug!(
        tests = facts.test_names.len(),
        configs = facts.configs.len(),
        platforms = facts.platforms.len(),
        "canonical facts computed"
    );

    if requested_platform == ALL_PLATFORMS {
        compute_multi_platform(&databases, &facts)
    } else {
        let (source_index, platform) = facts
            .platforms
            .iter()
            .find(|(_, name)| name == requested_platform)
            .cloned()
            .ok_or_else(|| {
                Error::DataQuality(vec![format!(
                    "Expected the platform '{requested_platform}' to be found in the data but it was not found!"
                )])
            })?;
        compute_single_platform(&databases[source_index], &facts, &platform)
    }
}

/// Distinct platform names across all sources, in source order.
pub fn platform_names(sources: &[PathBuf]) -> Result<Vec<String>> {
    let mut platforms: Vec<String> = Vec::new();
    for path in sources {
        let db = Database::open(path)?;
        for name in db.query_column::<String, _>(
            "SELECT DISTINCT Platform FROM FrameTimes ORDER BY Platform",
            [],
        )? {
            if !platforms.contains(&name) {
                platforms.push(name);
            }
        }
    }
    Ok(platforms)
}

fn canonical_facts(databases: &[Database]) -> Result<CanonicalFacts> {
    let first = databases
        .first()
        .ok_or_else(|| Error::InvalidArguments("no database file paths provided".into()))?;
    let schema = first.schema_version()?;

    let family = single_value::<String>(
        first,
        "SELECT DISTINCT YoloName FROM FrameTimes",
        "YOLO name",
    )?;
    let unit = single_value::<String>(
        first,
        &format!(
            "SELECT DISTINCT {col} FROM FrameTimes",
            col = schema.time_unit_column
        ),
        "time unit",
    )?;

    let conversion = if schema.has_unit_conversion {
        single_value::<i64>(
            first,
            "SELECT DISTINCT TimeUnitConversion FROM FrameTimes",
            "time unit conversion factor",
        )?
    } else {
        schema::conversion_for_unit(&unit).ok_or_else(|| {
            Error::DataQuality(vec![format!(
                "Expected a time unit of 's', 'ms', or 'us' but got '{unit}'!"
            )])
        })?
    };

    let frames_per_repetition = single_value::<i64>(
        first,
        "SELECT DISTINCT COUNT(*) FROM FrameTimes \
         GROUP BY Platform, ObjectDetectorType, ObjectDetectorBackEnd, ObjectDetectorBlobSize, Repetition",
        "frame count",
    )? as usize;

    let mut test_keys: Vec<(i64, i64)> = first.query_rows(
        "SELECT DISTINCT ObjectDetectorType, ObjectDetectorBlobSize FROM FrameTimes",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    test_keys.sort_unstable();
    let test_names = schema::ordered_test_names(&family, &test_keys)?;

    let configs = first.query_rows(
        "SELECT DISTINCT ObjectDetectorType, ObjectDetectorBackEnd, ObjectDetectorBlobSize \
         FROM FrameTimes \
         ORDER BY ObjectDetectorType, ObjectDetectorBackEnd, ObjectDetectorBlobSize",
        [],
        |row| Ok(TestConfig::new(row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let mut platforms: Vec<(usize, String)> = Vec::new();
    for (index, db) in databases.iter().enumerate() {
        for name in db.query_column::<String, _>(
            "SELECT DISTINCT Platform FROM FrameTimes ORDER BY Platform",
            [],
        )? {
            if !platforms.iter().any(|(_, existing)| *existing == name) {
                platforms.push((index, name));
            }
        }
    }

    Ok(CanonicalFacts {
        family,
        unit,
        conversion,
        frames_per_repetition,
        test_keys,
        test_names,
        configs,
        platforms,
    })
}

/// One category per baseline plus one per distinct non-zero backend, each
/// category carrying the averaged series and FPS value of every populated
/// configuration in `(mode, resolution)` order.
fn compute_single_platform(
    db: &Database,
    facts: &CanonicalFacts,
    platform: &str,
) -> Result<PerformanceReport> {
    let mut frame_times: Vec<(String, Vec<Vec<f64>>)> = Vec::new();
    let mut average_fps: Vec<(String, Vec<f64>)> = Vec::new();

    for config in &facts.configs {
        let Some(series) = averaged_series(db, platform, config, facts.frames_per_repetition)?
        else {
            // Absent configuration, e.g. a backend this platform never ran.
            // The category slot is simply omitted.
            continue;
        };

        let backend = config.backend_kind().ok_or_else(|| {
            Error::DataQuality(vec![format!(
                "Expected a known ObjectDetectorBackEnd value but got {}!",
                config.backend
            )])
        })?;
        let category = schema::category_label(&facts.family, backend);
        let fps = round_to_tenth(facts.conversion as f64 / mean(&series));

        push_series(&mut frame_times, &category, series);
        push_value(&mut average_fps, &category, fps);
    }

    Ok(package(platform.to_string(), facts, frame_times, average_fps, false))
}

/// One category per platform. For each `(mode, resolution)` test the best
/// backend is selected by FPS, independently per platform, and that
/// backend's series is the one plotted.
fn compute_multi_platform(
    databases: &[Database],
    facts: &CanonicalFacts,
) -> Result<PerformanceReport> {
    let mut frame_times: Vec<(String, Vec<Vec<f64>>)> = Vec::new();
    let mut average_fps: Vec<(String, Vec<f64>)> = Vec::new();

    for (source_index, platform) in &facts.platforms {
        let db = &databases[*source_index];
        let mut series_list = Vec::new();
        let mut fps_list = Vec::new();

        for &(mode, blob_size) in &facts.test_keys {
            let mut best: Option<(f64, Vec<f64>)> = None;

            for config in facts
                .configs
                .iter()
                .filter(|c| c.mode == mode && c.blob_size == blob_size)
            {
                let Some(series) =
                    averaged_series(db, platform, config, facts.frames_per_repetition)?
                else {
                    continue;
                };
                let fps = facts.conversion as f64 / mean(&series);
                if best.as_ref().is_none_or(|(current, _)| fps > *current) {
                    best = Some((fps, series));
                }
            }

            if let Some((fps, series)) = best {
                fps_list.push(round_to_tenth(fps));
                series_list.push(series);
            }
        }

        if !series_list.is_empty() {
            frame_times.push((platform.clone(), series_list));
            average_fps.push((platform.clone(), fps_list));
        }
    }

    Ok(package(
        ALL_PLATFORMS_DISPLAY.to_string(),
        facts,
        frame_times,
        average_fps,
        true,
    ))
}

/// Average the frame times of every repetition of one configuration,
/// position by position. `None` when the platform has no rows for it.
fn averaged_series(
    db: &Database,
    platform: &str,
    config: &TestConfig,
    frames_per_repetition: usize,
) -> Result<Option<Vec<f64>>> {
    let times = db.query_column::<f64, _>(
        "SELECT FrameTime FROM FrameTimes \
         WHERE Platform = ?1 AND ObjectDetectorType = ?2 \
           AND ObjectDetectorBackEnd = ?3 AND ObjectDetectorBlobSize = ?4 \
         ORDER BY Repetition, FrameNumber",
        params![platform, config.mode, config.backend, config.blob_size],
    )?;

    if times.is_empty() {
        return Ok(None);
    }
    if frames_per_repetition == 0 || times.len() % frames_per_repetition != 0 {
        return Err(Error::DataQuality(vec![format!(
            "Expected a multiple of {frames_per_repetition} frame times for platform '{platform}' but got {}!",
            times.len()
        )]));
    }

    let repetitions = times.len() / frames_per_repetition;
    let matrix = Array2::from_shape_vec((repetitions, frames_per_repetition), times)
        .map_err(|err| Error::DataQuality(vec![err.to_string()]))?;
    let averaged = matrix.mean_axis(Axis(0)).ok_or_else(|| {
        Error::DataQuality(vec![format!(
            "Expected at least one repetition for platform '{platform}' but found none!"
        )])
    })?;

    Ok(Some(averaged.to_vec()))
}

fn package(
    platform_name: String,
    facts: &CanonicalFacts,
    frame_times: Vec<(String, Vec<Vec<f64>>)>,
    average_fps: Vec<(String, Vec<f64>)>,
    is_multi_platform: bool,
) -> PerformanceReport {
    PerformanceReport {
        frame_times: FrameTimeData {
            platform_name: platform_name.clone(),
            number_of_frames: facts.frames_per_repetition,
            frame_times,
            unit: facts.unit.clone(),
        },
        frames_per_second: FramesPerSecondData {
            platform_name,
            test_names: facts.test_names.clone(),
            average_frames_per_second: average_fps,
        },
        is_multi_platform,
    }
}

fn single_value<T: rusqlite::types::FromSql>(
    db: &Database,
    sql: &str,
    what: &str,
) -> Result<T> {
    db.query_column::<T, _>(sql, [])?
        .into_iter()
        .next()
        .ok_or_else(|| {
            Error::DataQuality(vec![format!(
                "Expected a {what} in the data but found none!"
            )])
        })
}

fn push_series(categories: &mut Vec<(String, Vec<Vec<f64>>)>, category: &str, series: Vec<f64>) {
    match categories.iter_mut().find(|(name, _)| name == category) {
        Some((_, list)) => list.push(series),
        None => categories.push((category.to_string(), vec![series])),
    }
}

fn push_value(categories: &mut Vec<(String, Vec<f64>)>, category: &str, value: f64) {
    match categories.iter_mut().find(|(name, _)| name == category) {
        Some((_, list)) => list.push(value),
        None => categories.push((category.to_string(), vec![value])),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
