//! Schema-version descriptor and the enumerated domains of the benchmark table.
//!
//! The benchmark harness has gone through several schema revisions. Rather
//! than forking the validator and aggregator per revision, both are
//! parameterized by a small [`SchemaVersion`] descriptor detected from the
//! table's column list.

use crate::error::{Error, Result};

/// Name of the benchmark table, stable across schema revisions.
pub const FRAME_TIMES_TABLE: &str = "FrameTimes";

/// Square detector input resolutions allowed in the data. Zero marks the
/// baseline runs without a detector.
pub const BLOB_SIZES: [i64; 6] = [0, 288, 320, 416, 512, 608];

/// Which object-detector variant produced a frame time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DetectorMode {
    /// Baseline run without a detector.
    None,
    /// The lightweight ("tiny") detector variant.
    Tiny,
    /// The full detector variant.
    Full,
}

impl DetectorMode {
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Tiny),
            2 => Some(Self::Full),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Tiny => 1,
            Self::Full => 2,
        }
    }
}

/// The inference acceleration path used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Backend {
    /// Baseline runs carry no backend.
    None,
    Cpu,
    Cuda,
    /// Only present in the later schema revision.
    TensorRt,
}

impl Backend {
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Cpu),
            2 => Some(Self::Cuda),
            3 => Some(Self::TensorRt),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Cpu => 1,
            Self::Cuda => 2,
            Self::TensorRt => 3,
        }
    }

    /// Display name used in single-platform category labels.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Cpu => "CPU",
            Self::Cuda => "CUDA",
            Self::TensorRt => "TensorRT",
        }
    }
}

/// One distinct `(detector mode, backend, blob size)` test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestConfig {
    pub mode: i64,
    pub backend: i64,
    pub blob_size: i64,
}

impl TestConfig {
    pub fn new(mode: i64, backend: i64, blob_size: i64) -> Self {
        Self {
            mode,
            backend,
            blob_size,
        }
    }

    pub fn detector_mode(&self) -> Option<DetectorMode> {
        DetectorMode::from_raw(self.mode)
    }

    pub fn backend_kind(&self) -> Option<Backend> {
        Backend::from_raw(self.backend)
    }
}

/// Describes the columns and enum domains of one schema revision.
///
/// The first revision stored the time unit in a `Unit` column and knew two
/// backends. The later revision renamed the column to `TimeUnit`, added an
/// integer `TimeUnitConversion` factor, and a third backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVersion {
    /// Column holding the time unit string.
    pub time_unit_column: &'static str,
    /// Whether the `TimeUnitConversion` column is present.
    pub has_unit_conversion: bool,
    /// Largest valid `ObjectDetectorBackEnd` value, inclusive.
    pub max_backend: i64,
}

/// The original schema: `Unit` column, backends 0..=2, no conversion factor.
pub const SCHEMA_V1: SchemaVersion = SchemaVersion {
    time_unit_column: "Unit",
    has_unit_conversion: false,
    max_backend: 2,
};

/// The current schema: `TimeUnit` plus `TimeUnitConversion`, backends 0..=3.
pub const SCHEMA_V2: SchemaVersion = SchemaVersion {
    time_unit_column: "TimeUnit",
    has_unit_conversion: true,
    max_backend: 3,
};

impl SchemaVersion {
    /// Detect the schema revision from the table's column names.
    pub fn from_columns(columns: &[String]) -> Result<Self> {
        let has = |name: &str| columns.iter().any(|c| c == name);

        if has("TimeUnit") {
            Ok(SchemaVersion {
                time_unit_column: "TimeUnit",
                has_unit_conversion: has("TimeUnitConversion"),
                max_backend: 3,
            })
        } else if has("Unit") {
            Ok(SCHEMA_V1)
        } else {
            Err(Error::DataQuality(vec![format!(
                "Expected the {FRAME_TIMES_TABLE} table to have a 'Unit' or 'TimeUnit' column but found neither!"
            )]))
        }
    }

    /// Valid `ObjectDetectorBackEnd` values for this revision.
    pub fn backend_domain(&self) -> Vec<i64> {
        (0..=self.max_backend).collect()
    }
}

/// Conversion factor to seconds for schemas without a `TimeUnitConversion`
/// column, derived from the unit string.
pub fn conversion_for_unit(unit: &str) -> Option<i64> {
    match unit {
        "s" => Some(1),
        "ms" => Some(1_000),
        "us" => Some(1_000_000),
        _ => None,
    }
}

/// Display label for one test, derived from its mode and resolution.
pub fn test_name(family: &str, mode: DetectorMode, blob_size: i64) -> String {
    match mode {
        DetectorMode::None => format!("No {family}"),
        DetectorMode::Tiny => format!("{family}-tiny {blob_size}"),
        DetectorMode::Full => format!("{family} {blob_size}"),
    }
}

/// Category label for one single-platform series group.
pub fn category_label(family: &str, backend: Backend) -> String {
    match backend {
        Backend::None => format!("No {family}"),
        other => format!("{family} ({})", other.label()),
    }
}

/// Display names for distinct `(mode, blob size)` pairs, ordered ascending
/// by mode then resolution. The caller's slice order does not matter.
pub fn ordered_test_names(family: &str, pairs: &[(i64, i64)]) -> Result<Vec<String>> {
    let mut pairs = pairs.to_vec();
    pairs.sort_unstable();
    pairs.dedup();

    pairs
        .iter()
        .map(|&(mode, blob_size)| {
            let mode = DetectorMode::from_raw(mode).ok_or_else(|| {
                Error::DataQuality(vec![format!(
                    "Expected a value between 0, 1, and 2 for ObjectDetectorType but got {mode}!"
                )])
            })?;
            Ok(test_name(family, mode, blob_size))
        })
        .collect()
}
