//! Data layer: storage access, validation, aggregation, and the report
//! records handed to the chart renderer.

mod aggregator;
mod database;
mod report;
mod schema;
mod validator;

pub use aggregator::{ALL_PLATFORMS_DISPLAY, compute, platform_names};
pub use database::Database;
pub use report::{FrameTimeData, FramesPerSecondData, PerformanceReport};
pub use schema::{
    BLOB_SIZES, Backend, DetectorMode, FRAME_TIMES_TABLE, SCHEMA_V1, SCHEMA_V2, SchemaVersion,
    TestConfig, category_label, ordered_test_names, test_name,
};
pub use validator::validate;

/// Sentinel platform name requesting the combined multi-platform view.
pub const ALL_PLATFORMS: &str = "all";
