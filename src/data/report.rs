//! Output records consumed by the chart renderer.
//!
//! These records decouple the aggregator's working data from the exact shape
//! the renderer expects, and serialize cleanly so aggregated results can be
//! cached between render runs without re-querying the store. They perform no
//! computation.
//!
//! Categories are kept as ordered `(label, values)` pairs rather than a map:
//! the renderer assigns palette colours by position, so insertion order is
//! part of the contract (baseline before backends, platforms in discovery
//! order).

use serde::{Deserialize, Serialize};

/// Everything the time-series chart needs for one platform or for the
/// combined view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTimeData {
    pub platform_name: String,
    /// Common length of every series, the per-repetition frame count.
    pub number_of_frames: usize,
    /// Category label to one averaged series per populated test, in test
    /// order. A category may hold fewer series than there are tests.
    pub frame_times: Vec<(String, Vec<Vec<f64>>)>,
    /// Display unit for the y axis, e.g. "ms".
    pub unit: String,
}

/// Everything the grouped bar chart needs for one platform or for the
/// combined view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramesPerSecondData {
    pub platform_name: String,
    /// Canonical test labels in `(mode, resolution)` order.
    pub test_names: Vec<String>,
    /// Category label to one FPS value per populated test, in test order.
    pub average_frames_per_second: Vec<(String, Vec<f64>)>,
}

/// The full aggregated content of one chart pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub frame_times: FrameTimeData,
    pub frames_per_second: FramesPerSecondData,
    /// Whether this report describes the combined "All Platforms" view.
    pub is_multi_platform: bool,
}

impl FramesPerSecondData {
    /// FPS values for one category, if it was populated.
    pub fn category(&self, label: &str) -> Option<&[f64]> {
        self.average_frames_per_second
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, values)| values.as_slice())
    }
}

impl FrameTimeData {
    /// Series list for one category, if it was populated.
    pub fn category(&self, label: &str) -> Option<&[Vec<f64>]> {
        self.frame_times
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, series)| series.as_slice())
    }
}
