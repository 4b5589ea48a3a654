//! Generates frame-time and FPS performance graphs from object-detector
//! benchmark databases.
//!
//! The pipeline validates one or more SQLite sources exhaustively, aggregates
//! per-frame timings into per-category series and average-FPS summaries, and
//! renders a time-series chart plus a grouped bar chart per platform, with a
//! combined "All Platforms" view when several sources are supplied.

pub mod data;
mod error;
pub mod graph;

pub use data::{
    ALL_PLATFORMS, ALL_PLATFORMS_DISPLAY, FrameTimeData, FramesPerSecondData, PerformanceReport,
    compute, platform_names, validate,
};
pub use error::{Error, Result};
pub use graph::{GraphStyle, platform_file_name, render_fps_graph, render_frame_time_graph};
