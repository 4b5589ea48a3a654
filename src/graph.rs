//! Chart rendering over the aggregated report records.
//!
//! A thin wrapper over plotters: the renderers consume the report records
//! as-is and draw one time-series chart and one grouped bar chart per
//! platform processed.

mod bars;
mod line;
mod style;

pub use bars::render_fps_graph;
pub use line::render_frame_time_graph;
pub use style::GraphStyle;

use crate::error::Error;

/// File-name stem for a platform's output images: lower-cased, spaces
/// replaced with underscores.
pub fn platform_file_name(platform_name: &str) -> String {
    platform_name.to_lowercase().replace(' ', "_")
}

pub(crate) fn render_error(err: impl std::fmt::Display) -> Error {
    Error::Render(err.to_string())
}
