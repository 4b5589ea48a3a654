//! Frame-time time-series chart.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::data::FrameTimeData;
use crate::error::Result;
use crate::graph::{GraphStyle, platform_file_name, render_error};

/// Draw the per-frame time chart and save it as
/// `<platform>_frame_time_graph.png` in `output_directory`.
///
/// Each category gets one colour; only the first series of a category
/// carries the legend label, the rest share its colour silently.
pub fn render_frame_time_graph(
    data: &FrameTimeData,
    is_multi_platform: bool,
    style: &GraphStyle,
    output_directory: &Path,
) -> Result<PathBuf> {
    let path = output_directory.join(format!(
        "{}_frame_time_graph.png",
        platform_file_name(&data.platform_name)
    ));

    let y_max = data
        .frame_times
        .iter()
        .flat_map(|(_, series_list)| series_list.iter().flatten())
        .fold(0.0_f64, |acc, &t| acc.max(t));
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
    let x_max = data.number_of_frames.saturating_sub(1);

    let root = BitMapBackend::new(&path, (style.figure_width, style.figure_height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} Frame Times", data.platform_name),
            ("sans-serif", style.title_font_size).into_font(),
        )
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(100)
        .build_cartesian_2d(0..x_max, 0.0..y_max)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc("Frame Number")
        .y_desc(format!("Time to compute frame ({})", data.unit))
        .axis_desc_style(("sans-serif", style.label_font_size))
        .label_style(("sans-serif", style.tick_font_size))
        .draw()
        .map_err(render_error)?;

    for (category_index, (category, series_list)) in data.frame_times.iter().enumerate() {
        let colour = style.category_colour(category_index, is_multi_platform);
        for (series_index, series) in series_list.iter().enumerate() {
            let drawn = chart
                .draw_series(LineSeries::new(series.iter().copied().enumerate(), colour))
                .map_err(render_error)?;
            if series_index == 0 {
                drawn.label(category.clone()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], colour)
                });
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", style.legend_font_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    drop(chart);
    drop(root);
    info!(path = %path.display(), "saved frame time graph");
    Ok(path)
}
