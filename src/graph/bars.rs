//! Grouped FPS bar chart.

use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::RGBColor;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::data::FramesPerSecondData;
use crate::error::Result;
use crate::graph::{GraphStyle, platform_file_name, render_error};

/// An f64 axis with explicit tick positions that keeps plotters' default
/// label formatting; `WithKeyPoints` alone drops the `ValueFormatter` impl
/// needed by `configure_mesh`.
struct KeyPointAxis(WithKeyPoints<RangedCoordf64>);

impl Ranged for KeyPointAxis {
    type ValueType = f64;
    type FormatOption = DefaultFormatting;

    fn range(&self) -> Range<f64> {
        self.0.range()
    }

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

/// A category's bars as `(x centre, height)` pairs in axis coordinates.
struct BarGroup {
    label: String,
    colour: RGBColor,
    bars: Vec<(f64, f64)>,
}

/// Draw the grouped FPS bar chart and save it as `<platform>_fps_graph.png`
/// in `output_directory`. Every bar is labelled with its one-decimal value.
///
/// Single-platform mode draws the baseline bar alone in slot 0 and offsets
/// each backend group by half a bar width around the remaining slots; the
/// combined view offsets one full bar width per platform across every slot.
/// A category with fewer values than test slots fills its slots from the
/// left, matching the populated subset.
pub fn render_fps_graph(
    data: &FramesPerSecondData,
    is_multi_platform: bool,
    style: &GraphStyle,
    output_directory: &Path,
) -> Result<PathBuf> {
    let path = output_directory.join(format!(
        "{}_fps_graph.png",
        platform_file_name(&data.platform_name)
    ));

    let y_max = data
        .average_frames_per_second
        .iter()
        .flat_map(|(_, values)| values.iter())
        .fold(0.0_f64, |acc, &v| acc.max(v));
    let y_max = if y_max > 0.0 { y_max * 1.15 } else { 1.0 };
    let x_max = data.test_names.len() as f64 - 0.5;

    let root = BitMapBackend::new(&path, (style.figure_width, style.figure_height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let tick_positions: Vec<f64> = (0..data.test_names.len()).map(|i| i as f64).collect();
    let test_names = data.test_names.clone();

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} FPS", data.platform_name),
            ("sans-serif", style.title_font_size).into_font(),
        )
        .margin(20)
        .x_label_area_size(120)
        .y_label_area_size(100)
        .build_cartesian_2d(
            KeyPointAxis((-0.5..x_max).with_key_points(tick_positions)),
            0.0..y_max,
        )
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc("Detector Type and Blob Size")
        .y_desc("Frames Per Second (FPS)")
        .x_label_formatter(&|x: &f64| {
            let index = x.round() as usize;
            test_names.get(index).cloned().unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", style.label_font_size))
        .label_style(("sans-serif", style.tick_font_size))
        .draw()
        .map_err(render_error)?;

    let groups = bar_groups(data, is_multi_platform, style);
    let value_font = TextStyle::from(("sans-serif", style.bar_label_font_size).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for group in &groups {
        let colour = group.colour;
        let half = style.bar_width / 2.0;

        chart
            .draw_series(group.bars.iter().map(|&(x, value)| {
                Rectangle::new([(x - half, 0.0), (x + half, value)], colour.filled())
            }))
            .map_err(render_error)?
            .label(group.label.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 6), (x + 14, y + 6)], colour.filled())
            });

        chart
            .draw_series(group.bars.iter().map(|&(x, value)| {
                Text::new(format!("{value:.1}"), (x, value), value_font.clone())
            }))
            .map_err(render_error)?;
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
    info!(path = %path.display(), "saved FPS graph");
    Ok(path)
}

fn bar_groups(
    data: &FramesPerSecondData,
    is_multi_platform: bool,
    style: &GraphStyle,
) -> Vec<BarGroup> {
    let mut groups = Vec::new();

    if is_multi_platform {
        let mut multiplier = -1.0;
        for (index, (category, values)) in data.average_frames_per_second.iter().enumerate() {
            let offset = style.bar_width * multiplier;
            groups.push(BarGroup {
                label: category.clone(),
                colour: style.category_colour(index, true),
                bars: values
                    .iter()
                    .enumerate()
                    .map(|(slot, &value)| (slot as f64 + offset, value))
                    .collect(),
            });
            multiplier += 1.0;
        }
        return groups;
    }

    let mut categories = data.average_frames_per_second.iter().enumerate();

    // Baseline occupies slot 0 on its own, un-offset.
    if let Some((index, (category, values))) = categories.next() {
        groups.push(BarGroup {
            label: category.clone(),
            colour: style.category_colour(index, false),
            bars: values
                .iter()
                .enumerate()
                .map(|(slot, &value)| (slot as f64, value))
                .collect(),
        });
    }

    let mut multiplier = -0.5;
    for (index, (category, values)) in categories {
        let offset = style.bar_width * multiplier;
        groups.push(BarGroup {
            label: category.clone(),
            colour: style.category_colour(index, false),
            bars: values
                .iter()
                .enumerate()
                .map(|(slot, &value)| ((slot + 1) as f64 + offset, value))
                .collect(),
        });
        multiplier += 1.0;
    }

    groups
}
