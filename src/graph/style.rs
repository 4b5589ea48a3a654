//! Rendering configuration for the performance graphs.

use plotters::style::RGBColor;

/// Fonts, colours, and sizing for both chart types.
///
/// Passed explicitly into the renderers; nothing here is process-global
/// state.
#[derive(Debug, Clone)]
pub struct GraphStyle {
    pub figure_width: u32,
    pub figure_height: u32,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub tick_font_size: u32,
    pub legend_font_size: u32,
    pub bar_label_font_size: u32,
    /// Width of one bar as a fraction of a test slot.
    pub bar_width: f64,
    /// Colour cycle for single-platform categories: baseline, then one
    /// colour per backend.
    pub single_platform_palette: Vec<RGBColor>,
    /// Colour cycle for multi-platform categories: one colour per platform.
    pub multi_platform_palette: Vec<RGBColor>,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            figure_width: 1600,
            figure_height: 900,
            title_font_size: 48,
            label_font_size: 36,
            tick_font_size: 28,
            legend_font_size: 28,
            bar_label_font_size: 22,
            bar_width: 0.25,
            single_platform_palette: vec![
                RGBColor(0x00, 0x00, 0x00),
                RGBColor(0x00, 0xAA, 0x00),
                RGBColor(0xAA, 0x00, 0x00),
            ],
            multi_platform_palette: vec![
                RGBColor(0x88, 0x88, 0x88),
                RGBColor(0x00, 0x00, 0xAA),
                RGBColor(0x00, 0xAA, 0x00),
            ],
        }
    }
}

impl GraphStyle {
    /// Colour for the `index`-th category, cycling when there are more
    /// categories than palette entries.
    pub fn category_colour(&self, index: usize, is_multi_platform: bool) -> RGBColor {
        let palette = if is_multi_platform {
            &self.multi_platform_palette
        } else {
            &self.single_platform_palette
        };
        palette[index % palette.len()]
    }
}
