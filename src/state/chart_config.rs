use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::data::parser::Directives;
use crate::error::Result;
use crate::state::series_style::{ResolvedStyle, SeriesStyle};
use crate::state::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub struct AxisConfig {
    /// Empty hides the axis title.
    pub label: String,
    pub show_tick_labels: bool,
    pub grid: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            show_tick_labels: true,
            grid: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendConfig {
    pub include: bool,
    /// Render only the legend, no chart.
    pub only: bool,
    pub columns: usize,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            include: false,
            only: false,
            columns: 1,
        }
    }
}

/// Everything that decides how a chart looks. Passed by reference into
/// every render call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Empty hides the title.
    pub title: String,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    /// Minor subdivisions of the y axis.
    pub minor_ticks: bool,
    /// Light grid lines on the minor subdivisions.
    pub minor_grid: bool,
    pub width_inches: f64,
    pub height_inches: f64,
    pub dpi: u32,
    /// Points.
    pub font_size: u32,
    pub log_y: bool,
    pub stacked: bool,
    /// Pixels; 0 disables error bars.
    pub error_bar_width: f64,
    pub legend: LegendConfig,
    pub theme: Theme,
    /// Empty means the built-in palette.
    pub palette: Vec<[u8; 3]>,
    pub series_styles: HashMap<String, SeriesStyle>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::bar_defaults()
    }
}

impl ChartConfig {
    /// Grouped bar chart: 8x6 in at 100 dpi, 20pt text, light background.
    pub fn bar_defaults() -> Self {
        Self {
            title: String::new(),
            x_axis: AxisConfig {
                grid: false,
                ..AxisConfig::default()
            },
            y_axis: AxisConfig::default(),
            minor_ticks: true,
            minor_grid: true,
            width_inches: 8.0,
            height_inches: 6.0,
            dpi: 100,
            font_size: 20,
            log_y: false,
            stacked: false,
            error_bar_width: 10.0,
            legend: LegendConfig::default(),
            theme: Theme::Light,
            palette: Vec::new(),
            series_styles: HashMap::new(),
        }
    }

    /// Multi-series line chart: 12x5 in at 200 dpi on a dark background.
    pub fn line_defaults() -> Self {
        Self {
            title: "Throughput Vs Threads".to_string(),
            x_axis: AxisConfig::default(),
            y_axis: AxisConfig::default(),
            width_inches: 12.0,
            height_inches: 5.0,
            dpi: 200,
            font_size: 10,
            error_bar_width: 0.0,
            legend: LegendConfig {
                include: true,
                ..LegendConfig::default()
            },
            theme: Theme::Dark,
            ..Self::bar_defaults()
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| ((inches * self.dpi as f64).round() as u32).max(1);
        (px(self.width_inches), px(self.height_inches))
    }

    /// Light lines between two major y ticks. Log axes mark 2 through 9 of
    /// each decade, linear axes split the gap in five.
    pub fn light_lines(&self) -> usize {
        match (self.minor_ticks && self.minor_grid, self.log_y) {
            (false, _) => 0,
            (true, true) => 8,
            (true, false) => 4,
        }
    }

    /// Font size in pixels at the configured dpi.
    pub fn font_px(&self) -> u32 {
        ((self.font_size as f64 * self.dpi as f64 / 72.0).round() as u32).max(1)
    }

    /// Labels set in the input override the command line.
    pub fn apply_directives(&mut self, directives: &Directives) {
        if let Some(title) = &directives.title {
            self.title = title.clone();
        }
        if let Some(label) = &directives.x_label {
            self.x_axis.label = label.clone();
        }
        if let Some(label) = &directives.y_label {
            self.y_axis.label = label.clone();
        }
    }

    pub fn apply_style_file(&mut self, style: StyleFile) {
        if let Some(theme) = style.theme {
            self.theme = theme;
        }
        if !style.palette.is_empty() {
            self.palette = style.palette;
        }
        self.series_styles.extend(style.series);
    }

    /// Style for the series in column `index`.
    pub fn series_style(&self, label: &str, index: usize, default_width: u32) -> ResolvedStyle {
        self.series_styles
            .get(label)
            .cloned()
            .unwrap_or_default()
            .resolve(&self.palette, index, default_width)
    }
}

/// Optional JSON style overrides.
///
/// ```json
/// { "theme": "Light", "series": { "ibr_hp": { "color": [0, 0, 255], "marker": "square" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleFile {
    pub theme: Option<Theme>,
    pub palette: Vec<[u8; 3]>,
    pub series: HashMap<String, SeriesStyle>,
}

impl StyleFile {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let style = Self::from_json(&json)?;
        tracing::info!("Loaded style from {:?}", path);
        Ok(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parser::parse_input;
    use crate::state::series_style::Marker;
    use plotters::style::RGBColor;

    #[test]
    fn pixel_size_scales_with_dpi() {
        assert_eq!(ChartConfig::bar_defaults().pixel_size(), (800, 600));
        assert_eq!(ChartConfig::line_defaults().pixel_size(), (2400, 1000));
    }

    #[test]
    fn minor_ticks_and_minor_grid_are_separate_switches() {
        let mut config = ChartConfig::bar_defaults();
        assert_eq!(config.light_lines(), 4);
        config.log_y = true;
        assert_eq!(config.light_lines(), 8);

        config.minor_grid = false;
        assert!(config.minor_ticks);
        assert_eq!(config.light_lines(), 0);

        config.minor_grid = true;
        config.minor_ticks = false;
        assert_eq!(config.light_lines(), 0);
    }

    #[test]
    fn directives_override_labels() {
        let input = parse_input("TITLE From input\nYLABEL ops/s".lines()).unwrap();
        let mut config = ChartConfig::line_defaults();
        config.x_axis.label = "threads".into();
        config.apply_directives(&input.directives);
        assert_eq!(config.title, "From input");
        assert_eq!(config.x_axis.label, "threads");
        assert_eq!(config.y_axis.label, "ops/s");
    }

    #[test]
    fn style_file_parses_partial_documents() {
        let style = StyleFile::from_json(
            r#"{ "theme": "Dark", "series": { "ibr_hp": { "color": [0, 0, 255], "marker": "square" } } }"#,
        )
        .unwrap();
        assert_eq!(style.theme, Some(Theme::Dark));
        assert!(style.palette.is_empty());

        let mut config = ChartConfig::bar_defaults();
        config.apply_style_file(style);
        assert_eq!(config.theme, Theme::Dark);
        let resolved = config.series_style("ibr_hp", 0, 2);
        assert_eq!(resolved.color, RGBColor(0, 0, 255));
        assert_eq!(resolved.marker, Marker::Square);
        assert_eq!(config.series_style("other", 0, 2).marker, Marker::Circle);
    }

    #[test]
    fn unknown_marker_is_rejected() {
        assert!(StyleFile::from_json(r#"{ "series": { "a": { "marker": "star" } } }"#).is_err());
    }
}
