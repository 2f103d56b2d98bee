use plotters::coord::Shift;
use plotters::prelude::*;

use crate::processing::pivot::{DeviationBars, PivotTable};
use crate::render::axis::{XAxis, YScale};
use crate::render::{Chart, PlotError, Result};
use crate::state::chart_config::ChartConfig;

/// Share of each x slot covered by its group of bars.
const GROUP_WIDTH: f64 = 0.75;

/// One bar in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub row: usize,
    pub col: usize,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    /// `(low, high)` whisker ends.
    pub whisker: Option<(f64, f64)>,
}

impl Bar {
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

/// Grouped or stacked bars from the mean pivot, one group per x value.
pub struct BarChart<'a> {
    pub table: &'a PivotTable,
    pub bars: Option<DeviationBars>,
    pub config: &'a ChartConfig,
}

impl<'a> BarChart<'a> {
    pub fn new(table: &'a PivotTable, bars: Option<DeviationBars>, config: &'a ChartConfig) -> Self {
        Self { table, bars, config }
    }

    fn whisker(&self, row: usize, col: usize, top: f64) -> Option<(f64, f64)> {
        if self.config.error_bar_width <= 0.0 {
            return None;
        }
        let (pos, neg) = self.bars.as_ref()?.get(row, col)?;
        Some((top - neg, top + pos))
    }

    /// Layout of every present cell. Missing cells produce no bar and, when
    /// stacked, add nothing to the stack.
    pub fn layout(&self) -> Vec<Bar> {
        let cols = self.table.column_count();
        if cols == 0 {
            return Vec::new();
        }
        let width = GROUP_WIDTH / cols as f64;
        let mut out = Vec::new();
        for row in 0..self.table.row_count() {
            let start = row as f64 - GROUP_WIDTH / 2.0;
            let mut stack = 0.0;
            for col in 0..cols {
                let Some(value) = self.table.get(row, col) else {
                    continue;
                };
                let (left, right, bottom, top) = if self.config.stacked {
                    let bottom = stack;
                    stack += value;
                    (start, start + GROUP_WIDTH, bottom, stack)
                } else {
                    let left = start + col as f64 * width;
                    (left, left + width, 0.0, value)
                };
                out.push(Bar {
                    row,
                    col,
                    left,
                    right,
                    bottom,
                    top,
                    whisker: self.whisker(row, col, top),
                });
            }
        }
        out
    }

    /// Every y value the axis must cover.
    fn extent(bars: &[Bar]) -> impl Iterator<Item = f64> + '_ {
        bars.iter().flat_map(|b| {
            let (lo, hi) = b.whisker.unwrap_or((b.top, b.top));
            [b.bottom, b.top, lo, hi]
        })
    }
}

impl Chart for BarChart<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let cfg = self.config;
        let theme = cfg.theme;
        let fg = theme.foreground();
        let font = cfg.font_px();

        root.fill(&theme.background())
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

        let bars = self.layout();
        let axis = XAxis::categorical(self.table.rows());
        let y = YScale::new(cfg.log_y);
        let (x_lo, x_hi) = axis.range();
        let (y_lo, y_hi) = y.range(Self::extent(&bars));

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(font / 2)
            .x_label_area_size(if cfg.x_axis.show_tick_labels { font * 2 } else { font / 2 })
            .y_label_area_size(if cfg.y_axis.show_tick_labels { font * 4 } else { font / 2 });
        if !cfg.title.is_empty() {
            builder.caption(&cfg.title, ("sans-serif", font).into_font().color(&fg));
        }
        let mut chart = builder
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

        let x_fmt = |v: &f64| {
            if cfg.x_axis.show_tick_labels {
                axis.tick_label(*v)
            } else {
                String::new()
            }
        };
        let y_fmt = |v: &f64| {
            if cfg.y_axis.show_tick_labels {
                y.tick_label(*v)
            } else {
                String::new()
            }
        };

        let mut mesh = chart.configure_mesh();
        mesh.axis_style(fg)
            .bold_line_style(theme.grid_color())
            .light_line_style(theme.minor_grid_color())
            .label_style(("sans-serif", font * 4 / 5).into_font().color(&fg))
            .x_labels(axis.len().max(1))
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .disable_x_mesh();
        if !cfg.x_axis.label.is_empty() {
            mesh.x_desc(cfg.x_axis.label.as_str());
        }
        if !cfg.y_axis.label.is_empty() {
            mesh.y_desc(cfg.y_axis.label.as_str());
        }
        if !cfg.y_axis.grid {
            mesh.disable_y_mesh();
        }
        mesh.max_light_lines(cfg.light_lines());
        mesh.draw().map_err(|e| PlotError::Drawing(e.to_string()))?;

        // Bars sitting on zero start at the bottom of a log axis.
        let floor = |v: f64| y.project(v).unwrap_or(y_lo);

        for (col, label) in self.table.columns().iter().enumerate() {
            let color = cfg.series_style(label, col, 1).color;
            let rects: Vec<_> = bars
                .iter()
                .filter(|b| b.col == col)
                .filter_map(|b| {
                    let top = y.project(b.top)?;
                    Some([(b.left, floor(b.bottom)), (b.right, top)])
                })
                .collect();

            let drawn = chart
                .draw_series(rects.iter().map(|r| Rectangle::new(*r, color.filled())))
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
            drawn.label(label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
            });

            chart
                .draw_series(rects.iter().map(|r| Rectangle::new(*r, fg.stroke_width(1))))
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }

        if cfg.error_bar_width > 0.0 {
            let cap = cfg.error_bar_width.round() as u32;
            chart
                .draw_series(bars.iter().filter_map(|b| {
                    let (lo, hi) = b.whisker?;
                    let mid = y.project(b.top)?;
                    Some(ErrorBar::new_vertical(
                        b.center(),
                        floor(lo),
                        mid,
                        y.project(hi)?,
                        fg.stroke_width(1),
                        cap,
                    ))
                }))
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }

        if cfg.legend.include && self.table.column_count() > 0 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(theme.background().mix(0.8))
                .border_style(fg)
                .label_font(("sans-serif", font * 4 / 5).into_font().color(&fg))
                .draw()
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::reshape::reshape_text;

    fn layout(text: &str, stacked: bool) -> Vec<Bar> {
        let (_, tables) = reshape_text(text).unwrap();
        let mut config = ChartConfig::bar_defaults();
        config.stacked = stacked;
        BarChart::new(&tables.mean, tables.error_bars(), &config).layout()
    }

    #[test]
    fn grouped_bars_split_the_slot() {
        let bars = layout("a 1 10\nb 1 30\na 2 20\nb 2 40", false);
        assert_eq!(bars.len(), 4);
        let first = bars[0];
        assert_eq!((first.row, first.col), (0, 0));
        assert!((first.left - -0.375).abs() < 1e-12);
        assert!((first.right - 0.0).abs() < 1e-12);
        assert_eq!((first.bottom, first.top), (0.0, 10.0));
        assert!((bars[3].center() - 1.1875).abs() < 1e-12);
    }

    #[test]
    fn stacked_bars_accumulate() {
        let bars = layout("a 1 10\nb 1 30\na 2 20\nb 2 40", true);
        let second = bars[1];
        assert_eq!((second.bottom, second.top), (10.0, 40.0));
        assert_eq!(second.left, bars[0].left);
    }

    #[test]
    fn whiskers_follow_min_and_max() {
        let bars = layout("a 1 10\na 1 30\na 2 5", false);
        assert_eq!(bars[0].whisker, Some((10.0, 30.0)));
        assert_eq!(bars[1].whisker, Some((5.0, 5.0)));
    }

    #[test]
    fn single_row_has_no_whiskers() {
        let bars = layout("a 1 10\na 1 30", false);
        assert_eq!(bars[0].top, 20.0);
        assert_eq!(bars[0].whisker, None);
    }

    #[test]
    fn zero_width_disables_whiskers() {
        let (_, tables) = reshape_text("a 1 10\na 1 30\na 2 5").unwrap();
        let mut config = ChartConfig::bar_defaults();
        config.error_bar_width = 0.0;
        let bars = BarChart::new(&tables.mean, tables.error_bars(), &config).layout();
        assert!(bars.iter().all(|b| b.whisker.is_none()));
    }

    #[test]
    fn missing_cells_leave_gaps() {
        let bars = layout("a 1 10\na 2 20\nb 2 40", false);
        assert_eq!(bars.len(), 3);
        assert!(!bars.iter().any(|b| b.row == 0 && b.col == 1));
    }
}
