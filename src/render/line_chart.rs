use plotters::coord::Shift;
use plotters::prelude::*;

use crate::processing::pivot::PivotTable;
use crate::render::axis::{XAxis, YScale};
use crate::render::{Chart, PlotError, Result};
use crate::state::chart_config::ChartConfig;
use crate::state::series_style::Marker;

const LINE_WIDTH: u32 = 2;

/// One line per pivot column, through the cells that have a value.
pub struct LineChart<'a> {
    pub table: &'a PivotTable,
    pub config: &'a ChartConfig,
}

impl<'a> LineChart<'a> {
    pub fn new(table: &'a PivotTable, config: &'a ChartConfig) -> Self {
        Self { table, config }
    }

    /// Runs of consecutive present cells for column `col`, in axis
    /// coordinates. A missing cell ends a run.
    pub fn segments(&self, axis: &XAxis, y: YScale, col: usize) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (row, value) in self.table.column(col).enumerate() {
            match value.and_then(|v| y.project(v)) {
                Some(c) => current.push((axis.position(row), c)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

impl Chart for LineChart<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let cfg = self.config;
        let theme = cfg.theme;
        let fg = theme.foreground();
        let font = cfg.font_px();

        root.fill(&theme.background())
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

        let axis = XAxis::for_lines(self.table.rows());
        let y = YScale::new(cfg.log_y);
        tracing::debug!(
            theme = theme.label(),
            categorical = matches!(axis, XAxis::Categorical(_)),
            "drawing line chart"
        );
        let (x_lo, x_hi) = axis.range();
        let (y_lo, y_hi) = y.range(self.table.present_values());

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(font)
            .x_label_area_size(font * 3)
            .y_label_area_size(font * 5);
        if !cfg.title.is_empty() {
            builder.caption(&cfg.title, ("sans-serif", font * 6 / 5).into_font().color(&fg));
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
            .label_style(("sans-serif", font).into_font().color(&fg))
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt);
        if let XAxis::Categorical(labels) = &axis {
            mesh.x_labels(labels.len().max(1));
        }
        if !cfg.x_axis.label.is_empty() {
            mesh.x_desc(cfg.x_axis.label.as_str());
        }
        if !cfg.y_axis.label.is_empty() {
            mesh.y_desc(cfg.y_axis.label.as_str());
        }
        if !cfg.x_axis.grid {
            mesh.disable_x_mesh();
        }
        if !cfg.y_axis.grid {
            mesh.disable_y_mesh();
        }
        mesh.max_light_lines(cfg.light_lines());
        mesh.draw().map_err(|e| PlotError::Drawing(e.to_string()))?;

        let marker_size = (font / 3).max(3) as i32;
        for (col, label) in self.table.columns().iter().enumerate() {
            let style = cfg.series_style(label, col, LINE_WIDTH);
            let color = style.color;
            let stroke = color.stroke_width(style.line_width);
            let segments = self.segments(&axis, y, col);
            tracing::debug!(
                series = %label,
                marker = style.marker.label(),
                points = segments.iter().map(Vec::len).sum::<usize>(),
                "plotting series"
            );

            for (i, segment) in segments.iter().enumerate() {
                let drawn = chart
                    .draw_series(LineSeries::new(segment.iter().copied(), stroke))
                    .map_err(|e| PlotError::Drawing(e.to_string()))?;
                if i == 0 {
                    drawn.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH))
                    });
                }
            }

            let points = segments.iter().flatten().copied();
            match style.marker {
                Marker::Circle => chart
                    .draw_series(points.map(|p| Circle::new(p, marker_size, color.filled())))
                    .map(|_| ()),
                Marker::Cross => chart
                    .draw_series(points.map(|p| Cross::new(p, marker_size, color.stroke_width(2))))
                    .map(|_| ()),
                Marker::Triangle => chart
                    .draw_series(points.map(|p| TriangleMarker::new(p, marker_size, color.filled())))
                    .map(|_| ()),
                Marker::Square => chart
                    .draw_series(points.map(|p| {
                        EmptyElement::at(p)
                            + Rectangle::new(
                                [(-marker_size, -marker_size), (marker_size, marker_size)],
                                color.filled(),
                            )
                    }))
                    .map(|_| ()),
                Marker::None => Ok(()),
            }
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }

        if cfg.legend.include && self.table.column_count() > 0 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(theme.background().mix(0.8))
                .border_style(fg)
                .label_font(("sans-serif", font).into_font().color(&fg))
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

    #[test]
    fn missing_cells_split_the_line() {
        let (_, tables) = reshape_text("a 1 1\na 2 2\nb 2 5\na 4 4\nb 3 6").unwrap();
        let config = ChartConfig::line_defaults();
        let chart = LineChart::new(&tables.mean, &config);
        let axis = XAxis::for_lines(tables.mean.rows());
        let y = YScale::new(false);

        // rows: 1, 2, 3, 4
        assert_eq!(
            chart.segments(&axis, y, 0),
            vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(4.0, 4.0)]]
        );
        assert_eq!(chart.segments(&axis, y, 1), vec![vec![(2.0, 5.0), (3.0, 6.0)]]);
    }

    #[test]
    fn log_axis_drops_non_positive_points() {
        let (_, tables) = reshape_text("a 1 0\na 2 100").unwrap();
        let config = ChartConfig::line_defaults();
        let chart = LineChart::new(&tables.mean, &config);
        let axis = XAxis::for_lines(tables.mean.rows());
        assert_eq!(chart.segments(&axis, YScale::new(true), 0), vec![vec![(2.0, 2.0)]]);
    }
}
