use plotters::coord::Shift;
use plotters::prelude::*;

use crate::render::{Chart, PlotError, Result};
use crate::state::chart_config::ChartConfig;

/// Just the legend: one swatch and label per series, laid out row-major in
/// `legend.columns` columns.
pub struct LegendOnly<'a> {
    pub labels: &'a [String],
    pub config: &'a ChartConfig,
}

impl<'a> LegendOnly<'a> {
    pub fn new(labels: &'a [String], config: &'a ChartConfig) -> Self {
        Self { labels, config }
    }

    pub fn grid(&self) -> (usize, usize) {
        let columns = self.config.legend.columns.clamp(1, self.labels.len().max(1));
        let rows = self.labels.len().div_ceil(columns);
        (rows, columns)
    }

    /// Top-left corner of entry `index` in a `cell` sized grid.
    pub fn cell_origin(&self, index: usize, cell: (i32, i32)) -> (i32, i32) {
        let (_, columns) = self.grid();
        let (row, col) = (index / columns, index % columns);
        (col as i32 * cell.0, row as i32 * cell.1)
    }
}

impl Chart for LegendOnly<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let cfg = self.config;
        let fg = cfg.theme.foreground();
        root.fill(&cfg.theme.background())
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

        let (rows, columns) = self.grid();
        let (width, height) = root.dim_in_pixel();
        let cell = (
            (width as usize / columns) as i32,
            (height as usize / rows.max(1)) as i32,
        );
        let font = cfg.font_px() as i32;
        let swatch = (font * 3 / 4).min(cell.1 - 2).max(2);
        let style = ("sans-serif", font).into_font().color(&fg);

        for (index, label) in self.labels.iter().enumerate() {
            let color = cfg.series_style(label, index, 1).color;
            let (x, y) = self.cell_origin(index, cell);
            let top = y + (cell.1 - swatch) / 2;
            let left = x + font / 2;
            root.draw(&Rectangle::new(
                [(left, top), (left + swatch, top + swatch)],
                color.filled(),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
            root.draw(&Rectangle::new(
                [(left, top), (left + swatch, top + swatch)],
                fg.stroke_width(1),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
            root.draw(&Text::new(
                label.clone(),
                (left + swatch + font / 2, y + (cell.1 - font) / 2),
                style.clone(),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }
        Ok(())
    }
}
