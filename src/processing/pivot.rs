use std::collections::BTreeSet;

use crate::data::record::{SeriesTable, XKey};
use crate::processing::statistics::SampleStats;

/// Which per-cell statistic a pivot table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Mean,
    Min,
    Max,
}

impl Aggregation {
    pub const ALL: [Aggregation; 3] = [Aggregation::Mean, Aggregation::Min, Aggregation::Max];

    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }

    fn apply(&self, stats: &SampleStats) -> Option<f64> {
        match self {
            Aggregation::Mean => stats.mean(),
            Aggregation::Min => Some(stats.min),
            Aggregation::Max => Some(stats.max),
        }
    }
}

/// Distinct x values as rows, series labels as columns.
///
/// A cell with no samples is `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    rows: Vec<XKey>,
    columns: Vec<String>,
    // row-major: cells[row * columns.len() + col]
    cells: Vec<Option<f64>>,
}

impl PivotTable {
    pub fn rows(&self) -> &[XKey] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows.len() || col >= self.columns.len() {
            return None;
        }
        self.cells[row * self.columns.len() + col]
    }

    /// Look a cell up by its keys.
    pub fn cell(&self, x: &XKey, series: &str) -> Option<f64> {
        let row = self.rows.binary_search(x).ok()?;
        let col = self.column_index(series)?;
        self.get(row, col)
    }

    pub fn column_index(&self, series: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == series)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..self.rows.len()).map(move |row| self.get(row, col))
    }

    /// True when no cell is missing.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// Element-wise `self - other`; missing if either side is.
    fn difference(&self, other: &PivotTable) -> PivotTable {
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| Some((*a)? - (*b)?))
            .collect();
        PivotTable {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            cells,
        }
    }
}

/// Per-cell sample statistics from which every aggregation is read.
#[derive(Debug, Clone)]
pub struct StatsGrid {
    rows: Vec<XKey>,
    columns: Vec<String>,
    cells: Vec<Option<SampleStats>>,
}

impl StatsGrid {
    /// Fold `table` into a grid with the given column order.
    ///
    /// Series not named in `columns` are left out.
    pub fn build(table: &SeriesTable, columns: Vec<String>) -> Self {
        let rows: Vec<XKey> = columns
            .iter()
            .filter_map(|c| table.points(c))
            .flat_map(|points| points.iter().map(|(x, _)| x.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells = vec![None; rows.len() * columns.len()];
        for (col, label) in columns.iter().enumerate() {
            for (x, y) in table.points(label).unwrap_or_default() {
                // Every x came from this same table, so the search always hits.
                if let Ok(row) = rows.binary_search(x) {
                    cells[row * columns.len() + col]
                        .get_or_insert_with(SampleStats::default)
                        .push(*y);
                }
            }
        }

        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn pivot(&self, aggregation: Aggregation) -> PivotTable {
        PivotTable {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            cells: self
                .cells
                .iter()
                .map(|c| c.as_ref().and_then(|s| aggregation.apply(s)))
                .collect(),
        }
    }
}

/// Asymmetric error bars around the mean.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationBars {
    /// max - mean
    pub positive: PivotTable,
    /// mean - min
    pub negative: PivotTable,
}

impl DeviationBars {
    pub fn from_tables(mean: &PivotTable, min: &PivotTable, max: &PivotTable) -> Self {
        Self {
            positive: max.difference(mean),
            negative: mean.difference(min),
        }
    }

    /// `(positive, negative)` for one cell.
    pub fn get(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        Some((self.positive.get(row, col)?, self.negative.get(row, col)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Record;

    fn grid(records: Vec<Record>, columns: &[&str]) -> StatsGrid {
        let table = SeriesTable::from_records(records);
        StatsGrid::build(&table, columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn duplicate_samples_aggregate_per_cell() {
        let g = grid(
            vec![Record::new("a", 1.0, 10.0), Record::new("a", 1.0, 30.0)],
            &["a"],
        );
        let x = XKey::from(1.0);
        assert_eq!(g.pivot(Aggregation::Mean).cell(&x, "a"), Some(20.0));
        assert_eq!(g.pivot(Aggregation::Min).cell(&x, "a"), Some(10.0));
        assert_eq!(g.pivot(Aggregation::Max).cell(&x, "a"), Some(30.0));
    }

    #[test]
    fn sparse_cells_stay_missing() {
        let g = grid(
            vec![
                Record::new("a", 1.0, 1.0),
                Record::new("a", 2.0, 2.0),
                Record::new("b", 2.0, 3.0),
            ],
            &["a", "b"],
        );
        let mean = g.pivot(Aggregation::Mean);
        assert_eq!(mean.rows(), [XKey::from(1.0), XKey::from(2.0)]);
        assert_eq!(mean.cell(&XKey::from(1.0), "b"), None);
        assert_eq!(mean.cell(&XKey::from(2.0), "b"), Some(3.0));
        assert!(!mean.is_complete());
    }

    #[test]
    fn columns_follow_requested_order() {
        let g = grid(
            vec![Record::new("a", 1.0, 1.0), Record::new("b", 1.0, 2.0)],
            &["b", "a"],
        );
        let mean = g.pivot(Aggregation::Mean);
        assert_eq!(mean.columns(), ["b", "a"]);
        assert_eq!(mean.get(0, 0), Some(2.0));
    }

    #[test]
    fn deviation_bars_are_distance_from_mean() {
        let g = grid(
            vec![
                Record::new("a", 1.0, 10.0),
                Record::new("a", 1.0, 30.0),
                Record::new("a", 2.0, 5.0),
            ],
            &["a"],
        );
        let (mean, min, max) = (
            g.pivot(Aggregation::Mean),
            g.pivot(Aggregation::Min),
            g.pivot(Aggregation::Max),
        );
        let bars = DeviationBars::from_tables(&mean, &min, &max);
        assert_eq!(bars.get(0, 0), Some((10.0, 10.0)));
        assert_eq!(bars.get(1, 0), Some((0.0, 0.0)));
    }

    #[test]
    fn deviation_bars_exist_for_a_single_row() {
        let g = grid(
            vec![Record::new("a", 1.0, 10.0), Record::new("a", 1.0, 30.0)],
            &["a"],
        );
        let (mean, min, max) = (
            g.pivot(Aggregation::Mean),
            g.pivot(Aggregation::Min),
            g.pivot(Aggregation::Max),
        );
        let bars = DeviationBars::from_tables(&mean, &min, &max);
        assert_eq!(bars.get(0, 0), Some((10.0, 10.0)));
    }
}
