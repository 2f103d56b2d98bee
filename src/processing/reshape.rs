//! Turns parsed input into mean/min/max pivot tables.
//!
//! Order of operations: drop ignored series, infer the column layout on what
//! remains, apply renames (one step) while building records, fix the column
//! order, then aggregate.

use crate::data::layout::{infer_layout, to_records, ColumnLayout};
use crate::data::parser::{parse_input, DataLine, Directives, ParsedInput};
use crate::data::record::SeriesTable;
use crate::error::ReshapeError;
use crate::processing::pivot::{Aggregation, DeviationBars, PivotTable, StatsGrid};
use crate::processing::statistics::SampleStats;

#[derive(Debug, Clone)]
pub struct ReshapedTables {
    pub layout: ColumnLayout,
    pub series: SeriesTable,
    pub mean: PivotTable,
    pub min: PivotTable,
    pub max: PivotTable,
}

impl ReshapedTables {
    pub fn table(&self, aggregation: Aggregation) -> &PivotTable {
        match aggregation {
            Aggregation::Mean => &self.mean,
            Aggregation::Min => &self.min,
            Aggregation::Max => &self.max,
        }
    }

    /// `max - mean` and `mean - min` for every cell.
    pub fn deviation_bars(&self) -> DeviationBars {
        DeviationBars::from_tables(&self.mean, &self.min, &self.max)
    }

    /// A single x value carries no meaningful spread, so bar charts draw
    /// no error bars for it.
    pub fn error_bars_suppressed(&self) -> bool {
        self.mean.row_count() < 2
    }

    /// Deviation bars to draw, if any.
    pub fn error_bars(&self) -> Option<DeviationBars> {
        (!self.error_bars_suppressed()).then(|| self.deviation_bars())
    }

    /// Statistics of each series over all of its samples, in column order.
    pub fn series_summary(&self) -> Vec<(String, SampleStats)> {
        self.mean
            .columns()
            .iter()
            .filter_map(|label| {
                let ys: Vec<f64> = self.series.points(label)?.iter().map(|(_, y)| *y).collect();
                Some((label.clone(), SampleStats::compute(&ys)?))
            })
            .collect()
    }

    /// Statistics over every sample of every series.
    pub fn overall_summary(&self) -> SampleStats {
        let mut total = SampleStats::default();
        for (_, stats) in self.series_summary() {
            total.merge(&stats);
        }
        total
    }
}

/// Data lines whose series is not ignored.
pub fn kept_lines(input: &ParsedInput) -> Vec<DataLine> {
    input
        .data
        .iter()
        .filter(|line| {
            line.tokens
                .first()
                .map_or(true, |label| !input.directives.is_ignored(label))
        })
        .cloned()
        .collect()
}

/// Column order for the pivot tables.
///
/// Without a SORT list the series are ordered lexicographically. With one,
/// the list and the data must name exactly the same series.
pub fn column_order(table: &SeriesTable, sort: &[String]) -> Result<Vec<String>, ReshapeError> {
    if sort.is_empty() {
        let mut labels: Vec<String> = table.labels().map(str::to_string).collect();
        labels.sort();
        return Ok(labels);
    }

    if let Some(label) = table.labels().find(|l| !sort.iter().any(|s| s == l)) {
        return Err(ReshapeError::InvalidOrdering {
            label: label.to_string(),
        });
    }

    let mut order: Vec<String> = Vec::with_capacity(sort.len());
    for label in sort {
        if table.points(label).is_none() {
            return Err(ReshapeError::InvalidOrdering {
                label: label.clone(),
            });
        }
        if !order.contains(label) {
            order.push(label.clone());
        }
    }
    Ok(order)
}

/// Reshape already-parsed input.
pub fn reshape(input: &ParsedInput) -> Result<ReshapedTables, ReshapeError> {
    let directives: &Directives = &input.directives;
    let kept = kept_lines(input);
    if kept.is_empty() {
        return Err(ReshapeError::NoData);
    }

    let layout = infer_layout(&kept)?;
    let records = to_records(&kept, layout, |raw| directives.renamed(raw).to_string())?;
    let series = SeriesTable::from_records(records);
    let columns = column_order(&series, &directives.sort)?;

    tracing::debug!(
        ?layout,
        series = series.series_count(),
        points = series.point_count(),
        "reshaping"
    );

    let grid = StatsGrid::build(&series, columns);
    Ok(ReshapedTables {
        layout,
        mean: grid.pivot(Aggregation::Mean),
        min: grid.pivot(Aggregation::Min),
        max: grid.pivot(Aggregation::Max),
        series,
    })
}

/// Parse and reshape raw text.
pub fn reshape_text(text: &str) -> Result<(Directives, ReshapedTables), ReshapeError> {
    let input = parse_input(text.lines())?;
    let tables = reshape(&input)?;
    Ok((input.directives, tables))
}
