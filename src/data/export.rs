use std::io::Write;

use polars::prelude::*;

use crate::data::parser::DataLine;
use crate::processing::pivot::PivotTable;
use crate::processing::reshape::ReshapedTables;

/// Header of the x column in pivot dumps; series labels fill the others.
pub const INDEX_COLUMN: &str = "(x)";

/// A pivot table as a frame: the x column then one nullable column per series.
pub fn pivot_frame(table: &PivotTable) -> PolarsResult<DataFrame> {
    let mut columns = Vec::with_capacity(table.column_count() + 1);
    let xs: Vec<String> = table.rows().iter().map(|x| x.to_string()).collect();
    columns.push(Column::new(INDEX_COLUMN.into(), xs));
    for (col, name) in table.columns().iter().enumerate() {
        let values: Vec<Option<f64>> = table.column(col).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    DataFrame::new(columns)
}

/// Tokenized data lines as a `series, x, y` frame; absent tokens are null.
///
/// This is what the three-column reading saw, printed when the input is
/// rejected.
pub fn raw_frame(lines: &[DataLine]) -> PolarsResult<DataFrame> {
    let token = |i: usize| -> Vec<Option<&str>> {
        lines
            .iter()
            .map(|l| l.tokens.get(i).map(String::as_str))
            .collect()
    };
    DataFrame::new(vec![
        Column::new("series".into(), token(0)),
        Column::new("x".into(), token(1)),
        Column::new("y".into(), token(2)),
    ])
}

/// Long-form CSV: one `x,series,mean,min,max` row per non-missing cell.
pub fn write_long_csv<W: Write>(tables: &ReshapedTables, writer: W) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["x", "series", "mean", "min", "max"])?;
    for (row, x) in tables.mean.rows().iter().enumerate() {
        for (col, series) in tables.mean.columns().iter().enumerate() {
            let (Some(mean), Some(min), Some(max)) = (
                tables.mean.get(row, col),
                tables.min.get(row, col),
                tables.max.get(row, col),
            ) else {
                continue;
            };
            out.write_record([
                x.to_string(),
                series.clone(),
                mean.to_string(),
                min.to_string(),
                max.to_string(),
            ])?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parser::parse_input;
    use crate::processing::reshape::reshape_text;

    #[test]
    fn pivot_frame_has_index_and_series_columns() {
        let (_, tables) = reshape_text("a 1 10\na 2 20\nb 1 30").unwrap();
        let df = pivot_frame(&tables.mean).unwrap();
        assert_eq!(df.shape(), (2, 3));
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, [INDEX_COLUMN, "a", "b"]);
        assert_eq!(df.column("b").unwrap().null_count(), 1);
    }

    #[test]
    fn raw_frame_nulls_missing_tokens() {
        let input = parse_input("a 1 10\na 20".lines()).unwrap();
        let df = raw_frame(&input.data).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("y").unwrap().null_count(), 1);
    }

    #[test]
    fn long_csv_skips_missing_cells() {
        let (_, tables) = reshape_text("a 1 10\na 1 30\nb 2 5").unwrap();
        let mut buf = Vec::new();
        write_long_csv(&tables, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "x,series,mean,min,max\n1,a,20,10,30\n2,b,5,5,5\n");
    }
}
