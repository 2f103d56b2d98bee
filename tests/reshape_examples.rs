//! End-to-end reshaping of small hand-written inputs.

use benchplot::data::layout::ColumnLayout;
use benchplot::data::record::XKey;
use benchplot::error::ReshapeError;
use benchplot::processing::pivot::{Aggregation, PivotTable};
use benchplot::processing::reshape::reshape_text;

fn x(v: f64) -> XKey {
    XKey::from(v)
}

fn pivots(text: &str) -> (PivotTable, PivotTable, PivotTable) {
    let (_, t) = reshape_text(text).unwrap();
    (t.mean, t.min, t.max)
}

#[test]
fn three_column_grid() {
    let (_, tables) = reshape_text("a 1 10\na 2 20\nb 1 30\nb 2 40").unwrap();
    assert_eq!(tables.layout, ColumnLayout::ThreeColumn);
    let mean = &tables.mean;
    assert_eq!(mean.rows(), [x(1.0), x(2.0)]);
    assert_eq!(mean.columns(), ["a", "b"]);
    assert_eq!(mean.cell(&x(1.0), "a"), Some(10.0));
    assert_eq!(mean.cell(&x(2.0), "a"), Some(20.0));
    assert_eq!(mean.cell(&x(1.0), "b"), Some(30.0));
    assert_eq!(mean.cell(&x(2.0), "b"), Some(40.0));
    assert_eq!(tables.min, tables.mean);
    assert_eq!(tables.max, tables.mean);
}

#[test]
fn two_column_matches_explicit_positions() {
    let (_, two) = reshape_text("a 10\na 20\nb 30").unwrap();
    let (_, three) = reshape_text("a 1 10\na 2 20\nb 1 30").unwrap();
    assert_eq!(two.layout, ColumnLayout::TwoColumn);
    for aggregation in Aggregation::ALL {
        assert_eq!(two.table(aggregation), three.table(aggregation));
    }
    assert_eq!(two.mean.cell(&x(2.0), "b"), None);
}

#[test]
fn ignore_drops_a_column_everywhere() {
    let (mean, min, max) = pivots("IGNORE a\na 1 10\nb 1 30\na 2 20\nb 2 40");
    for table in [&mean, &min, &max] {
        assert_eq!(table.columns(), ["b"]);
        assert_eq!(table.cell(&x(2.0), "b"), Some(40.0));
    }
}

#[test]
fn rename_relabels_without_touching_values() {
    let (mean, _, _) = pivots("RENAME a x\na 1 10\nb 1 30");
    assert_eq!(mean.columns(), ["b", "x"]);
    assert_eq!(mean.cell(&x(1.0), "x"), Some(10.0));
    assert_eq!(mean.column_index("a"), None);
}

#[test]
fn duplicates_produce_deviation_bars() {
    let (_, tables) = reshape_text("a 1 10\na 1 30").unwrap();
    assert_eq!(tables.mean.cell(&x(1.0), "a"), Some(20.0));
    assert_eq!(tables.min.cell(&x(1.0), "a"), Some(10.0));
    assert_eq!(tables.max.cell(&x(1.0), "a"), Some(30.0));
    let bars = tables.deviation_bars();
    assert_eq!(bars.positive.cell(&x(1.0), "a"), Some(10.0));
    assert_eq!(bars.negative.cell(&x(1.0), "a"), Some(10.0));
}

#[test]
fn single_x_value_suppresses_drawn_error_bars() {
    let (_, tables) = reshape_text("a 1 10\na 1 30").unwrap();
    assert!(tables.error_bars_suppressed());
    assert!(tables.error_bars().is_none());

    let (_, tables) = reshape_text("a 1 10\na 1 30\na 2 50").unwrap();
    assert_eq!(tables.error_bars().and_then(|b| b.get(0, 0)), Some((10.0, 10.0)));
}

#[test]
fn mixed_token_counts_are_rejected() {
    let err = reshape_text("a 1 10\nb 20").unwrap_err();
    assert!(matches!(err, ReshapeError::MalformedInput { .. }), "{err:?}");
}

#[test]
fn non_numeric_value_is_rejected_with_its_line() {
    let err = reshape_text("# comment\na 1 10\na 2 fast").unwrap_err();
    match err {
        ReshapeError::MalformedInput { line, content, .. } => {
            assert_eq!(line, 3);
            assert_eq!(content, "a 2 fast");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn sort_must_cover_the_data_exactly() {
    assert_eq!(
        reshape_text("SORT a\na 1 1\nb 1 2").unwrap_err(),
        ReshapeError::InvalidOrdering { label: "b".into() }
    );
    assert_eq!(
        reshape_text("SORT a b c\na 1 1\nb 1 2").unwrap_err(),
        ReshapeError::InvalidOrdering { label: "c".into() }
    );
    let (mean, _, _) = pivots("SORT b\nSORT a\na 1 1\nb 1 2");
    assert_eq!(mean.columns(), ["b", "a"]);
}

#[test]
fn everything_ignored_is_no_data() {
    assert_eq!(
        reshape_text("IGNORE a\na 1 1").unwrap_err(),
        ReshapeError::NoData
    );
    assert_eq!(reshape_text("TITLE empty\n\n").unwrap_err(), ReshapeError::NoData);
}

#[test]
fn signed_zero_x_values_share_a_row() {
    let (mean, min, max) = pivots("a 0 1\na -0 3");
    assert_eq!(mean.rows(), [x(0.0)]);
    assert_eq!(mean.cell(&x(0.0), "a"), Some(2.0));
    assert_eq!((min.get(0, 0), max.get(0, 0)), (Some(1.0), Some(3.0)));
}

#[test]
fn categorical_x_values_sort_after_numbers() {
    let (mean, _, _) = pivots("a all 5\na 2 1\na 10 3");
    assert_eq!(mean.rows(), [x(2.0), x(10.0), XKey::parse("all")]);
}
