//! Column-count inference for data lines.
//!
//! Input is either `series x y` (three columns) or `series y` (two columns,
//! x assigned per series by position). The layout is never declared, so it
//! is inferred: the three-column reading is tried first, then the
//! two-column one, and the input is rejected if neither fits every line.

use std::collections::HashMap;

use crate::data::parser::DataLine;
use crate::data::record::{Record, XKey};
use crate::error::ReshapeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// `series x y`
    ThreeColumn,
    /// `series y`, x is the 1-based index of the line within its series
    TwoColumn,
}

impl ColumnLayout {
    pub fn width(self) -> usize {
        match self {
            ColumnLayout::ThreeColumn => 3,
            ColumnLayout::TwoColumn => 2,
        }
    }
}

/// Where a layout hypothesis first stopped matching.
#[derive(Debug, Clone, PartialEq)]
struct Mismatch {
    position: usize,
    error: ReshapeError,
}

fn parse_y(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check that every line matches `layout`.
fn check(lines: &[DataLine], layout: ColumnLayout) -> Result<(), Mismatch> {
    let width = layout.width();
    for (position, line) in lines.iter().enumerate() {
        let reason = if line.tokens.len() != width {
            Some(format!(
                "expected {width} tokens, found {}",
                line.tokens.len()
            ))
        } else if parse_y(&line.tokens[width - 1]).is_none() {
            Some(format!(
                "y value '{}' is not a number",
                line.tokens[width - 1]
            ))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(Mismatch {
                position,
                error: ReshapeError::MalformedInput {
                    line: line.line,
                    content: line.text.clone(),
                    reason,
                },
            });
        }
    }
    Ok(())
}

/// Decide how `lines` should be read.
///
/// Returns the three-column layout when every line has three tokens and a
/// numeric y, otherwise the two-column layout when every line has two tokens
/// and a numeric y. When both fail, the error describes the failure of the
/// hypothesis that matched more lines before breaking.
pub fn infer_layout(lines: &[DataLine]) -> Result<ColumnLayout, ReshapeError> {
    let three = match check(lines, ColumnLayout::ThreeColumn) {
        Ok(()) => return Ok(ColumnLayout::ThreeColumn),
        Err(m) => m,
    };
    tracing::debug!(error = %three.error, "three-column reading failed, trying two columns");

    let two = match check(lines, ColumnLayout::TwoColumn) {
        Ok(()) => return Ok(ColumnLayout::TwoColumn),
        Err(m) => m,
    };

    Err(if two.position > three.position {
        two.error
    } else {
        three.error
    })
}

/// Convert lines that already satisfy `layout` into records.
///
/// `label` maps the raw series token to the label stored in the record.
/// Under the two-column layout the positional x counter runs per mapped
/// label.
pub fn to_records<'a, F>(
    lines: &'a [DataLine],
    layout: ColumnLayout,
    mut label: F,
) -> Result<Vec<Record>, ReshapeError>
where
    F: FnMut(&'a str) -> String,
{
    check(lines, layout).map_err(|m| m.error)?;

    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut records = Vec::with_capacity(lines.len());
    for line in lines {
        let series = label(line.tokens[0].as_str());
        let (x, y_token) = match layout {
            ColumnLayout::ThreeColumn => (XKey::parse(&line.tokens[1]), &line.tokens[2]),
            ColumnLayout::TwoColumn => {
                let n = counters.entry(series.clone()).or_insert(0);
                *n += 1;
                (XKey::from(*n), &line.tokens[1])
            }
        };
        // `check` validated every y token above.
        let y = parse_y(y_token).unwrap_or(f64::NAN);
        records.push(Record { series, x, y });
    }
    Ok(records)
}
