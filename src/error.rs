use std::path::PathBuf;
use thiserror::Error;

use crate::render::PlotError;

/// Failures while turning input lines into pivot tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReshapeError {
    #[error("malformed input at line {line} ('{content}'): {reason}; provide valid two or three column data")]
    MalformedInput {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("malformed directive at line {line}: '{content}'")]
    MalformedDirective { line: usize, content: String },

    #[error("invalid ordering: series '{label}' is not covered by both the SORT list and the data")]
    InvalidOrdering { label: String },

    #[error("no data provided, so no graph to render")]
    NoData,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("field '{field}' not found in {}", source_path.display())]
    FieldNotFound { field: String, source_path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level error for a single invocation.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Reshape(#[from] ReshapeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid style file: {0}")]
    Style(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("table formatting failed: {0}")]
    Table(#[from] polars::error::PolarsError),
}

pub type Result<T, E = AppError> = core::result::Result<T, E>;
