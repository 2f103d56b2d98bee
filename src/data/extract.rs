use std::path::{Path, PathBuf};

use crate::data::record::{Record, XKey};
use crate::error::ExtractError;

/// Find `field` in captured benchmark output.
///
/// Matches the first line that starts with the field name followed by `=`,
/// `:` or whitespace, and returns the first numeric token after it.
pub fn find_field(text: &str, field: &str) -> Option<f64> {
    text.lines().find_map(|line| {
        let rest = line.trim().strip_prefix(field)?;
        if !rest.starts_with(|c: char| c == '=' || c == ':' || c.is_whitespace()) {
            return None;
        }
        rest.trim_start_matches(|c: char| c == '=' || c == ':' || c.is_whitespace())
            .split_whitespace()
            .find_map(|token| token.trim_end_matches(',').parse::<f64>().ok())
    })
}

pub fn extract_file(path: &Path, field: &str) -> Result<f64, ExtractError> {
    let text = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    find_field(&text, field).ok_or_else(|| ExtractError::FieldNotFound {
        field: field.to_string(),
        source_path: path.to_path_buf(),
    })
}

/// One `series x value` record per output file.
pub fn extract_records(
    series: &str,
    x: &str,
    field: &str,
    paths: &[PathBuf],
) -> Result<Vec<Record>, ExtractError> {
    paths
        .iter()
        .map(|path| {
            let y = extract_file(path, field)?;
            tracing::debug!(path = %path.display(), field, y, "extracted field");
            Ok(Record {
                series: series.to_string(),
                x: XKey::parse(x),
                y,
            })
        })
        .collect()
}
