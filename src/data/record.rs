use std::cmp::Ordering;
use std::fmt;

/// X coordinate of a data point.
///
/// Numeric tokens become `Number`; anything else (e.g. a workload name on a
/// bar chart) is kept verbatim as a `Label`. Numbers sort before labels.
#[derive(Debug, Clone)]
pub enum XKey {
    Number(f64),
    Label(String),
}

impl XKey {
    /// Parse a token, preferring a finite number.
    pub fn parse(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() => XKey::from(v),
            _ => XKey::Label(token.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            XKey::Number(v) => Some(*v),
            XKey::Label(_) => None,
        }
    }
}

impl From<f64> for XKey {
    /// `-0` and `0` are the same x value.
    fn from(v: f64) -> Self {
        XKey::Number(if v == 0.0 { 0.0 } else { v })
    }
}

impl From<usize> for XKey {
    fn from(v: usize) -> Self {
        XKey::Number(v as f64)
    }
}

impl PartialEq for XKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for XKey {}

impl PartialOrd for XKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for XKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (XKey::Number(a), XKey::Number(b)) => a.total_cmp(b),
            (XKey::Number(_), XKey::Label(_)) => Ordering::Less,
            (XKey::Label(_), XKey::Number(_)) => Ordering::Greater,
            (XKey::Label(a), XKey::Label(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for XKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XKey::Number(v) => format_number(*v, f),
            XKey::Label(s) => f.write_str(s),
        }
    }
}

/// Integral values print without a trailing `.0` so thread counts stay readable.
fn format_number(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        write!(f, "{}", v as i64)
    } else {
        write!(f, "{v}")
    }
}

/// One parsed data point.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub series: String,
    pub x: XKey,
    pub y: f64,
}

impl Record {
    pub fn new(series: impl Into<String>, x: impl Into<XKey>, y: f64) -> Self {
        Self {
            series: series.into(),
            x: x.into(),
            y,
        }
    }
}

/// Points grouped by series label, in order of first appearance.
///
/// Duplicate x values within a series are kept as separate samples; they are
/// folded together only when pivoting.
#[derive(Debug, Clone, Default)]
pub struct SeriesTable {
    series: Vec<(String, Vec<(XKey, f64)>)>,
}

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.push(record);
        }
        table
    }

    pub fn push(&mut self, record: Record) {
        match self.series.iter_mut().find(|(label, _)| *label == record.series) {
            Some((_, points)) => points.push((record.x, record.y)),
            None => self.series.push((record.series, vec![(record.x, record.y)])),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(label, _)| label.as_str())
    }

    pub fn points(&self, label: &str) -> Option<&[(XKey, f64)]> {
        self.series
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, points)| points.as_slice())
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|(_, p)| p.len()).sum()
    }
}
