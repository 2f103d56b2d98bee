use crate::data::record::XKey;

/// How pivot rows map onto the horizontal axis.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// Rows plotted at their numeric value.
    Numeric(Vec<f64>),
    /// Rows plotted at 0, 1, 2, ... and labelled with their text.
    Categorical(Vec<String>),
}

impl XAxis {
    /// Numeric when every row is a number, categorical otherwise.
    pub fn for_lines(rows: &[XKey]) -> Self {
        let numbers: Option<Vec<f64>> = rows.iter().map(XKey::as_number).collect();
        match numbers {
            Some(values) => XAxis::Numeric(values),
            None => Self::categorical(rows),
        }
    }

    /// Bar groups are always evenly spaced.
    pub fn categorical(rows: &[XKey]) -> Self {
        XAxis::Categorical(rows.iter().map(|x| x.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            XAxis::Numeric(v) => v.len(),
            XAxis::Categorical(l) => l.len(),
        }
    }

    pub fn position(&self, row: usize) -> f64 {
        match self {
            XAxis::Numeric(v) => v[row],
            XAxis::Categorical(_) => row as f64,
        }
    }

    pub fn range(&self) -> (f64, f64) {
        match self {
            XAxis::Numeric(v) => {
                let lo = v.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if !lo.is_finite() || !hi.is_finite() {
                    return (0.0, 1.0);
                }
                if lo == hi {
                    return (lo - 1.0, hi + 1.0);
                }
                let pad = (hi - lo) * 0.02;
                (lo - pad, hi + pad)
            }
            XAxis::Categorical(l) => (-0.5, l.len().max(1) as f64 - 0.5),
        }
    }

    /// Tick text at axis position `v`.
    pub fn tick_label(&self, v: f64) -> String {
        match self {
            XAxis::Numeric(_) => format_tick(v),
            XAxis::Categorical(labels) => {
                let idx = v.round();
                if (v - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            }
        }
    }
}

/// Linear or base-10 logarithmic value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YScale {
    pub log: bool,
}

impl YScale {
    pub fn new(log: bool) -> Self {
        Self { log }
    }

    /// Axis coordinate for a data value; `None` if it cannot be shown
    /// (non-positive on a log axis).
    pub fn project(&self, v: f64) -> Option<f64> {
        if !self.log {
            return Some(v);
        }
        (v > 0.0).then(|| v.log10())
    }

    pub fn tick_label(&self, coord: f64) -> String {
        if self.log {
            format_tick(10f64.powf(coord))
        } else {
            format_tick(coord)
        }
    }

    /// Axis coordinate range covering `values`.
    ///
    /// Linear axes always include zero so bars have a baseline; log axes
    /// snap outward to whole decades.
    pub fn range(&self, values: impl IntoIterator<Item = f64>) -> (f64, f64) {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for c in values.into_iter().filter_map(|v| self.project(v)) {
            lo = lo.min(c);
            hi = hi.max(c);
        }
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        if self.log {
            let (lo, hi) = (lo.floor(), hi.ceil());
            return if lo == hi { (lo, hi + 1.0) } else { (lo, hi) };
        }
        let (lo, hi) = (lo.min(0.0), hi.max(0.0));
        if lo == hi {
            return (0.0, 1.0);
        }
        let pad = (hi - lo) * 0.05;
        (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
    }
}

/// Compact tick text: integers without decimals, large magnitudes in
/// scientific notation.
pub fn format_tick(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    let a = v.abs();
    if a != 0.0 && (a >= 1e7 || a < 1e-3) {
        return format!("{v:.1e}");
    }
    if (v - v.round()).abs() < 1e-9 {
        return format!("{}", v.round() as i64);
    }
    let s = format!("{v:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_rows_stay_numeric() {
        let rows = [XKey::from(1.0), XKey::from(8.0)];
        let axis = XAxis::for_lines(&rows);
        assert_eq!(axis, XAxis::Numeric(vec![1.0, 8.0]));
        assert_eq!(axis.position(1), 8.0);
    }

    #[test]
    fn any_label_makes_the_axis_categorical() {
        let rows = [XKey::from(1.0), XKey::parse("all")];
        let axis = XAxis::for_lines(&rows);
        assert_eq!(axis.position(1), 1.0);
        assert_eq!(axis.tick_label(1.0), "all");
        assert_eq!(axis.tick_label(0.5), "");
        assert_eq!(axis.range(), (-0.5, 1.5));
    }

    #[test]
    fn single_numeric_row_gets_a_usable_range() {
        let axis = XAxis::for_lines(&[XKey::from(4.0)]);
        assert_eq!(axis.range(), (3.0, 5.0));
    }

    #[test]
    fn linear_range_includes_zero() {
        let (lo, hi) = YScale::new(false).range([10.0, 20.0]);
        assert_eq!(lo, 0.0);
        assert!(hi > 20.0);
    }

    #[test]
    fn log_range_snaps_to_decades_and_skips_non_positive() {
        let y = YScale::new(true);
        assert_eq!(y.range([0.0, 15.0, 2000.0]), (1.0, 4.0));
        assert_eq!(y.project(-1.0), None);
        assert_eq!(y.tick_label(2.0), "100");
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(16.0), "16");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(12_345_678.0), "1.2e7");
        assert_eq!(format_tick(0.0), "0");
    }
}
