use std::fmt;

use crate::data::record::{Record, XKey};

pub const DEFAULT_BASELINE: &str = "deqalloc";
pub const DEFAULT_SYSTEMS: [&str; 2] = ["deqalloc", "mimalloc"];

/// Averages for one benchmark section of an allocator-comparison file.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSummary {
    pub benchmark: String,
    /// Integer mean per system, in report order.
    pub averages: Vec<(String, i64)>,
    /// Highest-averaging system other than the baseline.
    pub best_other: Option<(String, i64)>,
    /// `(baseline / best_other - 1) * 100`, rounded to 5 decimals.
    pub improvement_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub baseline: String,
    pub benchmarks: Vec<BenchmarkSummary>,
}

/// Header lines name a benchmark: no whitespace, not starting with a digit.
fn is_header(line: &str) -> bool {
    !line.starts_with(|c: char| c.is_ascii_digit()) && !line.contains(char::is_whitespace)
}

fn round5(v: f64) -> f64 {
    (v * 1e5).round() / 1e5
}

/// Parse `text` and average every `system value` sample per benchmark.
///
/// `systems` fixes the leading report order; systems seen later are
/// appended in order of first appearance.
pub fn compare(text: &str, baseline: &str, systems: &[String]) -> ComparisonReport {
    let mut order: Vec<String> = systems.to_vec();
    // (benchmark, [(system, samples)])
    let mut sections: Vec<(String, Vec<(String, Vec<i64>)>)> = Vec::new();
    let mut current: Option<usize> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if is_header(line) {
            // A repeated header continues the earlier section.
            current = match sections.iter().position(|(name, _)| name == line) {
                Some(idx) => Some(idx),
                None => {
                    sections.push((line.to_string(), Vec::new()));
                    Some(sections.len() - 1)
                }
            };
            continue;
        }
        let Some(samples) = current.map(|idx| &mut sections[idx].1) else {
            continue;
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [system, value] = *parts.as_slice() else {
            continue;
        };
        let Ok(value) = value.parse::<i64>() else {
            continue;
        };
        if !order.iter().any(|s| s == system) {
            order.push(system.to_string());
        }
        match samples.iter_mut().find(|(s, _)| *s == system) {
            Some((_, values)) => values.push(value),
            None => samples.push((system.to_string(), vec![value])),
        }
    }

    let benchmarks = sections
        .into_iter()
        .map(|(benchmark, samples)| summarise(benchmark, &samples, &order, baseline))
        .collect();

    ComparisonReport {
        baseline: baseline.to_string(),
        benchmarks,
    }
}

fn summarise(
    benchmark: String,
    samples: &[(String, Vec<i64>)],
    order: &[String],
    baseline: &str,
) -> BenchmarkSummary {
    let averages: Vec<(String, i64)> = order
        .iter()
        .filter_map(|system| {
            let (_, values) = samples.iter().find(|(s, _)| s == system)?;
            // Summed wide so large counters cannot overflow; the floor mean
            // lies between the extremes and fits back into i64.
            let sum: i128 = values.iter().map(|&v| i128::from(v)).sum();
            let avg = sum.div_euclid(values.len() as i128);
            Some((system.clone(), i64::try_from(avg).ok()?))
        })
        .collect();

    let mut best_other: Option<(String, i64)> = None;
    for (system, avg) in averages.iter().filter(|(s, _)| s != baseline) {
        if best_other.as_ref().map_or(true, |(_, best)| best < avg) {
            best_other = Some((system.clone(), *avg));
        }
    }

    let base = averages.iter().find(|(s, _)| s == baseline).map(|(_, a)| *a);
    let improvement_pct = match (base, &best_other) {
        (Some(base), Some((_, best))) if *best != 0 => {
            Some(round5((base as f64 / *best as f64 - 1.0) * 100.0))
        }
        _ => None,
    };

    BenchmarkSummary {
        benchmark,
        averages,
        best_other,
        improvement_pct,
    }
}

impl ComparisonReport {
    /// `system benchmark average` records, ready for a bar chart.
    pub fn records(&self) -> Vec<Record> {
        self.benchmarks
            .iter()
            .flat_map(|b| {
                b.averages.iter().map(move |(system, avg)| Record {
                    series: system.clone(),
                    x: XKey::parse(&b.benchmark),
                    y: *avg as f64,
                })
            })
            .collect()
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.benchmarks {
            writeln!(f, "Benchmark: {}", b.benchmark)?;
            for (system, avg) in &b.averages {
                writeln!(f, "  {system}: {avg}")?;
            }
            match (&b.best_other, b.improvement_pct) {
                (Some((best, _)), Some(pct)) => {
                    writeln!(f, "  improvement over best other system ({best}): {pct:?}%")?
                }
                _ => writeln!(
                    f,
                    "  improvement over best other system: n/a (needs {} and one other system)",
                    self.baseline
                )?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
