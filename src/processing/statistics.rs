/// Running statistics over the samples that land in one pivot cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub sum: f64,
    sum_sq: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SampleStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl SampleStats {
    /// Accumulate `values`, skipping NaN.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut stats = Self::default();
        for &v in values {
            stats.push(v);
        }
        (stats.count > 0).then_some(stats)
    }

    pub fn push(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.count += 1;
        self.sum += v;
        self.sum_sq += v * v;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = (self.sum_sq / self.count as f64 - mean * mean).max(0.0);
        Some(variance.sqrt())
    }

    pub fn merge(&mut self, other: &SampleStats) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str) -> String {
        format!(
            "{}:\n  Count: {}\n  Min: {:.3}\n  Max: {:.3}\n  Mean: {:.3}\n  Std Dev: {:.3}\n",
            label,
            self.count,
            self.min,
            self.max,
            self.mean().unwrap_or(f64::NAN),
            self.std_dev().unwrap_or(f64::NAN)
        )
    }
}
