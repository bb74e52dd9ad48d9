//! Statistical summary of recorded values.

/// Sorted copy of a reservoir at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    values: Vec<i64>,
}

impl Snapshot {
    pub fn new(mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        Self { values }
    }

    /// Value at quantile `q` in `[0, 1]`, interpolated between neighbours.
    ///
    /// The position is `q * (n + 1)`, clamped to the first and last value.
    pub fn value(&self, q: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.values.first(), self.values.last()) else {
            return 0.0;
        };
        if !(0.0..=1.0).contains(&q) {
            return 0.0;
        }

        let pos = q * (self.values.len() + 1) as f64;
        if pos < 1.0 {
            return first as f64;
        }
        if pos >= self.values.len() as f64 {
            return last as f64;
        }

        let index = pos as usize;
        let lower = self.values[index - 1] as f64;
        let upper = self.values[index] as f64;
        lower + (pos - pos.floor()) * (upper - lower)
    }

    pub fn median(&self) -> f64 {
        self.value(0.5)
    }

    pub fn p75(&self) -> f64 {
        self.value(0.75)
    }

    pub fn p95(&self) -> f64 {
        self.value(0.95)
    }

    pub fn p98(&self) -> f64 {
        self.value(0.98)
    }

    pub fn p99(&self) -> f64 {
        self.value(0.99)
    }

    pub fn p999(&self) -> f64 {
        self.value(0.999)
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn min(&self) -> i64 {
        self.values.first().copied().unwrap_or(0)
    }

    pub fn max(&self) -> i64 {
        self.values.last().copied().unwrap_or(0)
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.values.iter().map(|&v| v as f64).sum();
        sum / self.values.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std_dev(&self) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self
            .values
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum();
        (sum_sq / (self.values.len() - 1) as f64).sqrt()
    }
}
