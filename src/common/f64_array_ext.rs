//! `[f64]` extensions.

/// `[f64]` extensions.
pub trait F64ArrayExt {
    /// Returns the maximum absolute value.
    fn peak_level(&self) -> f64;
    /// Returns the mean of the squared values, or 0 for an empty slice.
    fn mean_square(&self) -> f64;
    /// Returns the last `count` values, or all values if there are fewer.
    fn tail(&self, count: usize) -> &Self;
    /// Returns the dot product with another slice of the same length.
    fn dot(&self, other: &[f64]) -> f64;
    /// Returns the median of the finite values, or `None` if there are none.
    fn finite_median(&self) -> Option<f64>;
}

impl F64ArrayExt for [f64] {
    fn peak_level(&self) -> f64 {
        let mut max: f64 = 0.0;
        for sample in self.iter() {
            let value = sample.abs();
            // NaN never compares greater, so let it through explicitly.
            if value > max || value.is_nan() {
                max = value
            }
        }
        max
    }

    fn mean_square(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        };
        let mut sum: f64 = 0.;
        for sample in self.iter() {
            sum += sample * sample
        }
        sum / (self.len() as f64)
    }

    fn tail(&self, count: usize) -> &Self {
        &self[self.len() - count.min(self.len())..]
    }

    fn dot(&self, other: &[f64]) -> f64 {
        debug_assert_eq!(self.len(), other.len());
        self.iter().zip(other.iter()).map(|(a, b)| a * b).sum()
    }

    fn finite_median(&self) -> Option<f64> {
        let mut finite: Vec<f64> = self.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        finite.sort_by(|a, b| a.total_cmp(b));
        let mid = finite.len() / 2;
        if finite.len() % 2 == 0 {
            Some(0.5 * (finite[mid - 1] + finite[mid]))
        } else {
            Some(finite[mid])
        }
    }
}
