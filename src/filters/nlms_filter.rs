use super::AdaptiveFilter;
use crate::common::F64ArrayExt;

/// An adaptive [normalized least mean squares filter](https://en.wikipedia.org/wiki/Least_mean_squares_filter#Normalized_least_mean_squares_filter_(NLMS)).
/// Using the same notation as in the linked description.
pub struct NlmsFilter {
    /// FIR filter coefficients
    h: Vec<f64>,
    /// Step size scale
    μ: f64,
    /// Constant added to the update step denominator to avoid division by zero.
    ε: f64,
}

impl NlmsFilter {
    pub fn new(order: usize) -> Self {
        NlmsFilter::from_options(order, 0.8, 1e-3)
    }

    pub fn from_options(order: usize, mu: f64, eps: f64) -> Self {
        NlmsFilter {
            h: vec![0.0; order],
            μ: mu,
            ε: eps,
        }
    }

    pub fn order(&self) -> usize {
        self.h.len()
    }

    pub fn reset(&mut self) {
        for h in self.h.iter_mut() {
            *h = 0.0;
        }
    }
}

impl AdaptiveFilter for NlmsFilter {
    fn w(&self) -> &[f64] {
        &self.h
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        // Compute input signal power. Used to scale step size.
        let power = x.dot(x);

        // Compute filter output y = h applied to x.
        let y = self.h.dot(x);

        let e = d - y;
        let delta_scale = self.μ * e / (power + self.ε);
        for (h, x) in self.h.iter_mut().zip(x) {
            *h += delta_scale * x;
        }

        (y, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::HistoryMatrix;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_identity_convergence() {
        // The same noise signal is used for x(n) and d(n). The expected result
        // is convergence to an identity filter with all zeros except a 1 at index 0.
        let sample_count = 10000;
        let mut rng = StdRng::seed_from_u64(123);
        let signal: Vec<f64> = (0..sample_count).map(|_| rng.gen_range(-1.0..=1.0)).collect();

        let taps = 10;
        let history = HistoryMatrix::new(&signal, taps).unwrap();
        let mut filter = NlmsFilter::from_options(taps, 0.5, 0.00001);
        for (i, (x, d)) in history.iter_rows().zip(&signal[taps - 1..]).enumerate() {
            let (_, e) = filter.update(x, *d);

            // Give the filter time to converge
            if i > 2000 {
                // The signal should be almost completely cancelled out
                assert!(e.abs() < 0.001);
                // The filter should have an identity response.
                assert!((filter.w()[0] - 1.0).abs() < 1e-4);
                assert!(filter.w()[1..].peak_level() < 1e-4);
            }
        }

        filter.reset();
        assert_eq!(filter.w().peak_level(), 0.0);
        assert_eq!(filter.order(), taps);
    }

    #[test]
    fn test_zero_input_does_not_divide_by_zero() {
        let mut filter = NlmsFilter::new(4);
        let (y, e) = filter.update(&[0.0; 4], 1.0);
        assert_eq!(y, 0.0);
        assert_eq!(e, 1.0);
        assert!(filter.w().iter().all(|w| *w == 0.0));
    }
}
