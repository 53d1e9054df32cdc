use nalgebra::{DMatrix, DVector};

use super::AdaptiveFilter;

/// An exponentially weighted [recursive least squares](https://en.wikipedia.org/wiki/Recursive_least_squares_filter)
/// filter. `mu` is the forgetting factor and `eps` sets the initial
/// inverse correlation estimate `P = I / eps`.
pub struct RlsFilter {
    w: DVector<f64>,
    p: DMatrix<f64>,
    mu: f64,
}

impl RlsFilter {
    pub fn new(taps: usize, mu: f64, eps: f64) -> Self {
        RlsFilter {
            w: DVector::zeros(taps),
            p: DMatrix::identity(taps, taps) / eps,
            mu,
        }
    }
}

impl AdaptiveFilter for RlsFilter {
    fn w(&self) -> &[f64] {
        self.w.as_slice()
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        let x = DVector::from_column_slice(x);
        let y = self.w.dot(&x);
        let e = d - y;

        // P is symmetric, so P x x^T P is the outer product of P x with itself.
        let px = &self.p * &x;
        let denominator = self.mu + x.dot(&px);
        self.p = (&self.p - (&px * px.transpose()) / denominator) / self.mu;

        let gain = &self.p * &x;
        self.w += gain * e;
        (y, e)
    }
}
