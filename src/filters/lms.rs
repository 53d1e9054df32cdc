use super::AdaptiveFilter;
use crate::common::F64ArrayExt;

/// A [least mean squares](https://en.wikipedia.org/wiki/Least_mean_squares_filter) filter.
pub struct LmsFilter {
    w: Vec<f64>,
    μ: f64,
}

impl LmsFilter {
    pub fn new(taps: usize, mu: f64) -> Self {
        LmsFilter {
            w: vec![0.0; taps],
            μ: mu,
        }
    }
}

impl AdaptiveFilter for LmsFilter {
    fn w(&self) -> &[f64] {
        &self.w
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        let y = self.w.dot(x);
        let e = d - y;
        let scale = self.μ * e;
        for (w, x) in self.w.iter_mut().zip(x) {
            *w += scale * x;
        }
        (y, e)
    }
}
