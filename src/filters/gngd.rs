use super::AdaptiveFilter;
use crate::common::F64ArrayExt;

/// Generalized normalized gradient descent. An NLMS filter whose
/// regularization `eps` is itself adapted with learning rate `ro`.
pub struct GngdFilter {
    w: Vec<f64>,
    mu: f64,
    eps: f64,
    ro: f64,
    last_e: f64,
    last_x: Vec<f64>,
}

impl GngdFilter {
    pub fn new(taps: usize, mu: f64, eps: f64, ro: f64) -> Self {
        GngdFilter {
            w: vec![0.0; taps],
            mu,
            eps,
            ro,
            last_e: 0.0,
            last_x: vec![0.0; taps],
        }
    }

    /// The current, adapted regularization term.
    pub fn eps(&self) -> f64 {
        self.eps
    }
}

impl AdaptiveFilter for GngdFilter {
    fn w(&self) -> &[f64] {
        &self.w
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        let y = self.w.dot(x);
        let e = d - y;

        let last_power = self.last_x.dot(&self.last_x) + self.eps;
        self.eps -= self.ro * self.mu * e * self.last_e * x.dot(&self.last_x)
            / (last_power * last_power);

        let nu = self.mu / (self.eps + x.dot(x));
        for (w, x) in self.w.iter_mut().zip(x) {
            *w += nu * e * x;
        }

        self.last_e = e;
        self.last_x.copy_from_slice(x);
        (y, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_first_step_is_nlms() {
        let mut filter = GngdFilter::new(2, 0.5, 1.0, 0.1);
        filter.update(&[1.0, 1.0], 3.0);
        // No previous error, eps unchanged. nu = 0.5 / 3
        assert_eq!(filter.eps(), 1.0);
        assert_abs_diff_eq!(filter.w()[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(filter.w()[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_eps_adapts() {
        let mut filter = GngdFilter::new(1, 0.5, 1.0, 0.1);
        filter.update(&[1.0], 1.0);
        let (_, e) = filter.update(&[1.0], 1.0);
        // Second error is 0.75, eps -= 0.1 * 0.5 * 0.75 * 1 * 1 / (1 + 1)^2
        assert_abs_diff_eq!(e, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(filter.eps(), 1.0 - 0.009375, epsilon = 1e-12);
    }
}
