//! LMS variants that pass the error through a nonlinearity before the
//! weight update. They trade convergence speed for robustness against
//! impulsive or heavy tailed noise.

use super::AdaptiveFilter;
use crate::common::F64ArrayExt;

/// Sign function with `sign(0) == 0`.
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn output(w: &[f64], x: &[f64], d: f64) -> (f64, f64) {
    let y = w.dot(x);
    (y, d - y)
}

fn step(w: &mut [f64], x: &[f64], scale: f64) {
    for (w, x) in w.iter_mut().zip(x) {
        *w += scale * x;
    }
}

/// Sign-sign LMS, `w += mu sign(e) sign(x)`.
pub struct SignSignLmsFilter {
    w: Vec<f64>,
    mu: f64,
}

impl SignSignLmsFilter {
    pub fn new(taps: usize, mu: f64) -> Self {
        SignSignLmsFilter {
            w: vec![0.0; taps],
            mu,
        }
    }
}

impl AdaptiveFilter for SignSignLmsFilter {
    fn w(&self) -> &[f64] {
        &self.w
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        let (y, e) = output(&self.w, x, d);
        let scale = self.mu * sign(e);
        for (w, x) in self.w.iter_mut().zip(x) {
            *w += scale * sign(*x);
        }
        (y, e)
    }
}

/// Normalized least mean fourth, minimizing `E[e^4]`.
pub struct NlmfFilter {
    w: Vec<f64>,
    mu: f64,
    eps: f64,
}

impl NlmfFilter {
    pub fn new(taps: usize, mu: f64, eps: f64) -> Self {
        NlmfFilter {
            w: vec![0.0; taps],
            mu,
            eps,
        }
    }
}

impl AdaptiveFilter for NlmfFilter {
    fn w(&self) -> &[f64] {
        &self.w
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        let (y, e) = output(&self.w, x, d);
        let scale = self.mu * e * e * e / (self.eps + x.dot(x));
        step(&mut self.w, x, scale);
        (y, e)
    }
}

/// Least lncosh, `w += mu tanh(lambd e) x`. Behaves like LMS for small
/// errors and like sign-error LMS for large ones.
pub struct LlncoshFilter {
    w: Vec<f64>,
    mu: f64,
    lambd: f64,
}

impl LlncoshFilter {
    pub fn new(taps: usize, mu: f64, lambd: f64) -> Self {
        LlncoshFilter {
            w: vec![0.0; taps],
            mu,
            lambd,
        }
    }
}

impl AdaptiveFilter for LlncoshFilter {
    fn w(&self) -> &[f64] {
        &self.w
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        let (y, e) = output(&self.w, x, d);
        let scale = self.mu * (self.lambd * e).tanh();
        step(&mut self.w, x, scale);
        (y, e)
    }
}

/// Generalized maximum correntropy criterion with kernel shape `alpha`
/// and kernel parameter `lambd`.
pub struct GmccFilter {
    w: Vec<f64>,
    mu: f64,
    lambd: f64,
    alpha: f64,
}

impl GmccFilter {
    pub fn new(taps: usize, mu: f64, lambd: f64, alpha: f64) -> Self {
        GmccFilter {
            w: vec![0.0; taps],
            mu,
            lambd,
            alpha,
        }
    }
}

impl AdaptiveFilter for GmccFilter {
    fn w(&self) -> &[f64] {
        &self.w
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        let (y, e) = output(&self.w, x, d);
        // |e|^(alpha - 1) is unbounded at e = 0 for alpha < 1, where the step is zero anyway.
        if e != 0.0 {
            let magnitude = e.abs();
            let scale = self.mu
                * self.lambd
                * self.alpha
                * (-self.lambd * magnitude.powf(self.alpha)).exp()
                * magnitude.powf(self.alpha - 1.0)
                * sign(e);
            step(&mut self.w, x, scale);
        }
        (y, e)
    }
}
