use std::collections::VecDeque;

use nalgebra::{DMatrix, DVector};

use super::AdaptiveFilter;

/// An [affine projection](https://en.wikipedia.org/wiki/Affine_projection_algorithm)
/// filter that projects onto the `order` most recent input vectors.
/// `ifc` regularizes the inverted Gram matrix.
pub struct ApFilter {
    w: DVector<f64>,
    mu: f64,
    ifc: f64,
    /// Most recent input vectors, newest first.
    x_mem: VecDeque<Vec<f64>>,
    /// Targets matching `x_mem`.
    d_mem: VecDeque<f64>,
}

impl ApFilter {
    pub fn new(taps: usize, mu: f64, order: usize, ifc: f64) -> Self {
        let order = order.max(1);
        ApFilter {
            w: DVector::zeros(taps),
            mu,
            ifc,
            x_mem: std::iter::repeat(vec![0.0; taps]).take(order).collect(),
            d_mem: std::iter::repeat(0.0).take(order).collect(),
        }
    }

    pub fn order(&self) -> usize {
        self.x_mem.len()
    }
}

impl AdaptiveFilter for ApFilter {
    fn w(&self) -> &[f64] {
        self.w.as_slice()
    }

    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64) {
        let y = self.w.as_slice().iter().zip(x).map(|(w, x)| w * x).sum::<f64>();
        let e = d - y;

        let order = self.order();
        self.x_mem.pop_back();
        self.x_mem.push_front(x.to_vec());
        self.d_mem.pop_back();
        self.d_mem.push_front(d);

        let x_mat = DMatrix::from_fn(order, self.w.len(), |r, c| self.x_mem[r][c]);
        let d_vec = DVector::from_iterator(order, self.d_mem.iter().copied());
        let e_mem = d_vec - &x_mat * &self.w;
        let gram = &x_mat * x_mat.transpose() + DMatrix::identity(order, order) * self.ifc;

        // A singular Gram matrix leaves the weights untouched for this step.
        if let Some(g) = gram.lu().solve(&e_mem) {
            self.w += x_mat.transpose() * g * self.mu;
        }
        (y, e)
    }
}
