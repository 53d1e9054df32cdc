//! Adaptive FIR filters.
//!
//! Every filter starts from all zero weights and implements
//! [`AdaptiveFilter`]: one `update` per input vector, producing the output
//! `y = w.x` and the error `e = d - y` before adapting `w`. Use
//! [`run_filter`] to run a fresh filter of a given [`Algorithm`](crate::params::Algorithm)
//! over a whole [`HistoryMatrix`].

mod adapter;
mod affine_projection;
mod gngd;
mod lms;
mod nlms_filter;
mod nonlinear;
mod rls;

pub use adapter::{build_filter, run_filter};
pub use affine_projection::ApFilter;
pub use gngd::GngdFilter;
pub use lms::LmsFilter;
pub use nlms_filter::NlmsFilter;
pub use nonlinear::{GmccFilter, LlncoshFilter, NlmfFilter, SignSignLmsFilter};
pub use rls::RlsFilter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::signal::HistoryMatrix;

/// Output, error and final weights of a batch run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterResult {
    pub y: Vec<f64>,
    pub e: Vec<f64>,
    pub w: Vec<f64>,
}

impl FilterResult {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

pub trait AdaptiveFilter {
    /// The current weights, newest tap first.
    fn w(&self) -> &[f64];

    /// Filters the input vector `x`, adapts towards the target `d` and
    /// returns `(y, e)` computed with the weights from before the update.
    fn update(&mut self, x: &[f64], d: f64) -> (f64, f64);

    /// Runs `update` over every row of `history` paired with `d`.
    /// Stops at the shorter of the two.
    fn run(&mut self, d: &[f64], history: &HistoryMatrix) -> FilterResult {
        let count = d.len().min(history.rows());
        let mut y = Vec::with_capacity(count);
        let mut e = Vec::with_capacity(count);
        for (x, d) in history.iter_rows().zip(d) {
            let (y_n, e_n) = self.update(x, *d);
            y.push(y_n);
            e.push(e_n);
        }
        FilterResult {
            y,
            e,
            w: self.w().to_vec(),
        }
    }
}
