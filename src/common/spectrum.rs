//! Magnitude spectra of finite real sequences.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::fft::real_fft;
use super::safety::{clamp, SAFE_MIN_POS};
use crate::error::{HarnessError, HarnessResult};

/// A one-sided magnitude spectrum.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spectrum {
    /// Bin center frequencies in Hz, `k * fs / N` for `k` in `0..=N/2`.
    pub frequencies: Vec<f64>,
    /// `|X(k)| / N`, floored at `SAFE_MIN_POS` so it can be shown on a log axis.
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Returns the frequency of the strongest bin, ignoring DC.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| self.frequencies[index])
    }
}

/// Computes the one-sided magnitude spectrum of `signal` sampled at `sample_rate` Hz.
/// Non-finite input values are sanitized before the transform.
pub fn magnitude_spectrum(signal: &[f64], sample_rate: f64) -> HarnessResult<Spectrum> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(HarnessError::validation(format!(
            "sample rate must be positive, got {}",
            sample_rate
        )));
    }
    if signal.is_empty() {
        return Ok(Spectrum::default());
    }

    let sample_count = signal.len();
    let scale = 1.0 / (sample_count as f64);
    let bins = real_fft(&clamp(signal));
    let frequencies = (0..bins.len())
        .map(|k| (k as f64) * sample_rate * scale)
        .collect();
    let magnitudes = bins
        .iter()
        .map(|z| {
            let magnitude = z.norm() * scale;
            if magnitude.is_finite() {
                magnitude.max(SAFE_MIN_POS)
            } else {
                SAFE_MIN_POS
            }
        })
        .collect();

    Ok(Spectrum {
        frequencies,
        magnitudes,
    })
}
