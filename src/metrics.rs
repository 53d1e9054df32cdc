//! Convergence and noise reduction metrics of a filter run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::safety::{clamp, safe_db_of_square, safe_square};
use crate::common::{F64ArrayExt, SAFE_MIN_POS};
use crate::error::{HarnessError, HarnessResult};
use crate::signal::{align, Signal};

/// Number of trailing samples used for the steady state estimates.
pub const STEADY_STATE_WINDOW: usize = 2000;

/// Fraction of the initial squared error that counts as converged.
pub const CONVERGENCE_RATIO: f64 = 0.1;

/// Scalar diagnostics of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricsRecord {
    /// Steady state mean square error.
    pub mse: f64,
    /// Excess mean square error, `max(mse - jmin, 0)`.
    pub emse: f64,
    /// Power of the additive noise over the steady state window.
    pub jmin: f64,
    /// Misadjustment, `emse / jmin`.
    pub misadj: f64,
    /// SNR of the noisy input in dB.
    pub snr_in: f64,
    /// SNR of the system output in dB.
    pub snr_out: f64,
    /// SNR improvement in dB.
    pub dsnr: f64,
    /// Samples until the squared error first drops to 10% of its initial
    /// value. Equal to the error length if that never happens.
    pub n90: usize,
}

fn power(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return SAFE_MIN_POS;
    }
    (values.sum::<f64>() / (count as f64)).max(SAFE_MIN_POS)
}

/// Computes the metrics of a run over `signal` with `taps` taps, where
/// `y` and `e` are the (sanitized) filter output and error aligned with
/// the history rows.
///
/// In ANC mode `snr_out` is measured on `e`, which is the cleaned signal
/// in that topology. Tools that score the filter output `y` in both modes
/// report a different `snr_out` (and output spectrum) for ANC runs.
pub fn compute_metrics(
    signal: &Signal,
    y: &[f64],
    e: &[f64],
    taps: usize,
) -> HarnessResult<MetricsRecord> {
    let s_ref = align(signal.clean(), taps)?;
    let x_in = align(signal.noisy(), taps)?;
    if y.len() != s_ref.len() || e.len() != s_ref.len() {
        return Err(HarnessError::validation(format!(
            "output lengths ({}, {}) do not match the aligned signal length ({})",
            y.len(),
            e.len(),
            s_ref.len()
        )));
    }

    let mse_curve = safe_square(e);
    let tail = STEADY_STATE_WINDOW.min(mse_curve.len());
    let mse = mse_curve.tail(tail).iter().sum::<f64>() / (tail.max(1) as f64);

    let noise: Vec<f64> = x_in.iter().zip(s_ref).map(|(x, s)| x - s).collect();
    let jmin = noise.tail(tail).mean_square().max(SAFE_MIN_POS);
    let emse = (mse - jmin).max(0.0);
    let misadj = emse / jmin;

    // The system output is the filter output when denoising, and the
    // error (primary minus noise estimate) when cancelling noise.
    let out = if signal.is_anc() { clamp(e) } else { clamp(y) };
    let count = s_ref.len();
    let ps = power(s_ref.iter().map(|s| s * s), count);
    let pin = power(noise.iter().map(|v| v * v), count);
    let pout = power(out.iter().zip(s_ref).map(|(o, s)| (o - s) * (o - s)), count);

    let snr_in = 10.0 * (ps / pin).log10();
    let snr_out = 10.0 * (ps / pout).log10();

    Ok(MetricsRecord {
        mse,
        emse,
        jmin,
        misadj,
        snr_in,
        snr_out,
        dsnr: snr_out - snr_in,
        n90: convergence_time(e),
    })
}

/// Index of the first sample whose squared error is at most 10% of the
/// initial squared error, or `e.len()` if there is none.
pub fn convergence_time(e: &[f64]) -> usize {
    let mse_curve = safe_square(e);
    let threshold = match mse_curve.first() {
        Some(first) => CONVERGENCE_RATIO * first,
        None => return 0,
    };
    mse_curve
        .iter()
        .position(|v| *v <= threshold)
        .unwrap_or(mse_curve.len())
}

/// Trailing moving average of width `win`, with the same length as `v`.
///
/// Non-finite values are replaced by the median of the finite values
/// (0 if there are none). If `win <= 1` or `win > v.len()` the sanitized
/// input is returned as is. Otherwise the first `win - 1` outputs repeat
/// the first full window average.
pub fn moving_avg(v: &[f64], win: usize) -> Vec<f64> {
    let fill = v.finite_median().unwrap_or(0.0);
    let sanitized: Vec<f64> = v
        .iter()
        .map(|v| if v.is_finite() { *v } else { fill })
        .collect();
    if win <= 1 || win > sanitized.len() {
        return sanitized;
    }

    let mut prefix = Vec::with_capacity(sanitized.len() + 1);
    prefix.push(0.0);
    let mut sum = 0.0;
    for value in sanitized.iter() {
        sum += value;
        prefix.push(sum);
    }

    let scale = 1.0 / (win as f64);
    let averages: Vec<f64> = prefix
        .windows(win + 1)
        .map(|window| (window[win] - window[0]) * scale)
        .collect();
    let mut result = vec![averages[0]; win - 1];
    result.extend(averages);
    result
}

/// The squared error in dB, smoothed over 5% of its length.
pub fn learning_curve_db(e: &[f64]) -> Vec<f64> {
    let win = (e.len() / 20).max(1);
    moving_avg(&safe_db_of_square(e), win)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{make_signal, SignalOptions};
    use approx::assert_abs_diff_eq;

    fn aligned_len(signal: &Signal, taps: usize) -> usize {
        signal.len() - taps + 1
    }

    #[test]
    fn test_zero_error_run() {
        let signal = make_signal(&SignalOptions::default()).unwrap();
        let taps = 8;
        let count = aligned_len(&signal, taps);
        let y = align(signal.clean(), taps).unwrap().to_vec();
        let metrics = compute_metrics(&signal, &y, &vec![0.0; count], taps).unwrap();
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.emse, 0.0);
        assert_eq!(metrics.misadj, 0.0);
        assert_eq!(metrics.n90, 0);
        // A perfect output has no residual noise, so the SNR hits the power floor.
        assert!(metrics.snr_out > 100.0);
        assert!(metrics.dsnr > 0.0);
    }

    #[test]
    fn test_anc_output_is_the_error() {
        let options = SignalOptions {
            anc: true,
            ..SignalOptions::default()
        };
        let signal = make_signal(&options).unwrap();
        let taps = 8;
        // Perfect cancellation: y is the noise, e the clean sinusoid.
        let e = align(signal.clean(), taps).unwrap().to_vec();
        let y: Vec<f64> = align(signal.noisy(), taps)
            .unwrap()
            .iter()
            .zip(&e)
            .map(|(d, s)| d - s)
            .collect();
        let metrics = compute_metrics(&signal, &y, &e, taps).unwrap();
        assert!(metrics.snr_out > 100.0);
        assert!(metrics.dsnr > 0.0);
    }

    #[test]
    fn test_unfiltered_output_has_no_snr_gain() {
        let options = SignalOptions {
            seed: 3,
            ..SignalOptions::default()
        };
        let signal = make_signal(&options).unwrap();
        let taps = 4;
        let y = align(signal.noisy(), taps).unwrap().to_vec();
        let e: Vec<f64> = align(signal.clean(), taps)
            .unwrap()
            .iter()
            .zip(&y)
            .map(|(s, y)| s - y)
            .collect();
        let metrics = compute_metrics(&signal, &y, &e, taps).unwrap();
        assert_abs_diff_eq!(metrics.dsnr, 0.0, epsilon = 1e-9);
        // About 10 log10(0.5 / 0.01)
        assert!((metrics.snr_in - 17.0).abs() < 1.0);
        // The error is the noise itself.
        assert_abs_diff_eq!(metrics.mse, metrics.jmin, epsilon = 1e-12);
        assert_eq!(metrics.misadj, 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let signal = make_signal(&SignalOptions::default()).unwrap();
        assert!(compute_metrics(&signal, &[0.0], &[0.0], 4).is_err());
        assert!(compute_metrics(&signal, &[], &[], signal.len() + 1).is_err());
    }

    #[test]
    fn test_convergence_time() {
        assert_eq!(convergence_time(&[1.0, 0.5, 0.3, 0.2, 0.1]), 2);
        assert_eq!(convergence_time(&[1.0, 0.9, 0.8]), 3);
        assert_eq!(convergence_time(&[]), 0);
        assert_eq!(convergence_time(&[0.0, 1.0]), 0);
        assert_eq!(convergence_time(&[-2.0, f64::NAN, 0.5]), 1);
    }

    #[test]
    fn test_moving_avg() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_avg(&v, 2), vec![1.5, 1.5, 2.5, 3.5, 4.5]);
        assert_eq!(moving_avg(&v, 5), vec![3.0; 5]);
        assert_eq!(moving_avg(&v, 1), v.to_vec());
        assert_eq!(moving_avg(&v, 6), v.to_vec());
        assert!(moving_avg(&[], 3).is_empty());
    }

    #[test]
    fn test_moving_avg_replaces_non_finite_values() {
        let v = [1.0, f64::NAN, 3.0, f64::INFINITY, 5.0];
        assert_eq!(moving_avg(&v, 1), vec![1.0, 3.0, 3.0, 3.0, 5.0]);
        assert_eq!(moving_avg(&[f64::NAN, f64::NAN], 1), vec![0.0, 0.0]);
    }

    #[test]
    fn test_learning_curve_db() {
        let e = vec![0.1; 100];
        let curve = learning_curve_db(&e);
        assert_eq!(curve.len(), 100);
        for value in curve {
            assert_abs_diff_eq!(value, -20.0, epsilon = 1e-9);
        }
    }
}
