//! Numeric guards for filter output.
//!
//! An unstable parameter choice makes an adaptive filter blow up, producing
//! huge, infinite or NaN values. The functions in this module replace such
//! values with something finite before they reach metrics or plots, and
//! detect when a run should be considered diverged.

use crate::common::F64ArrayExt;

/// Largest magnitude a sanitized value may have.
pub const SAFE_MAX: f64 = 1e12;
/// Largest value a sanitized square may have.
pub const SAFE_SQ_MAX: f64 = 1e300;
/// Floor applied to powers before division or taking logarithms.
pub const SAFE_MIN_POS: f64 = 1e-15;
/// Peak level above which a sequence is reported as close to diverging.
pub const DIVERGENCE_WARN_THRESHOLD: f64 = SAFE_MAX * 0.1;

/// Returns a finite copy of `value`: NaN becomes 0, infinities become
/// `±SAFE_MAX` and everything else is clipped to `[-SAFE_MAX, SAFE_MAX]`.
pub fn clamp_value(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        // Also maps the infinities to the bounds.
        value.max(-SAFE_MAX).min(SAFE_MAX)
    }
}

/// Applies [`clamp_value`] to every element of a sequence.
pub fn clamp(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| clamp_value(*v)).collect()
}

/// In place version of [`clamp`].
pub fn clamp_in_place(values: &mut [f64]) {
    for value in values.iter_mut() {
        *value = clamp_value(*value);
    }
}

/// Returns true if any of the sequences contains a non-finite value
/// or a value whose magnitude reaches `SAFE_MAX`.
pub fn is_diverged(sequences: &[&[f64]]) -> bool {
    sequences.iter().any(|sequence| {
        sequence
            .iter()
            .any(|v| !v.is_finite() || v.abs() >= SAFE_MAX)
    })
}

/// Returns true if the peak level of a sequence exceeds
/// `DIVERGENCE_WARN_THRESHOLD`, i.e the output is finite but large
/// enough to suggest the parameters are close to unstable.
pub fn is_near_divergence(values: &[f64]) -> bool {
    let peak = values.peak_level();
    peak.is_nan() || peak > DIVERGENCE_WARN_THRESHOLD
}

/// Sanitizes and squares every element. The result lies in `[0, SAFE_SQ_MAX]`.
pub fn safe_square(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|v| {
            let v = clamp_value(*v);
            (v * v).min(SAFE_SQ_MAX)
        })
        .collect()
}

/// Converts squared values to dB, flooring at `SAFE_MIN_POS` first.
pub fn safe_db_from_square(squares: &[f64]) -> Vec<f64> {
    squares
        .iter()
        .map(|sq| {
            let sq = if sq.is_nan() {
                0.0
            } else {
                sq.min(SAFE_SQ_MAX)
            };
            10.0 * sq.max(SAFE_MIN_POS).log10()
        })
        .collect()
}

/// The squared magnitude of every element in dB, `10 log10(v^2)`.
pub fn safe_db_of_square(values: &[f64]) -> Vec<f64> {
    safe_db_from_square(&safe_square(values))
}
