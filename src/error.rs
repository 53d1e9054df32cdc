//! Error types.

use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur while generating, filtering or scoring a run.
///
/// Parameter clamping is never reported through this type. Out of range
/// parameter values are silently pulled back into their admissible range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// Malformed input caught before any numeric work, e.g a non-positive
    /// sample rate or a tap count outside `1..=len`.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The requested algorithm name does not match any known filter.
    #[error("Unsupported algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// The filter output contained non-finite or saturated values.
    #[error("{algorithm} diverged, reduce mu or adjust the parameters")]
    Divergence { algorithm: String },
}

impl HarnessError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        HarnessError::Validation(reason.into())
    }

    /// Returns true for the recoverable divergence failure.
    pub fn is_divergence(&self) -> bool {
        matches!(self, HarnessError::Divergence { .. })
    }
}
