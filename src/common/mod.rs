//! Common numeric utilities: slice extensions, FFT, the output safety guard
//! and magnitude spectra.

mod f64_array_ext;
mod fft;
pub mod safety;
mod spectrum;

pub use f64_array_ext::F64ArrayExt;
pub use fft::real_fft;
pub use safety::{clamp, is_diverged, SAFE_MAX, SAFE_MIN_POS};
pub use spectrum::{magnitude_spectrum, Spectrum};
