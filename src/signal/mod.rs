//! Test signal generation and tap delay embedding.
//!
//! # Examples
//!
//! ```
//! use adafilt::signal::{make_signal, HistoryMatrix, SignalOptions};
//!
//! let signal = make_signal(&SignalOptions::default()).unwrap();
//! let taps = 32;
//! let history = HistoryMatrix::new(signal.filter_input(), taps).unwrap();
//! assert_eq!(history.rows(), signal.len() - taps + 1);
//! ```

mod generator;
mod history;

pub use generator::{
    make_signal, Channels, Signal, SignalGenerator, SignalOptions, ANC_REFERENCE_KERNEL,
    MAX_SAMPLE_COUNT,
};
pub use history::{align, clamp_taps, embed, validate_taps, HistoryMatrix};
