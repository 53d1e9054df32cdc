//! An experimentation harness for adaptive FIR filters of the LMS and RLS
//! families.
//!
//! A run generates a noisy test sinusoid, embeds it into a tap delay
//! history, pulls the algorithm parameters into a stable range, runs the
//! filter and scores the result.
//!
//! Features
//! * Nine algorithms: LMS, NLMS, RLS, AP, SSLMS, NLMF, Llncosh, GMCC and GNGD
//! * Denoising and adaptive noise cancellation (ANC) topologies
//! * Parameter store with admissible ranges and named presets
//! * Runtime stability rules applied before every run
//! * Divergence detection, with non-finite output never reaching the metrics
//! * MSE, excess MSE, misadjustment, SNR improvement and convergence time
//! * Deterministic, seedable signal generation
//!
//! # Examples
//!
//! One off run with default parameters.
//!
//! ```
//! use adafilt::{run_once, Algorithm};
//!
//! let result = run_once(Algorithm::Lms, 32, 2000.0, 100.0, 0.8, 0.0, 0.1, false, 0).unwrap();
//! assert_eq!(result.filter.y.len(), result.signal.len() - 31);
//! println!("mse {}, snr gain {} dB", result.metrics.mse, result.metrics.dsnr);
//! ```
//!
//! Tuning parameters between runs.
//!
//! ```
//! use adafilt::{Algorithm, Harness, HarnessError, RunRequest};
//!
//! let mut harness = Harness::new();
//! harness.store_mut().apply_preset(Algorithm::Rls, "Quick").unwrap();
//! let request = RunRequest::new(Algorithm::Rls, 16);
//! match harness.run_once(&request) {
//!     Ok(result) => println!("n90 {}", result.metrics.n90),
//!     Err(HarnessError::Divergence { algorithm }) => println!("{} diverged", algorithm),
//!     Err(error) => panic!("{}", error),
//! }
//! ```

pub mod common;
pub mod error;
pub mod filters;
pub mod harness;
pub mod metrics;
pub mod params;
pub mod signal;

pub use error::{HarnessError, HarnessResult};
pub use filters::{AdaptiveFilter, FilterResult};
pub use harness::{run_once, Harness, RunRequest, RunResult, Spectra};
pub use metrics::MetricsRecord;
pub use params::{Algorithm, AlgorithmParams, ParamKey, ParameterStore};
pub use signal::{Signal, SignalOptions};
