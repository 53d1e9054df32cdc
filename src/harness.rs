//! Runs one complete experiment: signal generation, history embedding,
//! stability enforcement, filtering, divergence guarding and scoring.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::common::safety::{clamp_in_place, is_diverged, is_near_divergence};
use crate::common::{magnitude_spectrum, Spectrum};
use crate::error::{HarnessError, HarnessResult};
use crate::filters::{run_filter, FilterResult};
use crate::metrics::{compute_metrics, learning_curve_db, MetricsRecord};
use crate::params::{enforce_stability, Algorithm, AlgorithmParams, ParameterStore};
use crate::signal::{align, clamp_taps, embed, make_signal, Signal, SignalOptions};

/// What to run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunRequest {
    pub algorithm: Algorithm,
    /// Filter length.
    pub taps: usize,
    pub signal: SignalOptions,
    /// Pull an out of range tap count into `1..=len` instead of failing.
    pub clamp_taps: bool,
}

impl RunRequest {
    /// A request using the default signal options.
    pub fn new(algorithm: Algorithm, taps: usize) -> Self {
        RunRequest {
            algorithm,
            taps,
            signal: SignalOptions::default(),
            clamp_taps: false,
        }
    }

    pub fn with_signal(mut self, signal: SignalOptions) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_clamped_taps(mut self, clamp_taps: bool) -> Self {
        self.clamp_taps = clamp_taps;
        self
    }
}

/// Magnitude spectra of a run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spectra {
    /// The aligned noisy signal.
    pub input: Spectrum,
    /// The system output.
    pub output: Spectrum,
    /// The aligned clean sinusoid.
    pub reference: Spectrum,
}

/// Everything produced by a successful run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunResult {
    pub algorithm: Algorithm,
    pub signal: Signal,
    /// Tap count actually used.
    pub taps: usize,
    /// Parameter values after stability enforcement.
    pub params: AlgorithmParams,
    /// The aligned filter target.
    pub target: Vec<f64>,
    /// The aligned clean sinusoid.
    pub reference: Vec<f64>,
    /// The aligned noisy signal.
    pub input: Vec<f64>,
    /// Sanitized filter output and error, and the final weights.
    pub filter: FilterResult,
    pub metrics: MetricsRecord,
    pub spectra: Spectra,
    /// Smoothed squared error in dB.
    pub learning_curve: Vec<f64>,
}

impl RunResult {
    /// The system output: `y` when denoising, `e` when cancelling noise.
    pub fn output(&self) -> &[f64] {
        if self.signal.is_anc() {
            &self.filter.e
        } else {
            &self.filter.y
        }
    }
}

/// Runs experiments against a parameter store.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    store: ParameterStore,
}

impl Harness {
    pub fn new() -> Self {
        Harness::default()
    }

    pub fn with_store(store: ParameterStore) -> Self {
        Harness { store }
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// Mutable access for parameter updates between runs.
    pub fn store_mut(&mut self) -> &mut ParameterStore {
        &mut self.store
    }

    /// Runs `request` with the current store values of its algorithm.
    pub fn run_once(&self, request: &RunRequest) -> HarnessResult<RunResult> {
        let signal = make_signal(&request.signal)?;

        let mut taps = request.taps;
        if request.clamp_taps {
            let clamped = clamp_taps(taps, signal.len());
            if clamped != taps {
                warn!(
                    requested = taps,
                    used = clamped,
                    signal_len = signal.len(),
                    "tap count out of range, clamping"
                );
                taps = clamped;
            }
        }

        let (history, _) = embed(signal.filter_input(), taps)?;
        let target = align(signal.target(), taps)?;

        let algorithm = request.algorithm;
        let params = enforce_stability(algorithm, &self.store.params(algorithm), self.store.limits());
        let filter = run_filter(algorithm, target, &history, &params)?;

        evaluate(algorithm, signal, taps, params, filter)
    }
}

/// Sanitizes a raw filter result and scores it. Fails with
/// [`HarnessError::Divergence`] before computing any metrics if the output,
/// error or weights are non-finite or saturated.
pub fn evaluate(
    algorithm: Algorithm,
    signal: Signal,
    taps: usize,
    params: AlgorithmParams,
    filter: FilterResult,
) -> HarnessResult<RunResult> {
    // Checked before clamping, which maps NaN to 0.
    if is_diverged(&[&filter.y[..], &filter.e[..], &filter.w[..]]) {
        warn!(%algorithm, ?params, "filter diverged");
        return Err(HarnessError::Divergence {
            algorithm: algorithm.to_string(),
        });
    }
    let FilterResult { mut y, mut e, w } = filter;
    clamp_in_place(&mut y);
    clamp_in_place(&mut e);
    if is_near_divergence(&y) || is_near_divergence(&e) {
        warn!(%algorithm, ?params, "filter output close to diverging");
    }

    let metrics = compute_metrics(&signal, &y, &e, taps)?;
    let target = align(signal.target(), taps)?.to_vec();
    let reference = align(signal.clean(), taps)?.to_vec();
    let input = align(signal.noisy(), taps)?.to_vec();

    let output = if signal.is_anc() { &e } else { &y };
    let spectra = Spectra {
        input: magnitude_spectrum(&input, signal.sample_rate)?,
        output: magnitude_spectrum(output, signal.sample_rate)?,
        reference: magnitude_spectrum(&reference, signal.sample_rate)?,
    };
    let learning_curve = learning_curve_db(&e);

    info!(
        %algorithm,
        taps,
        mse = metrics.mse,
        dsnr = metrics.dsnr,
        n90 = metrics.n90,
        "run complete"
    );

    Ok(RunResult {
        algorithm,
        signal,
        taps,
        params,
        target,
        reference,
        input,
        filter: FilterResult { y, e, w },
        metrics,
        spectra,
        learning_curve,
    })
}

/// Runs `algorithm` with its default parameters on a freshly generated signal.
#[allow(clippy::too_many_arguments)]
pub fn run_once(
    algorithm: Algorithm,
    taps: usize,
    sample_rate: f64,
    frequency: f64,
    duration: f64,
    noise_mean: f64,
    noise_std: f64,
    anc: bool,
    seed: u64,
) -> HarnessResult<RunResult> {
    let request = RunRequest::new(algorithm, taps).with_signal(SignalOptions {
        sample_rate,
        frequency,
        duration,
        noise_mean,
        noise_std,
        anc,
        seed,
    });
    Harness::new().run_once(&request)
}
