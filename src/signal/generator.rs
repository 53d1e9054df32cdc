use core::f64::consts::PI;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// Taps of the FIR filter coloring the reference channel in ANC mode.
pub const ANC_REFERENCE_KERNEL: [f64; 3] = [1.0, 0.5, 0.25];

/// Largest number of samples a signal may have.
pub const MAX_SAMPLE_COUNT: usize = 1 << 26;

/// Options describing a test signal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignalOptions {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Frequency of the clean sinusoid in Hz.
    pub frequency: f64,
    /// Duration in seconds.
    pub duration: f64,
    pub noise_mean: f64,
    /// Standard deviation of the additive Gaussian noise.
    pub noise_std: f64,
    /// Generate an adaptive noise cancellation setup instead of a plain noisy observation.
    pub anc: bool,
    pub seed: u64,
}

impl Default for SignalOptions {
    fn default() -> Self {
        SignalOptions {
            sample_rate: 2000.0,
            frequency: 100.0,
            duration: 0.8,
            noise_mean: 0.0,
            noise_std: 0.1,
            anc: false,
            seed: 0,
        }
    }
}

impl SignalOptions {
    pub fn validate(&self) -> HarnessResult<()> {
        let finite = [
            ("sample rate", self.sample_rate),
            ("frequency", self.frequency),
            ("duration", self.duration),
            ("noise mean", self.noise_mean),
            ("noise std", self.noise_std),
        ];
        for (name, value) in finite.iter() {
            if !value.is_finite() {
                return Err(HarnessError::validation(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if self.sample_rate <= 0.0 {
            return Err(HarnessError::validation(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.duration <= 0.0 {
            return Err(HarnessError::validation(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if self.noise_std < 0.0 {
            return Err(HarnessError::validation(format!(
                "noise std must not be negative, got {}",
                self.noise_std
            )));
        }
        let samples = self.duration * self.sample_rate;
        if samples >= MAX_SAMPLE_COUNT as f64 {
            return Err(HarnessError::validation(format!(
                "a duration of {} s at {} Hz exceeds {} samples",
                self.duration, self.sample_rate, MAX_SAMPLE_COUNT
            )));
        }
        if self.sample_count() == 0 {
            return Err(HarnessError::validation(format!(
                "a duration of {} s at {} Hz contains no samples",
                self.duration, self.sample_rate
            )));
        }
        Ok(())
    }

    /// The number of samples, `floor(duration * sample_rate)`.
    pub fn sample_count(&self) -> usize {
        // Absorb representation error, e.g 0.29 * 100 = 28.999999999999996.
        let count = (self.duration * self.sample_rate + 1e-9).floor();
        if count.is_finite() && count > 0.0 {
            count as usize
        } else {
            0
        }
    }
}

/// The clean and observed channels of a generated signal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channels {
    /// `x = s + noise`, the filter estimates `s` from `x`.
    Plain {
        /// Clean sinusoid.
        s: Vec<f64>,
        /// Noisy observation.
        x: Vec<f64>,
    },
    /// Adaptive noise cancellation: the filter estimates the noise in
    /// `d_primary` from the correlated reference channel `x`.
    Anc {
        /// Clean sinusoid plus noise.
        d_primary: Vec<f64>,
        s_clean: Vec<f64>,
        /// Noise colored by `ANC_REFERENCE_KERNEL`.
        x: Vec<f64>,
    },
}

/// A generated test signal. All channels have the same length as `t`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signal {
    /// Sample times in seconds, `t[i] = i / sample_rate`.
    pub t: Vec<f64>,
    pub channels: Channels,
    pub sample_rate: f64,
}

impl Signal {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn is_anc(&self) -> bool {
        matches!(self.channels, Channels::Anc { .. })
    }

    /// The clean sinusoid.
    pub fn clean(&self) -> &[f64] {
        match &self.channels {
            Channels::Plain { s, .. } => s,
            Channels::Anc { s_clean, .. } => s_clean,
        }
    }

    /// The channel fed to the filter as its input history.
    pub fn filter_input(&self) -> &[f64] {
        match &self.channels {
            Channels::Plain { x, .. } => x,
            Channels::Anc { x, .. } => x,
        }
    }

    /// The signal the filter tries to match: the clean sinusoid in plain
    /// mode, the primary channel in ANC mode.
    pub fn target(&self) -> &[f64] {
        match &self.channels {
            Channels::Plain { s, .. } => s,
            Channels::Anc { d_primary, .. } => d_primary,
        }
    }

    /// The noisy signal the filter is meant to improve on, i.e the
    /// observation in plain mode and the primary channel in ANC mode.
    pub fn noisy(&self) -> &[f64] {
        match &self.channels {
            Channels::Plain { x, .. } => x,
            Channels::Anc { d_primary, .. } => d_primary,
        }
    }
}

/// Generates test signals. The output is a pure function of the options,
/// including the seed.
pub struct SignalGenerator {
    options: SignalOptions,
}

impl SignalGenerator {
    pub fn new(options: SignalOptions) -> HarnessResult<Self> {
        options.validate()?;
        Ok(SignalGenerator { options })
    }

    pub fn options(&self) -> &SignalOptions {
        &self.options
    }

    pub fn generate(&self) -> Signal {
        let options = &self.options;
        let sample_count = options.sample_count();
        let dt = 1.0 / options.sample_rate;
        let t: Vec<f64> = (0..sample_count).map(|i| (i as f64) * dt).collect();
        let s: Vec<f64> = t
            .iter()
            .map(|t| (2.0 * PI * options.frequency * t).sin())
            .collect();
        let noise = self.noise(sample_count);

        let channels = if options.anc {
            let d_primary = s.iter().zip(noise.iter()).map(|(s, n)| s + n).collect();
            let x = convolve_same(&noise, &ANC_REFERENCE_KERNEL);
            Channels::Anc {
                d_primary,
                s_clean: s,
                x,
            }
        } else {
            let x = s.iter().zip(noise.iter()).map(|(s, n)| s + n).collect();
            Channels::Plain { s, x }
        };

        Signal {
            t,
            channels,
            sample_rate: options.sample_rate,
        }
    }

    fn noise(&self, sample_count: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        match Normal::new(self.options.noise_mean, self.options.noise_std) {
            Ok(distribution) => (0..sample_count)
                .map(|_| distribution.sample(&mut rng))
                .collect(),
            // Only reachable for options that failed validation.
            Err(_) => vec![self.options.noise_mean; sample_count],
        }
    }
}

/// Generates a signal from the given options.
pub fn make_signal(options: &SignalOptions) -> HarnessResult<Signal> {
    Ok(SignalGenerator::new(*options)?.generate())
}

/// Convolves `signal` with `kernel`, keeping the central `signal.len()`
/// samples of the full convolution.
fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let offset = (kernel.len() - 1) / 2;
    (0..signal.len())
        .map(|i| {
            let k = i + offset;
            kernel
                .iter()
                .enumerate()
                .filter(|(j, _)| *j <= k && k - *j < signal.len())
                .map(|(j, b)| b * signal[k - j])
                .sum::<f64>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_generation_is_deterministic() {
        let options = SignalOptions::default();
        let a = make_signal(&options).unwrap();
        let b = make_signal(&options).unwrap();
        assert_eq!(a, b);

        let anc = SignalOptions {
            anc: true,
            seed: 7,
            ..options
        };
        assert_eq!(make_signal(&anc).unwrap(), make_signal(&anc).unwrap());
    }

    #[test]
    fn test_different_seeds_give_different_noise() {
        let a = make_signal(&SignalOptions::default()).unwrap();
        let b = make_signal(&SignalOptions {
            seed: 1,
            ..SignalOptions::default()
        })
        .unwrap();
        assert_eq!(a.clean(), b.clean());
        assert_ne!(a.filter_input(), b.filter_input());
    }

    #[test]
    fn test_time_axis() {
        let signal = make_signal(&SignalOptions::default()).unwrap();
        assert_eq!(signal.len(), 1600);
        assert_eq!(signal.clean().len(), 1600);
        assert_eq!(signal.filter_input().len(), 1600);
        assert_eq!(signal.t[0], 0.0);
        assert_abs_diff_eq!(signal.t[1], 0.0005, epsilon = 1e-15);
        assert_abs_diff_eq!(signal.t[1599], 0.7995, epsilon = 1e-12);

        let options = SignalOptions {
            sample_rate: 100.0,
            duration: 0.29,
            ..SignalOptions::default()
        };
        assert_eq!(options.sample_count(), 29);
    }

    #[test]
    fn test_noise_free_signal_is_a_sine() {
        let options = SignalOptions {
            noise_std: 0.0,
            ..SignalOptions::default()
        };
        let signal = make_signal(&options).unwrap();
        assert_eq!(signal.clean(), signal.filter_input());
        // Quarter period of 100 Hz at 2 kHz is 5 samples.
        assert_abs_diff_eq!(signal.clean()[5], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_noise_statistics() {
        let options = SignalOptions {
            duration: 50.0,
            noise_mean: 0.5,
            noise_std: 0.2,
            ..SignalOptions::default()
        };
        let signal = make_signal(&options).unwrap();
        let noise: Vec<f64> = signal
            .filter_input()
            .iter()
            .zip(signal.clean())
            .map(|(x, s)| x - s)
            .collect();
        let mean = noise.iter().sum::<f64>() / noise.len() as f64;
        let var = noise.iter().map(|n| (n - mean) * (n - mean)).sum::<f64>() / noise.len() as f64;
        assert_abs_diff_eq!(mean, 0.5, epsilon = 0.01);
        assert_abs_diff_eq!(var.sqrt(), 0.2, epsilon = 0.01);
    }

    #[test]
    fn test_anc_channels() {
        let options = SignalOptions {
            anc: true,
            ..SignalOptions::default()
        };
        let signal = make_signal(&options).unwrap();
        assert!(signal.is_anc());
        match &signal.channels {
            Channels::Anc {
                d_primary,
                s_clean,
                x,
            } => {
                let n1: Vec<f64> = d_primary.iter().zip(s_clean).map(|(d, s)| d - s).collect();
                assert_abs_diff_eq!(x[0], n1[1] + 0.5 * n1[0], epsilon = 1e-12);
                assert_abs_diff_eq!(x[10], n1[11] + 0.5 * n1[10] + 0.25 * n1[9], epsilon = 1e-12);
                let last = x.len() - 1;
                assert_abs_diff_eq!(x[last], 0.5 * n1[last] + 0.25 * n1[last - 1], epsilon = 1e-12);
            }
            Channels::Plain { .. } => panic!("expected ANC channels"),
        }
        assert_eq!(signal.target().len(), signal.len());
        assert_eq!(signal.noisy(), signal.target());
    }

    #[test]
    fn test_convolve_same() {
        let result = convolve_same(&[1.0, 2.0, 3.0, 4.0], &[1.0, 0.5, 0.25]);
        // numpy.convolve([1, 2, 3, 4], [1, 0.5, 0.25], "same")
        assert_eq!(result, vec![2.5, 4.25, 6.0, 2.75]);
    }

    #[test]
    fn test_invalid_options() {
        let base = SignalOptions::default();
        for options in [
            SignalOptions {
                sample_rate: 0.0,
                ..base
            },
            SignalOptions {
                sample_rate: -1.0,
                ..base
            },
            SignalOptions {
                duration: 0.0,
                ..base
            },
            SignalOptions {
                noise_std: -0.1,
                ..base
            },
            SignalOptions {
                frequency: f64::NAN,
                ..base
            },
            SignalOptions {
                duration: 1e-6,
                ..base
            },
            SignalOptions {
                duration: 1e19,
                ..base
            },
            SignalOptions {
                sample_rate: 1e300,
                ..base
            },
            SignalOptions {
                duration: 1e300,
                sample_rate: 1e300,
                ..base
            },
        ]
        .iter()
        {
            let result = make_signal(options);
            assert!(matches!(result, Err(HarnessError::Validation(_))));
        }
    }
}
