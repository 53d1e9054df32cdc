use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Computes the one-sided FFT of a real buffer of any length.
/// The result has `buffer.len() / 2 + 1` bins, or is empty for an empty buffer.
pub fn real_fft(buffer: &[f64]) -> Vec<Complex<f64>> {
    let fft_size = buffer.len();
    if fft_size == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let mut bins: Vec<Complex<f64>> = buffer.iter().map(|x| Complex::new(*x, 0.0)).collect();
    fft.process(&mut bins);
    bins.truncate(fft_size / 2 + 1);
    bins
}
