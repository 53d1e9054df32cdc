use adafilt::signal::SignalOptions;
use adafilt::{Algorithm, Harness, RunRequest};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Using notation from https://en.wikipedia.org/wiki/Least_mean_squares_filter
    // d(n), the primary channel, is a sinusoid plus noise. x(n), the reference
    // channel, is a filtered version of the same noise. The error e(n) = d(n) - y(n)
    // is the cleaned up signal.
    let options = SignalOptions {
        anc: true,
        noise_std: 1.0,
        ..SignalOptions::default()
    };
    println!("Created ANC signals, noise std {}", options.noise_std);

    let harness = Harness::new();
    for algorithm in [Algorithm::Lms, Algorithm::Rls, Algorithm::Gngd] {
        let request = RunRequest::new(algorithm, 8).with_signal(options);
        let result = harness.run_once(&request).unwrap();
        println!(
            "{:<8} snr {:6.2} dB -> {:6.2} dB ({:+.2} dB), converged after {} samples",
            algorithm.name(),
            result.metrics.snr_in,
            result.metrics.snr_out,
            result.metrics.dsnr,
            result.metrics.n90
        );
        if let Some(peak) = result.spectra.output.peak_frequency() {
            println!("         output spectrum peaks at {:.1} Hz", peak);
        }
    }
}
