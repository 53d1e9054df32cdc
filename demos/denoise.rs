use adafilt::signal::SignalOptions;
use adafilt::{Algorithm, Harness, ParamKey, RunRequest};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    const TAPS: usize = 32;
    let options = SignalOptions {
        sample_rate: 2000.0,
        frequency: 100.0,
        duration: 0.8,
        noise_std: 0.1,
        ..SignalOptions::default()
    };

    // Recover a clean 100 Hz sinusoid from a noisy observation.
    let mut harness = Harness::new();
    println!("LMS, {} taps, {} Hz sinusoid", TAPS, options.frequency);
    println!("{:>8} {:>12} {:>10} {:>10} {:>6}", "mu", "mse", "snr in", "snr out", "n90");
    for mu in [0.001, 0.003, 0.01, 0.03, 0.06] {
        harness
            .store_mut()
            .update_parameter(Algorithm::Lms, ParamKey::Mu, mu)
            .unwrap();
        let request = RunRequest::new(Algorithm::Lms, TAPS).with_signal(options);
        match harness.run_once(&request) {
            Ok(result) => {
                let m = result.metrics;
                println!(
                    "{:>8} {:>12.3e} {:>10.2} {:>10.2} {:>6}",
                    mu, m.mse, m.snr_in, m.snr_out, m.n90
                );
            }
            Err(error) => println!("{:>8} {}", mu, error),
        }
    }
}
