use adafilt::{Algorithm, Harness, RunRequest};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let harness = Harness::new();
    println!(
        "{:<8} {:>11} {:>11} {:>11} {:>9} {:>6}",
        "", "mse", "emse", "misadj", "dsnr", "n90"
    );
    for algorithm in Algorithm::ALL {
        let request = RunRequest::new(algorithm, 32);
        match harness.run_once(&request) {
            Ok(result) => {
                let m = result.metrics;
                println!(
                    "{:<8} {:>11.3e} {:>11.3e} {:>11.3e} {:>9.2} {:>6}",
                    algorithm.name(),
                    m.mse,
                    m.emse,
                    m.misadj,
                    m.dsnr,
                    m.n90
                );
            }
            Err(error) => println!("{:<8} {}", algorithm.name(), error),
        }
    }
}
