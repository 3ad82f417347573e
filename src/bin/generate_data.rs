//! Writes the synthetic sales dataset to `data/sales_data.csv`.
//!
//! Takes no arguments; the window, order count and seed are fixed so every
//! run produces the same file. Set `RUST_LOG=debug` for progress detail.

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use sales_pulse::generator::{generate_dataset, GeneratorConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .init();

    let config = GeneratorConfig::default();
    match generate_dataset(&config) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(path = %config.output.display(), "generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
