//! cribdrag binary.
//!
//! # Usage
//!
//! ```bash
//! # Drag the built-in reference cribs, reports land in ./results
//! cribdrag
//!
//! # Own investigation, with two extra cribs
//! cribdrag --input scenario.json --output-dir out --crib " the " --crib "ing "
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cribdrag::{Error, Pipeline, RunSummary, Scenario};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crib-dragging attack on ciphertexts that share a key stream
#[derive(Parser, Debug)]
#[command(name = "cribdrag")]
#[command(about = "Crib-dragging attack on ciphertexts that share a key stream")]
#[command(version)]
struct Args {
    /// Scenario file (JSON); the built-in reference scenario is used if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the reports are written to, overriding the scenario
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Extra crib to drag, may be given several times
    #[arg(short, long = "crib")]
    cribs: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn run(args: &Args) -> Result<RunSummary, Error> {
    let mut scenario = match &args.input {
        Some(path) => Scenario::load_from_file(path)?,
        None       => Scenario::reference()?,
    };
    if let Some(dir) = &args.output_dir {
        scenario.output_dir = dir.clone();
    }
    for crib in &args.cribs {
        scenario.push_crib(crib.as_str());
    }
    let pipeline = Pipeline::from_scenario(&scenario)?;
    tracing::info!(
        combinations = pipeline.combinations().len(),
        cribs = pipeline.cribs().len(),
        output_dir = %pipeline.output_dir().display(),
        "starting crib-dragging run"
    );
    pipeline.run()
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(&args) {
        Ok(summary) if summary.is_success() => {
            tracing::info!(written = summary.written().count(), skipped = summary.skipped().count(), "run complete");
            ExitCode::SUCCESS
        }
        Ok(summary) => {
            tracing::error!(
                "{} of {} reports could not be written",
                summary.failed().count(),
                summary.outcomes.len(),
            );
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
