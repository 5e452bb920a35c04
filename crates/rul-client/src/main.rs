//! Command-line client for the RUL prediction API

use anyhow::{bail, Context, Result};
use clap::Parser;
use rul_client::{
    cycles_to_hours, natural_order, read_signal_window, PredictionClient, DEFAULT_WINDOW_SIZE,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(
    name = "rul-client",
    version,
    about = "Predict the Remaining Useful Life of a bearing from consecutive vibration snapshots"
)]
struct Args {
    /// Prediction API URL (`/predict` is appended if missing)
    #[arg(long, default_value = "http://127.0.0.1:8000/predict")]
    url: String,

    /// Number of consecutive snapshots the model expects
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: usize,

    /// Column delimiter of the signal files
    #[arg(long, default_value = "\t")]
    delimiter: char,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Keep the argument order instead of sorting files by numeric name
    #[arg(long)]
    no_sort: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Signal files, oldest first
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if !args.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character");
    }
    let delimiter = args.delimiter as u8;

    let mut files = args.files;
    if !args.no_sort {
        natural_order(&mut files);
    }

    let signals = read_signal_window(&files, args.window_size, delimiter)?;
    info!("Loaded {} snapshots", signals.len());

    let client = PredictionClient::new(&args.url, Duration::from_secs(args.timeout_secs))?;
    let prediction = client
        .predict(&signals)
        .await
        .with_context(|| format!("Prediction request to {} failed", client.endpoint()))?;

    println!("Predicted RUL: {:.1} cycles", prediction.predicted_rul);
    println!(
        "Estimated Time to Failure: {:.1} hours",
        cycles_to_hours(prediction.predicted_rul)
    );
    Ok(())
}
