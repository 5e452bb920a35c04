//! RUL Prediction Client
//!
//! Reads a sequence of bearing vibration files, sends them to the
//! prediction API and converts the returned cycles into hours.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Window size the deployed model was trained with
pub const DEFAULT_WINDOW_SIZE: usize = 15;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised by the client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Error reading file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Error reading file '{}': line {line}: '{value}' is not a number", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("Error reading file '{}': no samples found", path.display())]
    EmptyFile { path: PathBuf },

    #[error("Please upload exactly {expected} files. You have uploaded {actual}.")]
    WindowSize { expected: usize, actual: usize },

    #[error("Connection Error: Could not connect to the API. Is it deployed and running? Details: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API Error: Received status code {status}: {body}")]
    Api { status: u16, body: String },

    #[error("API returned a successful response, but the 'predicted_rul' key was missing: {0}")]
    MissingPrediction(String),
}

/// Convert a RUL in cycles into hours (one cycle every 10 minutes)
pub fn cycles_to_hours(cycles: f64) -> f64 {
    cycles * 10.0 / 60.0
}

/// Read the first column of a header-less, delimiter-separated signal file
pub fn read_signal_file(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<f64>, ClientError> {
    let path = path.as_ref();
    let read_err = |source| ClientError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        let field = record.get(0).unwrap_or("").trim();
        if field.is_empty() {
            continue;
        }

        let value = field.parse::<f64>().map_err(|_| ClientError::Parse {
            path: path.to_path_buf(),
            line: record.position().map(|p| p.line()).unwrap_or(0),
            value: field.to_string(),
        })?;
        samples.push(value);
    }

    if samples.is_empty() {
        return Err(ClientError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    debug!("Read {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Read a full window of signal files, refusing the wrong file count
pub fn read_signal_window(
    paths: &[PathBuf],
    window_size: usize,
    delimiter: u8,
) -> Result<Vec<Vec<f64>>, ClientError> {
    if paths.len() != window_size {
        return Err(ClientError::WindowSize {
            expected: window_size,
            actual: paths.len(),
        });
    }
    paths
        .iter()
        .map(|p| read_signal_file(p, delimiter))
        .collect()
}

/// Order files by their numeric stem (`2.csv` before `10.csv`); others sort last by name
pub fn natural_order(paths: &mut [PathBuf]) {
    paths.sort_by_key(|p| {
        let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        (stem.parse::<u64>().map_err(|_| ()), p.clone())
    });
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    signals: &'a [Vec<f64>],
}

/// Body returned by the prediction endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    /// Remaining Useful Life in cycles
    pub predicted_rul: f64,
    #[serde(default)]
    pub status: String,
}

impl PredictionResponse {
    /// Remaining Useful Life converted to hours
    pub fn predicted_hours(&self) -> f64 {
        cycles_to_hours(self.predicted_rul)
    }
}

/// HTTP client for `POST /predict`
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    /// Create a client; `/predict` is appended unless already present
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let trimmed = url.trim_end_matches('/');
        let endpoint = if trimmed.ends_with("/predict") {
            trimmed.to_string()
        } else {
            format!("{}/predict", trimmed)
        };

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    /// Prediction endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request a prediction for a window of snapshots, oldest first
    pub async fn predict(&self, signals: &[Vec<f64>]) -> Result<PredictionResponse, ClientError> {
        debug!("POST {} with {} snapshots", self.endpoint, signals.len());

        let response = self
            .http
            .post(&self.endpoint)
            .json(&PredictionRequest { signals })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|_| ClientError::MissingPrediction(body))
    }
}
