//! Domain error types.
//!
//! None of these reach an HTTP client: every component logs them and degrades
//! to an empty or partial result. Binaries wrap them in `anyhow` at the edge.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("field '{0}' is not a string")]
    NonStringField(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("telemetry transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("telemetry store answered {0}")]
    Status(reqwest::StatusCode),

    #[error("durable log write failed: {0}")]
    Durable(#[from] csv::Error),

    #[error("durable log I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
