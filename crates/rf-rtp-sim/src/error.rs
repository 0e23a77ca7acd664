//! Simulator errors

use std::path::PathBuf;

use rf_slot_rtp::RtpError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Engine(#[from] RtpError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported tables format '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid count '{0}'")]
    InvalidCount(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
