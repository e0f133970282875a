//! Error type for the acquisition and I/O side of the crate.
//!
//! The layout engine and track emitter never fail; everything that touches
//! the network, the filesystem, or user-supplied configuration reports
//! through [`Error`].

use thiserror::Error;

/// Errors surfaced to the caller of a download or render run
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Window starting at {window_start} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        window_start: String,
        attempts: u32,
        last_error: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid setting `{key}`: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
