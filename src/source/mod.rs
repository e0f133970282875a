//! Chat replay acquisition.
//!
//! A [`CommentSource`] knows how to pull one fixed window of raw chat
//! records for a session. The [`Downloader`] fans windows out over a small
//! worker pool, retries transient failures, and hands the layout engine a
//! deduplicated, time-sorted [`Comment`](crate::Comment) list.

pub mod download;
pub mod kick;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use download::{DownloadConfig, Downloader, RetryPolicy};
pub use kick::KickSource;

/// A chat record as delivered by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChat {
    /// Service-wide unique message id
    pub id: String,
    /// Author identifier
    pub author_id: String,
    /// Message text
    pub content: String,
    /// Absolute time the message was posted
    pub posted_at: DateTime<Utc>,
}

/// A recorded livestream session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Channel the chat belongs to
    pub channel_id: u64,
    /// Human-readable title
    pub title: String,
    /// When the stream started
    pub start: DateTime<Utc>,
    /// Stream length in milliseconds
    pub duration_ms: u64,
}

impl SessionInfo {
    /// When the stream ended
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.start + chrono::Duration::milliseconds(i64::try_from(self.duration_ms).unwrap_or(i64::MAX))
    }
}

/// Pull interface for one window of chat
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Fetch the chat window beginning at `start`.
    ///
    /// `Ok(None)` means the service answered but the payload did not have the
    /// expected shape; the window is treated as empty. `Err` is retried.
    async fn fetch_window(&self, channel_id: u64, start: DateTime<Utc>) -> Result<Option<Vec<RawChat>>>;
}

/// Parse an RFC 3339 timestamp, or `YYYY-MM-DD HH:MM:SS` taken as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::Timestamp(value.to_string()))
}
