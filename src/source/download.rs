//! Parallel, bounded-concurrency chat download.
//!
//! The session is cut into fixed windows. A fixed pool of workers pulls
//! window indices from a shared counter; every window fetch is retried with
//! exponential backoff. Results are deduplicated by message id as they
//! arrive, then sorted by posting time and converted to relative
//! [`Comment`]s.

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::{CommentSource, RawChat, SessionInfo};
use crate::comment::Comment;
use crate::error::{Error, Result};

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,
    /// Upper bound on any single delay, in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base_delay_ms: 250,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): 250ms, 500ms, 1s, ...
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 1_u64.checked_shl(retry.saturating_sub(1)).unwrap_or(u64::MAX);
        let ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(ms)
    }

    /// Run `op` until it succeeds or the retry budget is spent
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay(attempt);
                    warn!(label, attempt, ?delay, "Request failed, retrying: {e}");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(Error::RetriesExhausted {
                        window_start: label.to_string(),
                        attempts: attempt + 1,
                        last_error: e.to_string(),
                    });
                }
            }
        }
    }
}

/// Download tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Number of concurrent workers
    pub concurrency: usize,
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Per-window retry policy
    pub retry: RetryPolicy,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            window_ms: 5_000,
            retry: RetryPolicy::default(),
        }
    }
}

impl DownloadConfig {
    /// Window length actually used, never zero
    #[must_use]
    pub fn window_len(&self) -> u64 {
        self.window_ms.max(1)
    }

    /// Number of windows needed to cover `duration_ms`
    #[must_use]
    pub fn window_count(&self, duration_ms: u64) -> usize {
        usize::try_from(duration_ms.div_ceil(self.window_len())).unwrap_or(usize::MAX)
    }

    /// Reject tuning that would stall or flood the upstream API
    pub fn validate(&self) -> Result<()> {
        if self.window_ms == 0 {
            return Err(Error::InvalidSetting {
                key: "download.window_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.concurrency == 0 {
            return Err(Error::InvalidSetting {
                key: "download.concurrency",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Progress callback: `(windows_done, windows_total)`
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

#[derive(Default)]
struct Collected {
    seen: HashSet<String>,
    chats: Vec<RawChat>,
}

impl Collected {
    fn extend(&mut self, chats: Vec<RawChat>) {
        for chat in chats {
            if self.seen.insert(chat.id.clone()) {
                self.chats.push(chat);
            }
        }
    }
}

/// Fans window fetches out over a worker pool
pub struct Downloader<S> {
    source: Arc<S>,
    config: DownloadConfig,
    progress: Option<ProgressFn>,
}

impl<S: CommentSource + 'static> Downloader<S> {
    /// Create a downloader with default tuning
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            config: DownloadConfig::default(),
            progress: None,
        }
    }

    /// Replace the tuning
    #[must_use]
    pub fn with_config(mut self, config: DownloadConfig) -> Self {
        self.config = config;
        self
    }

    /// Report progress after every finished window
    #[must_use]
    pub fn with_progress(mut self, progress: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Download every window of `session` and return sorted comments.
    ///
    /// Any window that exhausts its retries aborts the whole download.
    #[instrument(skip(self, session), fields(source = self.source.name(), channel = session.channel_id))]
    pub async fn download(&self, session: &SessionInfo) -> Result<Vec<Comment>> {
        let total = self.config.window_count(session.duration_ms);
        let workers = self.config.concurrency.clamp(1, total.max(1));
        info!(windows = total, workers, "Downloading chat");

        let next = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));
        let collected = Arc::new(Mutex::new(Collected::default()));
        let mut set = JoinSet::new();

        for _ in 0..workers {
            let worker = Worker {
                source: Arc::clone(&self.source),
                next: Arc::clone(&next),
                done: Arc::clone(&done),
                collected: Arc::clone(&collected),
                progress: self.progress.clone(),
                config: self.config,
                channel_id: session.channel_id,
                start: session.start,
                total,
            };
            set.spawn(worker.run());
        }

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined? {
                set.abort_all();
                return Err(e);
            }
        }

        let chats = std::mem::take(&mut collected.lock().await.chats);
        let comments = to_comments(chats, session.start);
        info!(comments = comments.len(), "Download complete");
        Ok(comments)
    }
}

/// One member of the download pool
struct Worker<S> {
    source: Arc<S>,
    next: Arc<AtomicUsize>,
    done: Arc<AtomicUsize>,
    collected: Arc<Mutex<Collected>>,
    progress: Option<ProgressFn>,
    config: DownloadConfig,
    channel_id: u64,
    start: DateTime<Utc>,
    total: usize,
}

impl<S: CommentSource> Worker<S> {
    /// Pull windows off the shared counter until none are left
    async fn run(self) -> Result<()> {
        loop {
            let index = self.next.fetch_add(1, Ordering::SeqCst);
            if index >= self.total {
                return Ok(());
            }
            let window_start = window_start(self.start, index, self.config.window_len());
            let label = window_start.to_rfc3339();
            let chats = self
                .config
                .retry
                .run(&label, || self.source.fetch_window(self.channel_id, window_start))
                .await?;

            match chats {
                Some(chats) => {
                    debug!(window = index, count = chats.len(), "Window fetched");
                    self.collected.lock().await.extend(chats);
                }
                None => debug!(window = index, "Window empty"),
            }

            let finished = self.done.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(ref progress) = self.progress {
                progress(finished, self.total);
            }
        }
    }
}

fn window_start(start: DateTime<Utc>, index: usize, window_ms: u64) -> DateTime<Utc> {
    let offset = i64::try_from((index as u64).saturating_mul(window_ms)).unwrap_or(i64::MAX);
    start + chrono::Duration::milliseconds(offset)
}

/// Sort raw chats by posting time and make them relative to `start`.
///
/// Chats posted before the session started, and empty messages, are dropped.
#[must_use]
pub fn to_comments(mut chats: Vec<RawChat>, start: DateTime<Utc>) -> Vec<Comment> {
    chats.sort_by_key(|chat| chat.posted_at);
    chats
        .into_iter()
        .filter(|chat| !chat.content.is_empty())
        .filter_map(|chat| {
            let offset_ms = (chat.posted_at - start).num_milliseconds();
            let emitted_at = u64::try_from(offset_ms).ok()? / 10;
            Some(Comment {
                emitted_at,
                author_id: chat.author_id,
                text: chat.content,
            })
        })
        .collect()
}
