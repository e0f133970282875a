//! Kick VOD chat replay via the public JSON API.
//!
//! Session metadata comes from `/api/v1/video/<id>`; chat is paged by
//! time through `/api/v2/channels/<channel>/messages?start_time=...`,
//! each call returning the messages of a short window after `start_time`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{parse_timestamp, CommentSource, RawChat, SessionInfo};
use crate::error::{Error, Result};
use crate::http_client::HttpClient;

static VIDEO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://kick\.com/[^?#]*/videos/([^/?#]+)").expect("video URL regex is valid")
});

const API_BASE: &str = "https://kick.com/api";

/// Extract the video id from a `kick.com/<channel>/videos/<id>` URL
pub fn parse_video_url(url: &str) -> Result<String> {
    VIDEO_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    livestream: Livestream,
}

#[derive(Debug, Deserialize)]
struct Livestream {
    channel_id: u64,
    session_title: Option<String>,
    start_time: String,
    #[serde(default)]
    duration: u64,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    data: Option<MessagesData>,
}

#[derive(Debug, Deserialize)]
struct MessagesData {
    messages: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct KickMessage {
    id: Value,
    user_id: Value,
    #[serde(default)]
    content: Option<String>,
    created_at: String,
}

/// Render an id that may arrive as a JSON string or number
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode a messages page. `None` if the page lacks `data.messages`.
fn parse_messages(body: Value) -> Option<Vec<RawChat>> {
    let response: MessagesResponse = serde_json::from_value(body).ok()?;
    let messages = response.data?.messages?;

    let chats = messages
        .into_iter()
        .filter_map(|raw| {
            let message: KickMessage = match serde_json::from_value(raw) {
                Ok(m) => m,
                Err(e) => {
                    debug!("Skipping malformed message: {e}");
                    return None;
                }
            };
            let posted_at = match parse_timestamp(&message.created_at) {
                Ok(ts) => ts,
                Err(e) => {
                    debug!("Skipping message: {e}");
                    return None;
                }
            };
            Some(RawChat {
                id: id_string(&message.id),
                author_id: id_string(&message.user_id),
                content: message.content.unwrap_or_default(),
                posted_at,
            })
        })
        .collect();

    Some(chats)
}

/// Kick chat replay source
#[derive(Debug, Clone)]
pub struct KickSource {
    client: HttpClient,
    api_base: String,
}

impl KickSource {
    /// Create a source talking to kick.com
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(HttpClient::new()?))
    }

    /// Create a source with a preconfigured client
    #[must_use]
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            api_base: API_BASE.to_string(),
        }
    }

    /// Point the source at a different API root (mirrors, tests)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Look up the session behind a video page URL
    #[instrument(skip(self))]
    pub async fn session_info(&self, video_url: &str) -> Result<SessionInfo> {
        let video_id = parse_video_url(video_url)?;
        let api_url = format!("{}/v1/video/{video_id}", self.api_base);
        debug!("Fetching video info: {api_url}");

        let video: VideoResponse = self.client.get_json(&api_url).await?;
        let livestream = video.livestream;

        Ok(SessionInfo {
            channel_id: livestream.channel_id,
            title: livestream.session_title.unwrap_or_else(|| video_id.clone()),
            start: parse_timestamp(&livestream.start_time)?,
            duration_ms: livestream.duration,
        })
    }

    fn messages_url(&self, channel_id: u64, start: DateTime<Utc>) -> Result<Url> {
        let base = format!("{}/v2/channels/{channel_id}/messages", self.api_base);
        let mut url = Url::parse(&base).map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("start_time", &start.to_rfc3339_opts(SecondsFormat::Millis, true));
        Ok(url)
    }
}

#[async_trait]
impl CommentSource for KickSource {
    fn name(&self) -> &'static str {
        "kick"
    }

    async fn fetch_window(&self, channel_id: u64, start: DateTime<Utc>) -> Result<Option<Vec<RawChat>>> {
        let url = self.messages_url(channel_id, start)?;
        let body: Value = self.client.get_json(url.as_str()).await?;

        let chats = parse_messages(body);
        if chats.is_none() {
            warn!(window = %start, "Unexpected messages payload, treating window as empty");
        }
        Ok(chats)
    }
}
