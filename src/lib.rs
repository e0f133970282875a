//! `chatroll` - livestream chat replays as scrolling comment overlays
//!
//! # Features
//!
//! - **Layout**: greedy first-fit lane allocation with speed-aware collision checks
//! - **ASS output**: byte-compatible danmaku subtitle tracks for any player
//! - **Download**: parallel, retrying chat replay fetch from Kick VODs
//!
//! # Example
//!
//! ```rust
//! use chatroll::{Comment, LayoutConfig, TrackEmitter};
//!
//! let comments = vec![
//!     Comment::new(0, "alice", "first!"),
//!     Comment::new(150, "bob", "hello chat"),
//! ];
//! let ass = TrackEmitter::new(LayoutConfig::default()).render(&comments);
//! assert!(ass.contains("[Events]"));
//! ```

pub mod comment;
pub mod error;
pub mod http_client;
pub mod jitter;
pub mod layout;
pub mod settings;
pub mod source;
pub mod track;

pub use comment::Comment;
pub use error::{Error, Result};
pub use http_client::HttpClient;
pub use jitter::jitter;
pub use layout::{layout, LaneAllocator, LayoutConfig, LayoutOverrides, OccupancyPolicy, Placement};
pub use settings::Settings;
pub use source::{CommentSource, DownloadConfig, Downloader, KickSource, RawChat, RetryPolicy, SessionInfo};
pub use track::TrackEmitter;

/// Version of chatroll
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
