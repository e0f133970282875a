pub mod download;
pub mod fetch;
pub mod render;

use std::path::Path;

use anyhow::{Context, Result};

use chatroll::source::DownloadConfig;
use chatroll::{Comment, Downloader, KickSource, LayoutConfig, LayoutOverrides, SessionInfo, Settings};

use crate::{DownloadArgs, JitterArgs, LayoutArgs};

/// Load settings from `path`, or the default location
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Settings::load().context("failed to load settings"),
    }
}

/// Defaults, then the command's preset, then the settings file, then flags
pub fn layout_config(preset: LayoutOverrides, settings: &Settings, args: &LayoutArgs) -> LayoutConfig {
    let overrides = preset.or(settings.layout.clone()).or(args.overrides());
    LayoutConfig::default().merged(&overrides)
}

/// Apply jitter flags to a sorted comment list
pub fn apply_jitter(comments: Vec<Comment>, args: JitterArgs) -> Vec<Comment> {
    if args.no_jitter {
        comments
    } else {
        chatroll::jitter(comments, args.seed)
    }
}

/// Resolve the session behind `url` and download its chat
pub async fn download_comments(
    url: &str,
    settings: &Settings,
    args: DownloadArgs,
) -> Result<(SessionInfo, Vec<Comment>)> {
    let source = KickSource::new()?;
    let session = source
        .session_info(url)
        .await
        .with_context(|| format!("failed to look up {url}"))?;

    eprintln!("📺 {}", session.title);
    eprintln!(
        "   Started: {} | Length: {}s",
        session.start.to_rfc3339(),
        session.duration_ms / 1000
    );

    let mut config: DownloadConfig = settings.download;
    if let Some(concurrency) = args.concurrency {
        config.concurrency = usize::try_from(concurrency).unwrap_or(usize::MAX);
    }
    if let Some(retries) = args.retries {
        config.retry.max_retries = retries;
    }

    let start = std::time::Instant::now();
    let downloader = Downloader::new(source)
        .with_config(config)
        .with_progress(|done, total| {
            if done == total || done % 50 == 0 {
                eprintln!("   ⏬ {done}/{total} windows");
            }
        });
    let comments = downloader
        .download(&session)
        .await
        .context("chat download failed")?;

    eprintln!(
        "✅ {} comments in {:.1}s",
        comments.len(),
        start.elapsed().as_secs_f64()
    );

    Ok((session, comments))
}
