use std::path::PathBuf;

use anyhow::{Context, Result};

use chatroll::{LayoutOverrides, Settings, TrackEmitter};

use crate::{DownloadArgs, JitterArgs, LayoutArgs};

pub async fn cmd_download(
    url: &str,
    output: Option<PathBuf>,
    settings: &Settings,
    layout: &LayoutArgs,
    jitter: JitterArgs,
    download: DownloadArgs,
) -> Result<()> {
    let (session, comments) = super::download_comments(url, settings, download).await?;
    let comments = super::apply_jitter(comments, jitter);

    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.ass", file_stem(&session.title))));
    let emitter = TrackEmitter::new(super::layout_config(pipeline_preset(), settings, layout));
    emitter
        .write_to_file(&comments, &path)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    eprintln!("💾 Saved {}", path.display());
    Ok(())
}

/// Render preset of the download pipeline: thicker outline, 5 s on screen
fn pipeline_preset() -> LayoutOverrides {
    LayoutOverrides {
        font_size: Some(36),
        outline_width: Some(3),
        visible_duration: Some(500),
        ..Default::default()
    }
}

/// Make a session title safe to use as a file name
fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim().trim_matches('.');
    if stem.is_empty() {
        "chat".to_string()
    } else {
        stem.to_string()
    }
}
