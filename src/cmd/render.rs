use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use chatroll::{Comment, LayoutOverrides, Settings, TrackEmitter};

use crate::{JitterArgs, LayoutArgs};

pub async fn cmd_render(
    input: &Path,
    output: Option<PathBuf>,
    settings: &Settings,
    layout: &LayoutArgs,
    jitter: JitterArgs,
) -> Result<()> {
    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mut comments: Vec<Comment> = serde_json::from_str(&content)
        .with_context(|| format!("invalid comment JSON in {}", input.display()))?;

    if !comments.windows(2).all(|w| w[0].emitted_at <= w[1].emitted_at) {
        warn!("Input is not sorted by emitted_at, sorting");
        comments.sort_by_key(|c| c.emitted_at);
    }

    let comments = super::apply_jitter(comments, jitter);
    let emitter = TrackEmitter::new(super::layout_config(LayoutOverrides::default(), settings, layout));

    match output {
        Some(path) => {
            emitter
                .write_to_file(&comments, &path)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("💾 Wrote {} comments to {}", comments.len(), path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            emitter.write_to(&comments, &mut stdout).await?;
        }
    }

    Ok(())
}
