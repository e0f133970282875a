use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use chatroll::Settings;

use crate::DownloadArgs;

pub async fn cmd_fetch(
    url: &str,
    output: Option<PathBuf>,
    settings: &Settings,
    download: DownloadArgs,
) -> Result<()> {
    let (_, comments) = super::download_comments(url, settings, download).await?;
    let json = serde_json::to_string_pretty(&comments)?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("💾 Saved {} comments to {}", comments.len(), path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(json.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}
