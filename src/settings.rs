//! User settings loaded from `~/.config/chatroll/config.toml`.
//!
//! ```toml
//! [layout]
//! font_name = "Noto Sans CJK JP"
//! font_size = 40
//! visible_duration = 600
//!
//! [download]
//! concurrency = 8
//! window_ms = 5000
//!
//! [download.retry]
//! max_retries = 5
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::layout::LayoutOverrides;
use crate::source::DownloadConfig;

/// Contents of the settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Layout overrides applied on top of the defaults
    pub layout: LayoutOverrides,
    /// Download tuning
    pub download: DownloadConfig,
}

impl Settings {
    /// Load from the default location.
    ///
    /// Returns defaults if the file doesn't exist (settings are optional).
    pub fn load() -> Result<Self> {
        Self::load_from(&default_path())
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.download.validate()?;
        Ok(settings)
    }
}

/// Return the path to the settings file
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chatroll")
        .join("config.toml")
}
