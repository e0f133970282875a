//! `chatroll` CLI - download livestream chat replays and render them as ASS overlays

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use chatroll::{LayoutOverrides, OccupancyPolicy};

#[derive(Parser)]
#[command(name = "chatroll")]
#[command(about = "Render livestream chat replays as scrolling ASS comment overlays")]
#[command(version)]
struct Cli {
    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (default: ~/.config/chatroll/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a VOD's chat and write the overlay track
    Download {
        /// Video page URL (https://kick.com/<channel>/videos/<id>)
        url: String,

        /// Output file (default: <session title>.ass)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        jitter: JitterArgs,

        #[command(flatten)]
        download: DownloadArgs,
    },

    /// Download a VOD's chat as JSON comments without rendering
    Fetch {
        /// Video page URL (https://kick.com/<channel>/videos/<id>)
        url: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        download: DownloadArgs,
    },

    /// Render a JSON comment file into an overlay track
    Render {
        /// JSON array of {emitted_at, author_id, text}
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        jitter: JitterArgs,
    },
}

/// Lane history policy
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OccupancyArg {
    /// Check only the latest comment in each lane
    MostRecent,
    /// Check every comment still on screen
    StillVisible,
}

impl From<OccupancyArg> for OccupancyPolicy {
    fn from(arg: OccupancyArg) -> Self {
        match arg {
            OccupancyArg::MostRecent => Self::MostRecent,
            OccupancyArg::StillVisible => Self::StillVisible,
        }
    }
}

/// Layout flags shared by `download` and `render`
#[derive(Debug, Clone, Default, Args)]
pub struct LayoutArgs {
    /// Font name
    #[arg(long)]
    font_name: Option<String>,

    /// Font size in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    font_size: Option<u32>,

    /// Vertical padding per lane in pixels
    #[arg(long)]
    margin: Option<u32>,

    /// Outline width
    #[arg(long)]
    outline: Option<u32>,

    /// Seconds each comment stays on screen
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    duration: Option<u64>,

    /// Use at most this many lanes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    lanes: Option<u64>,

    /// Lane history policy
    #[arg(long, value_enum)]
    occupancy: Option<OccupancyArg>,
}

impl LayoutArgs {
    /// Flags as layout overrides
    pub fn overrides(&self) -> LayoutOverrides {
        LayoutOverrides {
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            lane_margin: self.margin,
            outline_width: self.outline,
            visible_duration: self.duration.map(|secs| secs.saturating_mul(100)),
            occupancy: self.occupancy.map(Into::into),
            lane_limit: self.lanes.and_then(|n| usize::try_from(n).ok()),
        }
    }
}

/// Timestamp jitter flags
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct JitterArgs {
    /// Keep whole-second timestamps as they are
    #[arg(long)]
    no_jitter: bool,

    /// Seed for reproducible jitter
    #[arg(long)]
    seed: Option<u64>,
}

/// Download tuning flags
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct DownloadArgs {
    /// Concurrent window requests
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    concurrency: Option<u64>,

    /// Retries per window before giving up
    #[arg(long)]
    retries: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let settings = cmd::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Download {
            url,
            output,
            layout,
            jitter,
            download,
        } => {
            cmd::download::cmd_download(&url, output, &settings, &layout, jitter, download).await?;
        }
        Commands::Fetch { url, output, download } => {
            cmd::fetch::cmd_fetch(&url, output, &settings, download).await?;
        }
        Commands::Render {
            input,
            output,
            layout,
            jitter,
        } => {
            cmd::render::cmd_render(&input, output, &settings, &layout, jitter).await?;
        }
    }

    Ok(())
}
