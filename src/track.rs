//! ASS overlay track generation from lane placements.
//!
//! Output is byte-compatible with the format existing danmaku renderers
//! expect: fixed script info, one style, one `Dialogue` per comment in
//! stream order, each carrying a `\move` from the right edge to just past
//! the left edge.

use std::path::Path;

use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::comment::Comment;
use crate::error::Result;
use crate::layout::{layout, LayoutConfig, Placement, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Name of the single style every event uses
pub const STYLE_NAME: &str = "style";

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, \
     OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, \
     Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENTS_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Format hundredths of a second as an ASS timestamp (H:MM:SS.cc)
#[must_use]
pub fn format_ass_time(centis: u64) -> String {
    let hours = centis / 360_000;
    let minutes = (centis % 360_000) / 6_000;
    let seconds = (centis % 6_000) / 100;
    let centis = centis % 100;
    format!("{hours}:{minutes:02}:{seconds:02}.{centis:02}")
}

/// The one style block of the track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStyle {
    /// Style name
    pub name: String,
    /// Font name
    pub font_name: String,
    /// Font size
    pub font_size: u32,
    /// Primary color (AABBGGRR)
    pub primary_color: String,
    /// Secondary color (karaoke)
    pub secondary_color: String,
    /// Outline color
    pub outline_color: String,
    /// Background/shadow color
    pub back_color: String,
    /// Bold
    pub bold: bool,
    /// Outline width
    pub outline: u32,
    /// Alignment (numpad style: 7 = top left)
    pub alignment: u8,
}

impl TrackStyle {
    /// Style derived from the layout configuration
    #[must_use]
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            name: STYLE_NAME.to_string(),
            font_name: config.font_name.clone(),
            font_size: config.font_size,
            primary_color: "&H00FFFFFF".to_string(),   // White
            secondary_color: "&H00FFFFFF".to_string(), // White
            outline_color: "&H80000000".to_string(),   // Semi-transparent black
            back_color: "&H00000000".to_string(),      // Black
            bold: true,
            outline: config.outline_width,
            alignment: 7, // Top left, so `\move` coordinates are the text origin
        }
    }

    /// Format as ASS style line
    fn to_ass_line(&self) -> String {
        format!(
            "Style: {},{},{},{},{},{},{},{},0,0,0,100,100,0,0,1,{},0,{},0,0,0,1",
            self.name,
            self.font_name,
            self.font_size,
            self.primary_color,
            self.secondary_color,
            self.outline_color,
            self.back_color,
            if self.bold { -1 } else { 0 },
            self.outline,
            self.alignment,
        )
    }
}

/// Builds the full overlay track document
#[derive(Debug, Clone, Default)]
pub struct TrackEmitter {
    config: LayoutConfig,
}

impl TrackEmitter {
    /// Create an emitter for the given layout configuration
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    fn script_info() -> String {
        format!(
            "[Script Info]\n\
             ScriptType: v4.00+\n\
             PlayResX: {CANVAS_WIDTH}\n\
             PlayResY: {CANVAS_HEIGHT}\n\
             WrapStyle: 2\n\
             ScaledBorderAndShadow: Yes\n\
             Timing: 100.0000\n"
        )
    }

    fn styles(&self) -> String {
        let style = TrackStyle::from_config(&self.config);
        format!("[V4+ Styles]\n{STYLE_FORMAT}\n{}", style.to_ass_line())
    }

    /// One `Dialogue` line for a placement
    #[must_use]
    pub fn dialogue(placement: &Placement<'_>) -> String {
        let comment = placement.comment;
        let author = comment.author_id.replace(',', "_");
        let text = comment.text.replace("\r\n", "\n").replace('\n', "\\N");
        let x0 = coordinate(placement.start_x);
        let x1 = coordinate(placement.end_x);
        let y = coordinate(placement.y);

        format!(
            "Dialogue: {},{},{},{STYLE_NAME},{author},0000,0000,0000,,{{\\move({x0},{y},{x1},{y})}}{text}",
            placement.index,
            format_ass_time(placement.start_time),
            format_ass_time(placement.end_time),
        )
    }

    /// Assemble a document from already computed placements
    #[must_use]
    pub fn render_placements(&self, placements: &[Placement<'_>]) -> String {
        let events: Vec<String> = placements.iter().map(Self::dialogue).collect();

        [
            Self::script_info(),
            self.styles(),
            format!("\n[Events]\n{EVENTS_FORMAT}"),
            events.join("\n"),
        ]
        .join("\n")
    }

    /// Lay out `comments` and render the document
    #[must_use]
    pub fn render(&self, comments: &[Comment]) -> String {
        let placements = layout(comments, &self.config);
        self.render_placements(&placements)
    }

    /// Render and write the document to a file
    pub async fn write_to_file(&self, comments: &[Comment], path: &Path) -> Result<()> {
        let content = self.render(comments);
        fs::write(path, content).await?;
        Ok(())
    }

    /// Render and write the document to an async writer
    pub async fn write_to<W: AsyncWrite + Unpin + Send>(
        &self,
        comments: &[Comment],
        writer: &mut W,
    ) -> Result<()> {
        let content = self.render(comments);
        writer.write_all(content.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}

/// Normalise `-0` so empty comments print as `0`
fn coordinate(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
