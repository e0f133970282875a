//! Canvas, lane grid and per-comment motion.
//!
//! Glyph metrics are approximated: every character is `font_size` pixels
//! wide. A comment enters at `x = CANVAS_WIDTH` and leaves fully at
//! `x = -pixel_length` after exactly `visible_duration`.

use super::config::LayoutConfig;
use crate::comment::Comment;

/// Logical canvas width in pixels
pub const CANVAS_WIDTH: u32 = 1280;
/// Logical canvas height in pixels
pub const CANVAS_HEIGHT: u32 = 720;

/// Horizontal extent and speed of one comment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Width of the rendered text in pixels
    pub pixel_length: f64,
    /// Pixels travelled per hundredth of a second
    pub speed: f64,
}

impl Motion {
    /// Compute the motion of `comment` under `config`
    #[must_use]
    pub fn of(comment: &Comment, config: &LayoutConfig) -> Self {
        let pixel_length = pixel_length(&comment.text, config.font_size);
        let speed = (f64::from(CANVAS_WIDTH) + pixel_length) / config.visible_duration.max(1) as f64;
        Self {
            pixel_length,
            speed,
        }
    }

    /// X coordinate where the motion starts
    #[must_use]
    pub fn start_x(&self) -> f64 {
        f64::from(CANVAS_WIDTH)
    }

    /// X coordinate where the motion ends
    #[must_use]
    pub fn end_x(&self) -> f64 {
        -self.pixel_length
    }
}

/// Fixed-width approximation of the rendered text width
#[must_use]
pub fn pixel_length(text: &str, font_size: u32) -> f64 {
    text.chars().count() as f64 * f64::from(font_size)
}

/// Which tiling of the canvas a lane belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneTiling {
    /// Aligned to the top edge
    Top,
    /// Shifted down by half a lane
    Offset,
}

/// The two interleaved tilings of the canvas into lanes.
///
/// Lanes `0..top_lanes` belong to the top tiling, the rest to the offset
/// tiling, so index order is "all top lanes, then all offset lanes".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneGrid {
    lane_height: f64,
    margin: f64,
    top_lanes: usize,
    offset_lanes: usize,
    len: usize,
}

impl LaneGrid {
    /// Build the grid for `config`, honouring `lane_limit`
    #[must_use]
    pub fn new(config: &LayoutConfig) -> Self {
        let lane_height = config.lane_height();
        let margin = f64::from(config.lane_margin);
        let height = f64::from(CANVAS_HEIGHT);

        // A zero-height lane (font 0, margin 0) tiles nothing.
        let (top_lanes, offset_lanes) = if lane_height > 0.0 {
            let top = ((height + margin) / lane_height).floor().max(0.0) as usize;
            let offset = ((height + margin - lane_height / 2.0) / lane_height)
                .floor()
                .max(0.0) as usize;
            (top, offset)
        } else {
            (0, 0)
        };

        // At least one lane so every comment has somewhere to go.
        let natural = top_lanes.saturating_add(offset_lanes).max(1);
        let len = config.lane_limit.map_or(natural, |limit| limit.clamp(1, natural));

        Self {
            lane_height,
            margin,
            top_lanes,
            offset_lanes,
            len,
        }
    }

    /// Number of usable lanes
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a grid has at least one lane
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lanes in the top tiling (before any limit)
    #[must_use]
    pub fn top_lanes(&self) -> usize {
        self.top_lanes
    }

    /// Lanes in the offset tiling (before any limit)
    #[must_use]
    pub fn offset_lanes(&self) -> usize {
        self.offset_lanes
    }

    /// Tiling that lane `lane` belongs to
    #[must_use]
    pub fn tiling(&self, lane: usize) -> LaneTiling {
        if lane < self.top_lanes {
            LaneTiling::Top
        } else {
            LaneTiling::Offset
        }
    }

    /// Y coordinate of the top of lane `lane`
    #[must_use]
    pub fn y(&self, lane: usize) -> f64 {
        match self.tiling(lane) {
            LaneTiling::Top => self.margin + lane as f64 * self.lane_height,
            LaneTiling::Offset => {
                let i = lane - self.top_lanes;
                self.lane_height / 2.0 + self.margin + i as f64 * self.lane_height
            }
        }
    }
}
