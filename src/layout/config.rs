//! Layout parameters shared by every stage of a render pass.

use serde::{Deserialize, Serialize};

/// How much history each lane keeps for collision checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OccupancyPolicy {
    /// Only the most recently placed comment in each lane is checked.
    /// Correct as long as the input is sorted by `emitted_at`.
    #[default]
    MostRecent,
    /// Every comment still on screen at the candidate's start is checked
    /// and the worst margin wins. Tolerates unsorted input.
    StillVisible,
}

/// Read-only parameters for one layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Font name written into the style block
    pub font_name: String,
    /// Font size in pixels; also the width of one character
    pub font_size: u32,
    /// Vertical padding above and below each lane, in pixels
    pub lane_margin: u32,
    /// Outline width written into the style block
    pub outline_width: u32,
    /// Time each comment stays on screen, in hundredths of a second
    pub visible_duration: u64,
    /// Lane history kept by the allocator
    pub occupancy: OccupancyPolicy,
    /// Upper bound on the number of lanes used (`None` = whole canvas)
    pub lane_limit: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_name: "emojiV1".to_string(),
            font_size: 36,
            lane_margin: 4,
            outline_width: 2,
            visible_duration: 800,
            occupancy: OccupancyPolicy::MostRecent,
            lane_limit: None,
        }
    }
}

impl LayoutConfig {
    /// Apply overrides on top of this config (shallow merge)
    #[must_use]
    pub fn merged(mut self, overrides: &LayoutOverrides) -> Self {
        if let Some(ref font_name) = overrides.font_name {
            self.font_name.clone_from(font_name);
        }
        if let Some(font_size) = overrides.font_size {
            self.font_size = font_size.max(1);
        }
        if let Some(lane_margin) = overrides.lane_margin {
            self.lane_margin = lane_margin;
        }
        if let Some(outline_width) = overrides.outline_width {
            self.outline_width = outline_width;
        }
        if let Some(visible_duration) = overrides.visible_duration {
            self.visible_duration = visible_duration.max(1);
        }
        if let Some(occupancy) = overrides.occupancy {
            self.occupancy = occupancy;
        }
        if let Some(lane_limit) = overrides.lane_limit {
            self.lane_limit = Some(lane_limit);
        }
        self
    }

    /// Set the visible duration in whole seconds
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        self.visible_duration = secs.max(1).saturating_mul(100);
        self
    }

    /// Cap the number of lanes
    #[must_use]
    pub fn with_lane_limit(mut self, limit: usize) -> Self {
        self.lane_limit = Some(limit);
        self
    }

    /// Set the occupancy policy
    #[must_use]
    pub fn with_occupancy(mut self, occupancy: OccupancyPolicy) -> Self {
        self.occupancy = occupancy;
        self
    }

    /// Lane height in pixels: the font plus a margin on each side
    #[must_use]
    pub fn lane_height(&self) -> f64 {
        f64::from(self.font_size) + f64::from(self.lane_margin) * 2.0
    }
}

/// Partial layout settings, every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOverrides {
    pub font_name: Option<String>,
    pub font_size: Option<u32>,
    pub lane_margin: Option<u32>,
    pub outline_width: Option<u32>,
    pub visible_duration: Option<u64>,
    pub occupancy: Option<OccupancyPolicy>,
    pub lane_limit: Option<usize>,
}

impl LayoutOverrides {
    /// Combine two override sets; fields set in `other` win
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            font_name: other.font_name.or(self.font_name),
            font_size: other.font_size.or(self.font_size),
            lane_margin: other.lane_margin.or(self.lane_margin),
            outline_width: other.outline_width.or(self.outline_width),
            visible_duration: other.visible_duration.or(self.visible_duration),
            occupancy: other.occupancy.or(self.occupancy),
            lane_limit: other.lane_limit.or(self.lane_limit),
        }
    }
}
