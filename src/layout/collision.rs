//! Overlap margin between two comments sharing a lane.
//!
//! A positive margin means `second` would touch `first` on screen; the
//! value is the overlap in pixels. Zero or negative means the lane is free.

use super::config::LayoutConfig;
use super::geometry::{Motion, CANVAS_WIDTH};
use crate::comment::Comment;

/// Overlap when `second` enters: is the tail of `first` clear of the
/// right edge (plus half a font of spacing) yet?
#[must_use]
pub fn collision_at_start(first: &Comment, second: &Comment, config: &LayoutConfig) -> f64 {
    let motion = Motion::of(first, config);
    let elapsed = second.emitted_at as f64 - first.emitted_at as f64;
    let travelled = motion.speed * elapsed;
    let spacing = f64::from(config.font_size) / 2.0;
    motion.pixel_length + spacing - travelled
}

/// Overlap when `first` leaves: has the head of `second` reached the left
/// edge before `first` is gone?
#[must_use]
pub fn collision_at_end(first: &Comment, second: &Comment, config: &LayoutConfig) -> f64 {
    let first_ends_at = first.emitted_at.saturating_add(config.visible_duration) as f64;
    let motion = Motion::of(second, config);
    let remaining = first_ends_at - second.emitted_at as f64;
    motion.speed * remaining - f64::from(CANVAS_WIDTH)
}

/// Conservative overlap margin: the worse of the start and end checks.
///
/// An empty lane (`first == None`) never collides.
#[must_use]
pub fn collision_margin(first: Option<&Comment>, second: &Comment, config: &LayoutConfig) -> f64 {
    let Some(first) = first else {
        return 0.0;
    };
    let start = collision_at_start(first, second, config);
    let end = collision_at_end(first, second, config);
    start.max(end)
}
