//! Collision-avoiding layout of scrolling comments
//!
//! Every comment scrolls right to left across a fixed 1280x720 canvas over
//! the same visible duration. Longer comments therefore move faster, and two
//! comments in the same lane can collide either when the second one enters
//! or when the faster one catches up before the first has left.
//!
//! # Example
//!
//! ```rust
//! use chatroll::layout::{layout, LayoutConfig};
//! use chatroll::Comment;
//!
//! let comments = vec![
//!     Comment::new(0, "alice", "hello"),
//!     Comment::new(0, "bob", "hi there"),
//! ];
//! let config = LayoutConfig::default();
//! let placements = layout(&comments, &config);
//! assert_eq!(placements[0].lane, 0);
//! assert_eq!(placements[1].lane, 1);
//! ```

pub mod allocator;
pub mod collision;
pub mod config;
pub mod geometry;

pub use allocator::{layout, LaneAllocator, Placement};
pub use collision::{collision_at_end, collision_at_start, collision_margin};
pub use config::{LayoutConfig, LayoutOverrides, OccupancyPolicy};
pub use geometry::{pixel_length, LaneGrid, LaneTiling, Motion, CANVAS_HEIGHT, CANVAS_WIDTH};
