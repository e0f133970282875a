//! Greedy first-fit lane allocation.
//!
//! Comments are placed one at a time in stream order. The first lane whose
//! occupant leaves a non-positive collision margin wins; if every lane
//! collides, the lane with the smallest margin is used anyway. Decisions
//! are never revisited.

use tracing::{debug, trace};

use super::collision::collision_margin;
use super::config::{LayoutConfig, OccupancyPolicy};
use super::geometry::{LaneGrid, Motion};
use crate::comment::Comment;

/// Final position and timing of one comment
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<'a> {
    /// Position of the comment in the input stream
    pub index: usize,
    /// The comment itself
    pub comment: &'a Comment,
    /// Lane index, `0..lane_count`
    pub lane: usize,
    /// On-screen start, hundredths of a second
    pub start_time: u64,
    /// On-screen end, hundredths of a second
    pub end_time: u64,
    /// X coordinate at `start_time`
    pub start_x: f64,
    /// X coordinate at `end_time`
    pub end_x: f64,
    /// Y coordinate of the lane
    pub y: f64,
    /// Collision margin that decided the lane (`<= 0` means collision-free)
    pub margin: f64,
    /// Stream index of the occupant the margin was measured against
    pub checked_against: Option<usize>,
}

impl Placement<'_> {
    /// Whether this comment was forced into a colliding lane
    #[must_use]
    pub fn collides(&self) -> bool {
        self.margin > 0.0
    }
}

/// Comments that may still be on screen in one lane
#[derive(Debug, Default)]
struct LaneState<'a> {
    occupants: Vec<(usize, &'a Comment)>,
}

impl<'a> LaneState<'a> {
    /// Margin against the lane's occupants and the occupant that produced it
    fn margin(&self, candidate: &Comment, config: &LayoutConfig) -> (f64, Option<usize>) {
        if self.occupants.is_empty() {
            return (collision_margin(None, candidate, config), None);
        }
        self.occupants
            .iter()
            .map(|&(index, occupant)| (collision_margin(Some(occupant), candidate, config), Some(index)))
            .fold((f64::NEG_INFINITY, None), |worst, current| {
                if current.0 > worst.0 {
                    current
                } else {
                    worst
                }
            })
    }

    fn prune(&mut self, now: u64, duration: u64) {
        self.occupants
            .retain(|(_, occupant)| occupant.emitted_at.saturating_add(duration) > now);
    }

    fn push(&mut self, index: usize, comment: &'a Comment, policy: OccupancyPolicy) {
        if policy == OccupancyPolicy::MostRecent {
            self.occupants.clear();
        }
        self.occupants.push((index, comment));
    }
}

/// Single-pass lane allocator over a time-ordered comment stream
#[derive(Debug)]
pub struct LaneAllocator<'a> {
    config: &'a LayoutConfig,
    grid: LaneGrid,
    lanes: Vec<LaneState<'a>>,
    next_index: usize,
}

impl<'a> LaneAllocator<'a> {
    /// Create an allocator with every lane empty
    #[must_use]
    pub fn new(config: &'a LayoutConfig) -> Self {
        let grid = LaneGrid::new(config);
        let lanes = (0..grid.len()).map(|_| LaneState::default()).collect();
        Self {
            config,
            grid,
            lanes,
            next_index: 0,
        }
    }

    /// Lane geometry in use
    #[must_use]
    pub fn grid(&self) -> &LaneGrid {
        &self.grid
    }

    /// Current collision margin of `candidate` in every lane, in lane order
    #[must_use]
    pub fn margins(&self, candidate: &Comment) -> Vec<f64> {
        self.lanes
            .iter()
            .map(|lane| lane.margin(candidate, self.config).0)
            .collect()
    }

    /// Place the next comment of the stream
    pub fn place(&mut self, comment: &'a Comment) -> Placement<'a> {
        let index = self.next_index;
        self.next_index += 1;

        if self.config.occupancy == OccupancyPolicy::StillVisible {
            for lane in &mut self.lanes {
                lane.prune(comment.emitted_at, self.config.visible_duration);
            }
        }

        let mut chosen = 0;
        let mut best = (f64::INFINITY, None);
        for (lane, state) in self.lanes.iter().enumerate() {
            let (margin, against) = state.margin(comment, self.config);
            if margin <= 0.0 {
                chosen = lane;
                best = (margin, against);
                break;
            }
            if margin < best.0 {
                chosen = lane;
                best = (margin, against);
            }
        }

        let (margin, checked_against) = best;
        if margin > 0.0 {
            trace!(index, lane = chosen, margin, "no free lane, using least overlap");
        }

        self.lanes[chosen].push(index, comment, self.config.occupancy);

        let motion = Motion::of(comment, self.config);
        Placement {
            index,
            comment,
            lane: chosen,
            start_time: comment.emitted_at,
            end_time: comment.emitted_at.saturating_add(self.config.visible_duration),
            start_x: motion.start_x(),
            end_x: motion.end_x(),
            y: self.grid.y(chosen),
            margin,
            checked_against,
        }
    }
}

/// Lay out a whole comment stream, returning placements in input order
#[must_use]
pub fn layout<'a>(comments: &'a [Comment], config: &'a LayoutConfig) -> Vec<Placement<'a>> {
    let mut allocator = LaneAllocator::new(config);
    let placements: Vec<_> = comments.iter().map(|c| allocator.place(c)).collect();

    let collisions = placements.iter().filter(|p| p.collides()).count();
    debug!(
        comments = placements.len(),
        lanes = allocator.grid().len(),
        collisions,
        "Layout complete"
    );

    placements
}
