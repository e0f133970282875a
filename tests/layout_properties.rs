//! Layout engine properties checked over generated comment streams.

use chatroll::layout::{collision_margin, layout, LaneAllocator, LaneGrid, LayoutConfig, Motion};
use chatroll::{Comment, TrackEmitter};

/// A busy, deterministic stream: bursts every few seconds, mixed lengths.
fn busy_stream(count: u64) -> Vec<Comment> {
    (0..count)
        .map(|i| {
            let emitted_at = (i / 4) * 35 + (i % 4) * 3;
            let len = ((i * 7) % 23 + 1) as usize;
            Comment::new(emitted_at, format!("user{}", i % 17), "w".repeat(len))
        })
        .collect()
}

#[test]
fn geometry_is_stable() {
    let config = LayoutConfig::default();
    for comment in busy_stream(50) {
        assert_eq!(Motion::of(&comment, &config), Motion::of(&comment, &config));
    }
}

#[test]
fn lanes_stay_in_bounds() {
    for font_size in [12, 24, 36, 64, 300] {
        let config = LayoutConfig {
            font_size,
            ..Default::default()
        };
        let total = LaneGrid::new(&config).len();
        let comments = busy_stream(400);
        for placement in layout(&comments, &config) {
            assert!(placement.lane < total, "lane {} >= {total}", placement.lane);
        }
    }
}

#[test]
fn empty_occupant_never_collides() {
    let config = LayoutConfig::default();
    for comment in busy_stream(30) {
        assert!(collision_margin(None, &comment, &config).abs() < f64::EPSILON);
    }
}

#[test]
fn first_fit_never_skips_a_free_lane() {
    let config = LayoutConfig::default().with_lane_limit(6);
    let comments = busy_stream(300);
    let mut allocator = LaneAllocator::new(&config);

    for comment in &comments {
        let margins = allocator.margins(comment);
        let placement = allocator.place(comment);

        match margins.iter().position(|&m| m <= 0.0) {
            Some(first_free) => {
                assert_eq!(placement.lane, first_free);
                assert!(!placement.collides());
            }
            None => {
                let least = margins.iter().copied().fold(f64::INFINITY, f64::min);
                assert!((placement.margin - least).abs() < 1e-9);
                assert!((margins[placement.lane] - least).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn placements_follow_input_order() {
    let config = LayoutConfig::default();
    let comments = busy_stream(120);
    let placements = layout(&comments, &config);

    assert_eq!(placements.len(), comments.len());
    for (i, placement) in placements.iter().enumerate() {
        assert_eq!(placement.index, i);
        assert!(std::ptr::eq(placement.comment, &comments[i]));
    }

    let output = TrackEmitter::new(config).render(&comments);
    let indices: Vec<usize> = output
        .lines()
        .filter_map(|l| l.strip_prefix("Dialogue: "))
        .map(|l| l.split(',').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(indices, (0..120).collect::<Vec<_>>());
}

#[test]
fn consecutive_lane_occupants_can_be_rechecked() {
    let config = LayoutConfig::default().with_lane_limit(4);
    let comments = busy_stream(200);
    let placements = layout(&comments, &config);

    let mut last_in_lane: Vec<Option<usize>> = vec![None; 4];
    for placement in &placements {
        let previous = last_in_lane[placement.lane];
        assert_eq!(placement.checked_against, previous);

        let expected = collision_margin(previous.map(|i| &comments[i]), placement.comment, &config);
        assert!((placement.margin - expected).abs() < 1e-9);

        last_in_lane[placement.lane] = Some(placement.index);
    }
}

#[test]
fn single_lane_scenario() {
    let config = LayoutConfig {
        visible_duration: 500,
        ..Default::default()
    }
    .with_lane_limit(1);
    let comments = vec![Comment::new(0, "a", "twelve chars"), Comment::new(10, "b", "twelve chars")];
    let placements = layout(&comments, &config);

    assert_eq!(placements[0].lane, 0);
    assert_eq!(placements[1].lane, 0);
    assert!(placements[1].margin > 0.0);
    assert_eq!(placements[1].checked_against, Some(0));
}

#[test]
fn three_lane_scenario() {
    let config = LayoutConfig {
        font_size: 300,
        ..Default::default()
    };
    assert_eq!(LaneGrid::new(&config).len(), 3);

    let gap = config.visible_duration + 1;
    let comments: Vec<_> = (0..3).map(|i| Comment::new(i * gap, "u", "spaced")).collect();
    for placement in layout(&comments, &config) {
        assert_eq!(placement.lane, 0);
    }
}

#[test]
fn rendering_twice_is_byte_identical() {
    let config = LayoutConfig::default();
    let comments = busy_stream(250);
    let a = TrackEmitter::new(config.clone()).render(&comments);
    let b = TrackEmitter::new(config).render(&comments);
    assert_eq!(a, b);
}
