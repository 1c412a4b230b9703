//! Weighted archetype selection
//!
//! Tables are cumulative thresholds checked in order against a single
//! uniform draw; the trailing archetype takes the remainder.

use super::difficulty::DifficultyTier;
use super::random::CourseRng;
use super::state::{ObstacleKind, SegmentKind};

/// Cumulative probability table with an implicit remainder entry
#[derive(Debug, Clone, Copy)]
pub struct WeightedTable<T: Copy + 'static> {
    pub thresholds: &'static [(f32, T)],
    pub remainder: T,
}

impl<T: Copy + 'static> WeightedTable<T> {
    /// First entry whose threshold exceeds `roll`
    pub fn pick(&self, roll: f32) -> T {
        self.thresholds
            .iter()
            .find(|(threshold, _)| roll < *threshold)
            .map(|(_, kind)| *kind)
            .unwrap_or(self.remainder)
    }
}

const SEGMENTS_LOW: WeightedTable<SegmentKind> = WeightedTable {
    thresholds: &[
        (0.3, SegmentKind::Straight),
        (0.5, SegmentKind::Ramp),
        (0.7, SegmentKind::Platform),
    ],
    remainder: SegmentKind::SlidingFloor,
};

const SEGMENTS_MID: WeightedTable<SegmentKind> = WeightedTable {
    thresholds: &[
        (0.2, SegmentKind::Straight),
        (0.35, SegmentKind::NarrowBridge),
        (0.5, SegmentKind::Gauntlet),
        (0.65, SegmentKind::Ramp),
        (0.8, SegmentKind::TumblingBlocks),
    ],
    remainder: SegmentKind::Platform,
};

const SEGMENTS_HIGH: WeightedTable<SegmentKind> = WeightedTable {
    thresholds: &[
        (0.2, SegmentKind::NarrowBridge),
        (0.4, SegmentKind::Gauntlet),
        (0.6, SegmentKind::TumblingBlocks),
        (0.8, SegmentKind::SlidingFloor),
    ],
    remainder: SegmentKind::Ramp,
};

const OBSTACLES_STRAIGHT: WeightedTable<ObstacleKind> = WeightedTable {
    thresholds: &[
        (0.3, ObstacleKind::SpinningBar),
        (0.5, ObstacleKind::Bumper),
        (0.7, ObstacleKind::Pendulum),
    ],
    remainder: ObstacleKind::Windmill,
};

const OBSTACLES_BRIDGE: WeightedTable<ObstacleKind> = WeightedTable {
    thresholds: &[(0.4, ObstacleKind::Pendulum), (0.7, ObstacleKind::Windmill)],
    remainder: ObstacleKind::Bumper,
};

const OBSTACLES_SLIDING: WeightedTable<ObstacleKind> = WeightedTable {
    thresholds: &[(0.3, ObstacleKind::SpinningBar), (0.6, ObstacleKind::Bumper)],
    remainder: ObstacleKind::Roller,
};

const OBSTACLES_GAUNTLET: WeightedTable<ObstacleKind> = WeightedTable {
    thresholds: &[
        (0.3, ObstacleKind::SpinningBar),
        (0.5, ObstacleKind::Pendulum),
        (0.7, ObstacleKind::Bumper),
        (0.85, ObstacleKind::PunchWall),
    ],
    remainder: ObstacleKind::Roller,
};

const OBSTACLES_DEFAULT: WeightedTable<ObstacleKind> = WeightedTable {
    thresholds: &[
        (0.25, ObstacleKind::SpinningBar),
        (0.5, ObstacleKind::Pendulum),
        (0.75, ObstacleKind::Bumper),
    ],
    remainder: ObstacleKind::Launcher,
};

/// Segment archetype table for a difficulty tier
pub fn segment_table(tier: DifficultyTier) -> &'static WeightedTable<SegmentKind> {
    match tier {
        DifficultyTier::Low => &SEGMENTS_LOW,
        DifficultyTier::Mid => &SEGMENTS_MID,
        DifficultyTier::High => &SEGMENTS_HIGH,
    }
}

/// Obstacle archetype table for the enclosing segment archetype
pub fn obstacle_table(segment: SegmentKind) -> &'static WeightedTable<ObstacleKind> {
    match segment {
        SegmentKind::Straight => &OBSTACLES_STRAIGHT,
        SegmentKind::NarrowBridge => &OBSTACLES_BRIDGE,
        SegmentKind::SlidingFloor => &OBSTACLES_SLIDING,
        SegmentKind::Gauntlet => &OBSTACLES_GAUNTLET,
        _ => &OBSTACLES_DEFAULT,
    }
}

/// One draw: segment archetype for the current difficulty
pub fn pick_segment_kind(difficulty: f32, rng: &mut CourseRng) -> SegmentKind {
    let roll = rng.uniform01();
    segment_table(DifficultyTier::of(difficulty)).pick(roll)
}

/// One draw: obstacle archetype for a placement inside `segment`
pub fn pick_obstacle_kind(segment: SegmentKind, rng: &mut CourseRng) -> ObstacleKind {
    let roll = rng.uniform01();
    obstacle_table(segment).pick(roll)
}
