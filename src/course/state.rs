//! Course output types
//!
//! Everything produced by one generation run. Plain value data: segments and
//! obstacles refer to their geometry by arena span, never by engine handle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::{ArenaSpan, ShapeDescriptor};
use crate::consts::{FINISH_TRIGGER_OFFSET, RESPAWN_HEIGHT};
use crate::up;

/// Segment archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Straight,
    Ramp,
    NarrowBridge,
    Platform,
    Gauntlet,
    SlidingFloor,
    TumblingBlocks,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Straight => "Straight",
            SegmentKind::Ramp => "Ramp",
            SegmentKind::NarrowBridge => "NarrowBridge",
            SegmentKind::Platform => "Platform",
            SegmentKind::Gauntlet => "Gauntlet",
            SegmentKind::SlidingFloor => "SlidingFloor",
            SegmentKind::TumblingBlocks => "TumblingBlocks",
        }
    }
}

/// Obstacle archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    SpinningBar,
    Pendulum,
    Bumper,
    Windmill,
    PunchWall,
    Roller,
    Launcher,
}

/// Runtime parameters bound at emission, frozen for the life of the course
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleParams {
    /// Continuous rotation (degrees/sec) about `axis`
    Spin {
        axis: Vec3,
        speed: f32,
        knockback: f32,
        /// Rolls racers along instead of batting them away
        roller: bool,
    },
    /// Pendulum swing about `axis`
    Swing {
        axis: Vec3,
        speed: f32,
        max_angle: f32,
        knockback: f32,
    },
    Bounce { force: f32 },
    /// Back-and-forth travel, knocking back on contact
    Oscillate {
        travel: Vec3,
        speed: f32,
        knockback: f32,
    },
    Launch { force: f32, cooldown: f32 },
}

impl ObstacleParams {
    /// Motion speed, if the obstacle moves
    pub fn speed(&self) -> Option<f32> {
        match *self {
            ObstacleParams::Spin { speed, .. }
            | ObstacleParams::Swing { speed, .. }
            | ObstacleParams::Oscillate { speed, .. } => Some(speed),
            _ => None,
        }
    }

    /// Force applied to a racer on contact
    pub fn force(&self) -> f32 {
        match *self {
            ObstacleParams::Spin { knockback, .. }
            | ObstacleParams::Swing { knockback, .. }
            | ObstacleParams::Oscillate { knockback, .. } => knockback,
            ObstacleParams::Bounce { force } | ObstacleParams::Launch { force, .. } => force,
        }
    }
}

/// One obstacle inside a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    pub kind: ObstacleKind,
    /// Index of the enclosing segment
    pub segment: usize,
    /// Ground position local to the segment origin
    pub position: Vec3,
    /// Behavior pivot local to the segment origin
    pub pivot: Vec3,
    pub params: ObstacleParams,
    /// Pieces local to the pivot
    pub parts: Vec<ShapeDescriptor>,
}

/// One built segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub index: usize,
    pub kind: SegmentKind,
    pub start: Vec3,
    pub end: Vec3,
    /// Forward advance, after jitter and any stretch
    pub length: f32,
    /// Floor width used by the builder
    pub width: f32,
    /// Vertical offset this segment adds to everything after it
    pub elevation: f32,
    /// Difficulty the segment was built with
    pub difficulty: f32,
    pub geometry: ArenaSpan,
    pub obstacles: ArenaSpan,
}

/// Respawn anchor recorded every N segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Segment after which the checkpoint sits
    pub after_segment: usize,
    /// Build position right after that segment
    pub position: Vec3,
    /// Marker ring and trigger volume
    pub markers: ArenaSpan,
}

impl Checkpoint {
    pub fn respawn_position(&self) -> Vec3 {
        self.position + up(RESPAWN_HEIGHT)
    }
}

/// A generated course. Immutable once returned by the generator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Course {
    pub seed: u64,
    pub segments: Vec<SegmentRecord>,
    /// Shape arena; every span indexes into this
    pub shapes: Vec<ShapeDescriptor>,
    /// Obstacle arena, in emission order
    pub obstacles: Vec<ObstaclePlacement>,
    /// Checkpoints after the start, in segment order
    pub checkpoints: Vec<Checkpoint>,
    /// Implicit checkpoint 0 at the end of the start platform
    pub start_checkpoint: Vec3,
    pub start_platform: ArenaSpan,
    pub finish_platform: ArenaSpan,
    /// Final build position, where the finish platform begins
    pub finish_position: Vec3,
}

impl Course {
    /// Where racers spawn
    pub fn start_position(&self) -> Vec3 {
        up(RESPAWN_HEIGHT)
    }

    /// Center of the finish-line trigger
    pub fn finish_trigger_position(&self) -> Vec3 {
        self.finish_position + FINISH_TRIGGER_OFFSET
    }

    /// Respawn points in race order, start checkpoint first
    pub fn respawn_points(&self) -> Vec<Vec3> {
        std::iter::once(self.start_checkpoint)
            .chain(self.checkpoints.iter().map(Checkpoint::respawn_position))
            .collect()
    }

    pub fn shapes_in(&self, span: ArenaSpan) -> &[ShapeDescriptor] {
        &self.shapes[span.range()]
    }

    pub fn obstacles_in(&self, span: ArenaSpan) -> &[ObstaclePlacement] {
        &self.obstacles[span.range()]
    }

    /// Sum of all segment elevation deltas
    pub fn total_elevation(&self) -> f32 {
        self.segments.iter().map(|s| s.elevation).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
