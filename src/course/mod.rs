//! Deterministic course generation
//!
//! Everything in here is a pure function of (config, seed):
//! - Seeded RNG only, one stream, fixed draw order
//! - No rendering, physics, or platform dependencies
//! - Output is plain value data handed to collaborators afterwards

pub mod difficulty;
pub mod generator;
pub mod geometry;
pub mod obstacles;
pub mod random;
pub mod segments;
pub mod select;
pub mod state;

pub use difficulty::{DifficultyCurve, DifficultyTier};
pub use generator::{AssemblerPhase, CourseGenerator};
pub use geometry::{
    ArenaSpan, Oscillation, ShapeDescriptor, ShapeKind, ShapeRole, Surface, Tint, Transform,
};
pub use obstacles::{emit_obstacle, gauntlet_count, populate_gauntlet, populate_standard};
pub use random::CourseRng;
pub use segments::{Population, SegmentBuild, SegmentContext, bridge_width, build_segment};
pub use select::{WeightedTable, pick_obstacle_kind, pick_segment_kind};
pub use state::{
    Checkpoint, Course, ObstacleKind, ObstacleParams, ObstaclePlacement, SegmentKind,
    SegmentRecord,
};
