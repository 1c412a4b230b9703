//! Fall Course - procedural obstacle-course generation for a single race
//!
//! Core modules:
//! - `course`: Deterministic generation (segments, obstacles, checkpoints)
//! - `config`: Generation parameters and surface palette
//! - `emit`: Collaborator interfaces for geometry/physics emitters and checkpoint sinks

pub mod config;
pub mod course;
pub mod emit;

pub use config::{ConfigError, GenerationConfig, MaterialId, MaterialPalette};
pub use course::{
    AssemblerPhase, Checkpoint, Course, CourseGenerator, ObstacleKind, ObstacleParams,
    ObstaclePlacement, SegmentKind, SegmentRecord,
};
pub use emit::{CourseSink, GeometryEmitter, SceneRecorder};

use glam::Vec3;

/// Course layout constants
pub mod consts {
    /// Length of the start and finish platforms along +Z
    pub const START_PLATFORM_LENGTH: f32 = 10.0;
    /// Start/finish platforms are this much wider than a segment
    pub const END_PLATFORM_WIDTH_SCALE: f32 = 1.5;
    /// Height above a build position where racers respawn
    pub const RESPAWN_HEIGHT: f32 = 2.0;
    /// Finish trigger offset from the finish platform origin
    pub const FINISH_TRIGGER_OFFSET: glam::Vec3 = glam::Vec3::new(0.0, 2.0, 5.0);

    /// Per-segment random length perturbation
    pub const LENGTH_JITTER_MIN: f32 = -3.0;
    pub const LENGTH_JITTER_MAX: f32 = 5.0;

    /// Side wall thickness
    pub const WALL_THICKNESS: f32 = 0.5;
    /// Segments narrower than this fraction of nominal width get no walls
    pub const WALL_MIN_WIDTH_FRACTION: f32 = 0.7;

    /// Gauntlet segments are stretched by this factor
    pub const GAUNTLET_STRETCH: f32 = 1.3;
    /// Narrow bridge width at zero and at max difficulty
    pub const BRIDGE_WIDTH_EASY: f32 = 6.0;
    pub const BRIDGE_WIDTH_HARD: f32 = 3.0;

    /// Replacements for non-positive config dimensions
    pub const MIN_SEGMENT_LENGTH: f32 = 6.0;
    /// Floor for a jittered segment length when the base is shorter than the jitter
    pub const MIN_JITTERED_LENGTH: f32 = 0.5;
    pub const MIN_SEGMENT_WIDTH: f32 = 1.0;
    pub const MIN_THICKNESS: f32 = 0.05;
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Offset of `distance` along the course's forward axis (+Z)
#[inline]
pub fn forward(distance: f32) -> Vec3 {
    Vec3::Z * distance
}

/// Offset of `distance` along world up (+Y)
#[inline]
pub fn up(distance: f32) -> Vec3 {
    Vec3::Y * distance
}
