//! Course assembler
//!
//! Drives the segment loop, keeps the build cursor and difficulty, and records
//! checkpoints. The whole course is rebuilt from scratch on every call; all
//! randomness comes from one stream in one fixed order:
//! archetype roll, length jitter, builder draws, population draws.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyCurve;
use super::geometry::{
    ArenaSpan, CHECKPOINT_TINT, GOLD_TINT, ResolvedPalette, START_ARCH_TINT, ShapeDescriptor,
    ShapeKind, ShapeRole, Surface, Transform,
};
use super::obstacles::{populate_gauntlet, populate_standard};
use super::random::CourseRng;
use super::segments::{Population, SegmentContext, build_segment};
use super::select::pick_segment_kind;
use super::state::{Checkpoint, Course, SegmentRecord};
use crate::config::GenerationConfig;
use crate::consts::*;
use crate::emit::CourseSink;
use crate::{forward, up};

/// Assembler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssemblerPhase {
    /// No generation in progress
    Idle,
    /// Building segment `index`
    Building { index: u32 },
    /// Emitting the finish platform
    Finishing,
}

/// Mutable bookkeeping for one generation run
#[derive(Debug)]
struct GenerationState {
    build_position: Vec3,
    difficulty: f32,
    course: Course,
}

impl GenerationState {
    fn new(seed: u64, start_difficulty: f32) -> Self {
        Self {
            build_position: Vec3::ZERO,
            difficulty: start_difficulty,
            course: Course {
                seed,
                ..Default::default()
            },
        }
    }

    /// Append shapes to the arena and return their span
    fn push_shapes(&mut self, shapes: impl IntoIterator<Item = ShapeDescriptor>) -> ArenaSpan {
        let start = self.course.shapes.len();
        self.course.shapes.extend(shapes);
        ArenaSpan {
            start,
            len: self.course.shapes.len() - start,
        }
    }
}

/// Procedural course generator
///
/// Owns its config and random stream; hand it a sink with [`publish`](Self::publish)
/// once a course has been generated.
#[derive(Debug)]
pub struct CourseGenerator {
    config: GenerationConfig,
    curve: DifficultyCurve,
    rng: CourseRng,
    phase: AssemblerPhase,
    course: Course,
}

impl CourseGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        let config = config.sanitized();
        Self {
            curve: DifficultyCurve::from_config(&config),
            config,
            rng: CourseRng::new(0),
            phase: AssemblerPhase::Idle,
            course: Course::default(),
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn curve(&self) -> &DifficultyCurve {
        &self.curve
    }

    pub fn phase(&self) -> AssemblerPhase {
        self.phase
    }

    /// Seed used by the most recent generation
    pub fn last_seed(&self) -> u64 {
        self.course.seed
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.course.checkpoints
    }

    pub fn start_position(&self) -> Vec3 {
        self.course.start_position()
    }

    pub fn finish_position(&self) -> Vec3 {
        self.course.finish_position
    }

    /// Discard the current course
    pub fn clear_course(&mut self) {
        self.course = Course::default();
        self.phase = AssemblerPhase::Idle;
    }

    /// Generate a full course. `None` seeds from the clock (not reproducible).
    pub fn generate_course(&mut self, seed: Option<u64>) -> &Course {
        let seed = self.rng.reseed(seed);
        self.clear_course();

        let palette = ResolvedPalette::resolve(&self.config.materials);
        let mut state = GenerationState::new(seed, self.curve.start);

        self.emit_start_platform(&mut state, &palette);
        state.course.start_checkpoint = state.build_position + up(RESPAWN_HEIGHT);

        for i in 0..self.config.segment_count {
            self.phase = AssemblerPhase::Building { index: i };
            self.assemble_segment(&mut state, i, &palette);

            let interval = self.config.checkpoint_interval;
            if interval > 0 && (i + 1) % interval == 0 {
                self.record_checkpoint(&mut state, i as usize);
            }

            // Next segment sees the value for this index
            state.difficulty = self.curve.at(i);
        }

        self.phase = AssemblerPhase::Finishing;
        self.emit_finish_platform(&mut state, &palette);

        let course = state.course;
        log::info!(
            "Generated course seed={} segments={} obstacles={} checkpoints={} finish={:?}",
            seed,
            course.segments.len(),
            course.obstacles.len(),
            course.checkpoints.len(),
            course.finish_position
        );

        self.course = course;
        self.phase = AssemblerPhase::Idle;
        &self.course
    }

    /// Hand checkpoints and finish to the race-state collaborator
    pub fn publish<S: CourseSink>(&self, sink: &mut S) {
        sink.wire_checkpoints(self.course.start_checkpoint, &self.course.checkpoints);
        sink.wire_finish(
            self.course.finish_position,
            self.course.finish_trigger_position(),
        );
    }

    fn assemble_segment(&mut self, state: &mut GenerationState, i: u32, palette: &ResolvedPalette) {
        let index = i as usize;
        let difficulty = state.difficulty;
        let kind = pick_segment_kind(difficulty, &mut self.rng);

        let jitter = self.rng.range(LENGTH_JITTER_MIN, LENGTH_JITTER_MAX);
        let length = (self.config.base_segment_length + jitter).max(MIN_JITTERED_LENGTH);

        let ctx = SegmentContext {
            index,
            length,
            difficulty,
            config: &self.config,
            palette,
        };
        let build = build_segment(kind, &ctx, &mut self.rng);

        let obstacles = match build.population {
            Population::None => Vec::new(),
            Population::Standard { length, width } => {
                populate_standard(index, kind, length, width, difficulty, &mut self.rng)
            }
            Population::Gauntlet { length, width } => {
                populate_gauntlet(index, length, width, difficulty, &mut self.rng)
            }
        };

        let start = state.build_position;
        let geometry = state.push_shapes(build.shapes);
        let obstacle_start = state.course.obstacles.len();
        state.course.obstacles.extend(obstacles);
        let obstacle_span = ArenaSpan {
            start: obstacle_start,
            len: state.course.obstacles.len() - obstacle_start,
        };

        state.build_position += up(build.elevation) + forward(build.length);

        log::debug!(
            "Segment {} {} d={:.2} len={:.2} dy={:.2} obstacles={}",
            index,
            kind.as_str(),
            difficulty,
            build.length,
            build.elevation,
            obstacle_span.len
        );

        state.course.segments.push(SegmentRecord {
            index,
            kind,
            start,
            end: state.build_position,
            length: build.length,
            width: build.width,
            elevation: build.elevation,
            difficulty,
            geometry,
            obstacles: obstacle_span,
        });
    }

    fn record_checkpoint(&self, state: &mut GenerationState, after_segment: usize) {
        let width = self.config.segment_width;
        let markers = state.push_shapes([
            ShapeDescriptor::new(
                "CheckpointRing",
                ShapeKind::Cylinder,
                Transform::new(up(3.0), Vec3::new(3.0, 0.1, 3.0)),
                Surface::Tint(CHECKPOINT_TINT),
                ShapeRole::Decoration,
            ),
            ShapeDescriptor::new(
                "CheckpointTrigger",
                ShapeKind::Trigger,
                Transform::new(Vec3::ZERO, Vec3::new(width, 4.0, 2.0)),
                Surface::Tint(CHECKPOINT_TINT),
                ShapeRole::Checkpoint,
            ),
        ]);

        log::debug!(
            "Checkpoint {} after segment {} at {:?}",
            state.course.checkpoints.len() + 1,
            after_segment,
            state.build_position
        );

        state.course.checkpoints.push(Checkpoint {
            after_segment,
            position: state.build_position,
            markers,
        });
    }

    fn emit_start_platform(&self, state: &mut GenerationState, palette: &ResolvedPalette) {
        let cfg = &self.config;
        let width = cfg.segment_width * END_PLATFORM_WIDTH_SCALE;
        let half = START_PLATFORM_LENGTH / 2.0;
        let wall_x = width / 2.0 + WALL_THICKNESS / 2.0;
        let wall_scale = Vec3::new(WALL_THICKNESS, 4.0, START_PLATFORM_LENGTH);

        state.course.start_platform = state.push_shapes([
            ShapeDescriptor::platform(
                Vec3::new(0.0, 0.0, half),
                Vec3::new(width, cfg.platform_thickness, START_PLATFORM_LENGTH),
                palette.floor(0),
            ),
            ShapeDescriptor::wall(
                Vec3::new(-wall_x, 2.0, half),
                wall_scale,
                palette.wall,
            ),
            ShapeDescriptor::wall(
                Vec3::new(wall_x, 2.0, half),
                wall_scale,
                palette.wall,
            ),
            ShapeDescriptor::new(
                "StartArch",
                ShapeKind::Cube,
                Transform::new(Vec3::new(0.0, 5.0, 1.0), Vec3::new(width, 1.0, 0.5)),
                Surface::Tint(START_ARCH_TINT),
                ShapeRole::Decoration,
            ),
        ]);

        state.build_position += forward(START_PLATFORM_LENGTH);
    }

    fn emit_finish_platform(&self, state: &mut GenerationState, palette: &ResolvedPalette) {
        let cfg = &self.config;
        let width = cfg.segment_width * END_PLATFORM_WIDTH_SCALE;
        let half = START_PLATFORM_LENGTH / 2.0;
        let pillar_x = width / 2.0;

        let mut shapes = vec![
            ShapeDescriptor::platform(
                Vec3::new(0.0, 0.0, half),
                Vec3::new(width, cfg.platform_thickness, START_PLATFORM_LENGTH),
                palette.finish,
            ),
            ShapeDescriptor::new(
                "FinishTrigger",
                ShapeKind::Trigger,
                Transform::new(FINISH_TRIGGER_OFFSET, Vec3::new(width, 4.0, 1.0)),
                palette.finish,
                ShapeRole::FinishLine,
            ),
            ShapeDescriptor::new(
                "FinishArch",
                ShapeKind::Cube,
                Transform::new(Vec3::new(0.0, 5.0, half), Vec3::new(width, 1.0, 0.5)),
                Surface::Tint(GOLD_TINT),
                ShapeRole::Decoration,
            ),
        ];
        for side in [-1.0, 1.0] {
            shapes.push(ShapeDescriptor::new(
                "FinishPillar",
                ShapeKind::Cylinder,
                Transform::new(
                    Vec3::new(side * pillar_x, 2.5, half),
                    Vec3::new(0.6, 2.5, 0.6),
                ),
                Surface::Tint(GOLD_TINT),
                ShapeRole::Decoration,
            ));
        }

        state.course.finish_platform = state.push_shapes(shapes);
        state.course.finish_position = state.build_position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::state::SegmentKind;

    fn generator(segments: u32) -> CourseGenerator {
        CourseGenerator::new(GenerationConfig::default().with_segment_count(segments))
    }

    #[test]
    fn test_same_seed_same_course() {
        let mut a = generator(12);
        let mut b = generator(12);
        assert_eq!(a.generate_course(Some(777)), b.generate_course(Some(777)));
    }

    #[test]
    fn test_regeneration_replaces_course() {
        let mut gen_ = generator(6);
        let first = gen_.generate_course(Some(1)).clone();
        gen_.generate_course(Some(2));
        let again = gen_.generate_course(Some(1)).clone();
        assert_eq!(first, again);
    }

    #[test]
    fn test_zero_segments_has_start_and_finish() {
        let mut gen_ = generator(0);
        let course = gen_.generate_course(Some(3));
        assert!(course.segments.is_empty());
        assert!(course.checkpoints.is_empty());
        assert_eq!(course.start_platform.len, 4);
        assert_eq!(course.finish_platform.len, 5);
        assert_eq!(course.finish_position, Vec3::new(0.0, 0.0, START_PLATFORM_LENGTH));
    }

    #[test]
    fn test_segments_chain_end_to_start() {
        let mut gen_ = generator(10);
        let course = gen_.generate_course(Some(55));
        assert_eq!(course.segments[0].start, forward(START_PLATFORM_LENGTH));
        for pair in course.segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for seg in &course.segments {
            let expected = seg.start + forward(seg.length) + up(seg.elevation);
            assert!(seg.end.abs_diff_eq(expected, 1e-4));
        }
        let last = course.segments.last().unwrap();
        assert_eq!(course.finish_position, last.end);
    }

    #[test]
    fn test_difficulty_lags_one_segment() {
        let mut gen_ = generator(8);
        let curve = *gen_.curve();
        let course = gen_.generate_course(Some(9));
        assert_eq!(course.segments[0].difficulty, curve.start);
        for i in 1..course.segments.len() {
            assert_eq!(course.segments[i].difficulty, curve.at(i as u32 - 1));
        }
        // Lag means the first two segments share the start difficulty
        assert_eq!(course.segments[1].difficulty, course.segments[0].difficulty);
    }

    #[test]
    fn test_short_base_length_keeps_full_jitter() {
        let config = GenerationConfig {
            base_segment_length: 8.0,
            segment_count: 200,
            ..Default::default()
        };
        let mut gen_ = CourseGenerator::new(config);
        assert_eq!(gen_.config().base_segment_length, 8.0);

        let course = gen_.generate_course(Some(31));
        let mut below_six = 0;
        for seg in &course.segments {
            let raw = match seg.kind {
                SegmentKind::Gauntlet => seg.length / GAUNTLET_STRETCH,
                _ => seg.length,
            };
            assert!(raw >= 5.0 - 1e-4 && raw < 13.0 + 1e-4, "length {}", raw);
            if raw < 6.0 {
                below_six += 1;
            }
        }
        assert!(below_six > 0);

        let pinned = course.segments.iter().filter(|s| s.length == 6.0).count();
        assert!(pinned < 5);
    }

    #[test]
    fn test_base_length_shorter_than_margins() {
        let config = GenerationConfig {
            base_segment_length: 4.0,
            segment_count: 40,
            ..Default::default()
        };
        let mut gen_ = CourseGenerator::new(config);
        assert_eq!(gen_.config().base_segment_length, 4.0);

        let course = gen_.generate_course(Some(8));
        for seg in &course.segments {
            assert!(seg.length.is_finite() && seg.length > 0.0);
            assert!(seg.end.z > seg.start.z);
        }
    }

    #[test]
    fn test_ramp_and_platform_skip_population() {
        let mut gen_ = generator(40);
        let course = gen_.generate_course(Some(2024));
        for seg in &course.segments {
            if matches!(
                seg.kind,
                SegmentKind::Ramp | SegmentKind::Platform | SegmentKind::TumblingBlocks
            ) {
                assert!(seg.obstacles.is_empty(), "{:?} got obstacles", seg.kind);
            }
        }
    }

    #[test]
    fn test_obstacles_reference_their_segment() {
        let mut gen_ = generator(20);
        let course = gen_.generate_course(Some(31));
        for seg in &course.segments {
            for obstacle in course.obstacles_in(seg.obstacles) {
                assert_eq!(obstacle.segment, seg.index);
                assert_eq!(obstacle.position.y, 0.0);
            }
        }
    }

    #[test]
    fn test_checkpoint_interval_zero_disables_checkpoints() {
        let mut gen_ = CourseGenerator::new(
            GenerationConfig::default()
                .with_segment_count(9)
                .with_checkpoint_interval(0),
        );
        assert!(gen_.generate_course(Some(4)).checkpoints.is_empty());
    }

    #[test]
    fn test_clear_course_resets() {
        let mut gen_ = generator(5);
        gen_.generate_course(Some(8));
        gen_.clear_course();
        assert!(gen_.course().is_empty());
        assert!(gen_.checkpoints().is_empty());
        assert_eq!(gen_.phase(), AssemblerPhase::Idle);
    }

    #[test]
    fn test_phase_idle_after_generation() {
        let mut gen_ = generator(3);
        gen_.generate_course(None);
        assert_eq!(gen_.phase(), AssemblerPhase::Idle);
        assert_eq!(gen_.start_position(), Vec3::new(0.0, 2.0, 0.0));
    }
}
