//! Segment builders
//!
//! One builder per archetype. Each takes the jittered length, nominal width and
//! current difficulty, draws what it needs from the stream, and returns its
//! geometry plus how (if at all) the segment should be populated.

use glam::{Quat, Vec3};

use super::geometry::{
    FALLING_BLOCK_TINT, Oscillation, ResolvedPalette, ShapeDescriptor, ShapeKind, ShapeRole,
    Surface, Transform, side_walls,
};
use super::random::CourseRng;
use super::state::SegmentKind;
use crate::config::GenerationConfig;
use crate::consts::*;
use crate::lerp;

/// Tumbling block timings
const FALLING_WARNING_SECS: f32 = 1.5;
const FALLING_RESPAWN_SECS: f32 = 3.0;

/// Lift above the floor for slime patches (avoids z-fighting)
const SLIME_LIFT: f32 = 0.02;
const SLIME_THICKNESS: f32 = 0.05;

/// Inputs shared by every builder
#[derive(Debug, Clone, Copy)]
pub struct SegmentContext<'a> {
    pub index: usize,
    /// Jittered length for this segment
    pub length: f32,
    pub difficulty: f32,
    pub config: &'a GenerationConfig,
    pub palette: &'a ResolvedPalette,
}

impl SegmentContext<'_> {
    fn width(&self) -> f32 {
        self.config.segment_width
    }

    fn floor(&self) -> Surface {
        self.palette.floor(self.index)
    }
}

/// How the assembler should fill a built segment with obstacles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Population {
    /// Builder handled its own contents
    None,
    Standard { length: f32, width: f32 },
    /// Dense, evenly spaced
    Gauntlet { length: f32, width: f32 },
}

/// Builder output
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentBuild {
    pub shapes: Vec<ShapeDescriptor>,
    /// Forward advance (may differ from the input length)
    pub length: f32,
    pub width: f32,
    pub elevation: f32,
    pub population: Population,
}

impl SegmentBuild {
    fn flat(shapes: Vec<ShapeDescriptor>, length: f32, width: f32, population: Population) -> Self {
        Self {
            shapes,
            length,
            width,
            elevation: 0.0,
            population,
        }
    }
}

/// Build one segment of `kind`
pub fn build_segment(kind: SegmentKind, ctx: &SegmentContext, rng: &mut CourseRng) -> SegmentBuild {
    match kind {
        SegmentKind::Straight => build_straight(ctx),
        SegmentKind::Ramp => build_ramp(ctx, rng),
        SegmentKind::NarrowBridge => build_narrow_bridge(ctx),
        SegmentKind::Platform => build_platforms(ctx, rng),
        SegmentKind::Gauntlet => build_gauntlet(ctx),
        SegmentKind::SlidingFloor => build_sliding_floor(ctx, rng),
        SegmentKind::TumblingBlocks => build_tumbling_blocks(ctx, rng),
    }
}

/// Floor slab plus walls when the floor is wide enough
fn straight_floor(ctx: &SegmentContext, length: f32, width: f32) -> Vec<ShapeDescriptor> {
    let cfg = ctx.config;
    let mut shapes = vec![ShapeDescriptor::platform(
        Vec3::new(0.0, 0.0, length / 2.0),
        Vec3::new(width, cfg.platform_thickness, length),
        ctx.floor(),
    )];

    if width >= cfg.segment_width * WALL_MIN_WIDTH_FRACTION {
        shapes.extend(side_walls(
            width,
            length,
            cfg.wall_height,
            0.0,
            0.0,
            ctx.palette.wall,
        ));
    }
    shapes
}

fn build_straight(ctx: &SegmentContext) -> SegmentBuild {
    let (length, width) = (ctx.length, ctx.width());
    SegmentBuild::flat(
        straight_floor(ctx, length, width),
        length,
        width,
        Population::Standard { length, width },
    )
}

fn build_ramp(ctx: &SegmentContext, rng: &mut CourseRng) -> SegmentBuild {
    let cfg = ctx.config;
    let (length, width) = (ctx.length, ctx.width());

    let magnitude = rng.range(2.0, 5.0);
    let height = if rng.uniform01() > 0.5 {
        magnitude
    } else {
        -magnitude
    };

    // Pitched so the far end sits `height` above the near end
    let pitch = height.atan2(length);
    let floor = ShapeDescriptor::platform(
        Vec3::new(0.0, height / 2.0, length / 2.0),
        Vec3::new(width, cfg.platform_thickness, length.hypot(height)),
        ctx.floor(),
    )
    .with_rotation(Quat::from_rotation_x(-pitch));

    let mut shapes = vec![floor];
    shapes.extend(side_walls(
        width,
        length,
        cfg.wall_height,
        height / 2.0,
        height.abs(),
        ctx.palette.wall,
    ));

    SegmentBuild {
        shapes,
        length,
        width,
        elevation: height,
        population: Population::None,
    }
}

/// Width of a narrow bridge at `difficulty`
pub fn bridge_width(difficulty: f32, max_difficulty: f32) -> f32 {
    let t = if max_difficulty > 0.0 {
        difficulty / max_difficulty
    } else {
        1.0
    };
    lerp(BRIDGE_WIDTH_EASY, BRIDGE_WIDTH_HARD, t)
}

fn build_narrow_bridge(ctx: &SegmentContext) -> SegmentBuild {
    let length = ctx.length;
    let width = bridge_width(ctx.difficulty, ctx.config.max_difficulty);
    SegmentBuild::flat(
        straight_floor(ctx, length, width),
        length,
        width,
        Population::Standard { length, width },
    )
}

fn build_platforms(ctx: &SegmentContext, rng: &mut CourseRng) -> SegmentBuild {
    let cfg = ctx.config;
    let (length, width) = (ctx.length, ctx.width());

    let count = rng.int_inclusive(3, 5);
    let spacing = length / count as f32;
    let gap = rng.range(1.5, 3.0);
    let depth = (spacing - gap).max(MIN_THICKNESS);

    let mut shapes = Vec::with_capacity(count as usize);
    for i in 0..count {
        let platform_width = rng.range(3.0, width * 0.6);
        let x = rng.range(-width * 0.3, width * 0.3);
        let z = i as f32 * spacing + spacing * 0.5;
        let y = rng.range(-0.5, 1.5);

        let mut platform = ShapeDescriptor::platform(
            Vec3::new(x, y, z),
            Vec3::new(platform_width, cfg.platform_thickness, depth),
            ctx.floor(),
        );

        // The roll is always taken so the stream stays aligned across difficulties
        let moving = rng.uniform01() > 0.5 && ctx.difficulty > 1.5;
        if moving {
            let amplitude = Vec3::new(rng.range(-2.0, 2.0), rng.range(-0.5, 0.5), 0.0);
            let period = rng.range(1.5, 3.0);
            platform = platform.with_role(ShapeRole::MovingPlatform(Oscillation {
                amplitude,
                period,
            }));
        }
        shapes.push(platform);
    }

    SegmentBuild::flat(shapes, length, width, Population::None)
}

fn build_gauntlet(ctx: &SegmentContext) -> SegmentBuild {
    let length = ctx.length * GAUNTLET_STRETCH;
    let width = ctx.width();
    SegmentBuild::flat(
        straight_floor(ctx, length, width),
        length,
        width,
        Population::Gauntlet { length, width },
    )
}

fn build_sliding_floor(ctx: &SegmentContext, rng: &mut CourseRng) -> SegmentBuild {
    let cfg = ctx.config;
    let (length, width) = (ctx.length, ctx.width());
    let mut shapes = straight_floor(ctx, length, width);

    let zones = rng.int_inclusive(2, 3);
    for _ in 0..zones {
        let z = rng.range(2.0, length - 2.0);
        let zone_length = rng.range(3.0, 6.0);
        let zone_width = rng.range(width * 0.4, width * 0.8);
        let x = rng.range(-width * 0.2, width * 0.2);

        shapes.push(ShapeDescriptor::new(
            "SlimeZone",
            ShapeKind::Slab,
            Transform::new(
                Vec3::new(x, cfg.platform_thickness * 0.5 + SLIME_LIFT, z),
                Vec3::new(zone_width, SLIME_THICKNESS, zone_length),
            ),
            ctx.palette.slime,
            ShapeRole::SlimeZone,
        ));
    }

    SegmentBuild::flat(shapes, length, width, Population::Standard { length, width })
}

fn build_tumbling_blocks(ctx: &SegmentContext, rng: &mut CourseRng) -> SegmentBuild {
    let (length, width) = (ctx.length, ctx.width());
    let mut shapes = straight_floor(ctx, length, width);

    let blocks = ctx.difficulty.ceil() as i32 + 1;
    for _ in 0..blocks {
        let z = rng.range(3.0, length - 3.0);
        let x = rng.range(-width * 0.3, width * 0.3);
        let size = rng.range(1.5, 3.0);

        shapes.push(ShapeDescriptor::new(
            "FallingBlock",
            ShapeKind::Cube,
            Transform::new(Vec3::new(x, size * 3.0, z), Vec3::splat(size)),
            Surface::Tint(FALLING_BLOCK_TINT),
            ShapeRole::FallingBlock {
                warning: FALLING_WARNING_SECS,
                respawn_delay: FALLING_RESPAWN_SECS,
                respawns: true,
            },
        ));
    }

    SegmentBuild::flat(shapes, length, width, Population::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaterialPalette;

    fn build(kind: SegmentKind, difficulty: f32, seed: u64) -> SegmentBuild {
        let config = GenerationConfig::default();
        let palette = ResolvedPalette::resolve(&MaterialPalette::default());
        let ctx = SegmentContext {
            index: 0,
            length: 20.0,
            difficulty,
            config: &config,
            palette: &palette,
        };
        build_segment(kind, &ctx, &mut CourseRng::new(seed))
    }

    fn count_role(build: &SegmentBuild, pred: impl Fn(&ShapeRole) -> bool) -> usize {
        build.shapes.iter().filter(|s| pred(&s.role)).count()
    }

    #[test]
    fn test_straight_has_floor_and_walls() {
        let b = build(SegmentKind::Straight, 1.0, 1);
        assert_eq!(b.shapes.len(), 3);
        assert_eq!(b.shapes[0].transform.scale, Vec3::new(12.0, 1.0, 20.0));
        assert_eq!(count_role(&b, |r| *r == ShapeRole::Wall), 2);
        assert_eq!(b.elevation, 0.0);
        assert_eq!(
            b.population,
            Population::Standard {
                length: 20.0,
                width: 12.0
            }
        );
    }

    #[test]
    fn test_ramp_elevation_in_range() {
        for seed in 0..50 {
            let b = build(SegmentKind::Ramp, 1.0, seed);
            let h = b.elevation.abs();
            assert!((2.0..5.0).contains(&h), "ramp height {}", b.elevation);
            assert_eq!(b.population, Population::None);
            assert_eq!(b.shapes[1].transform.scale.y, 4.0 + h);
        }
    }

    #[test]
    fn test_ramps_go_both_ways() {
        let signs: Vec<bool> = (0..40)
            .map(|seed| build(SegmentKind::Ramp, 1.0, seed).elevation > 0.0)
            .collect();
        assert!(signs.contains(&true));
        assert!(signs.contains(&false));
    }

    #[test]
    fn test_bridge_narrows_with_difficulty() {
        assert_eq!(bridge_width(0.0, 5.0), 6.0);
        assert_eq!(bridge_width(5.0, 5.0), 3.0);
        assert!((bridge_width(2.5, 5.0) - 4.5).abs() < 1e-6);

        let b = build(SegmentKind::NarrowBridge, 5.0, 1);
        assert_eq!(b.width, 3.0);
        // Too narrow for walls
        assert_eq!(b.shapes.len(), 1);
    }

    #[test]
    fn test_platform_count_and_spacing() {
        for seed in 0..30 {
            let b = build(SegmentKind::Platform, 1.0, seed);
            let n = b.shapes.len();
            assert!((3..=5).contains(&n));
            let spacing = 20.0 / n as f32;
            for (i, shape) in b.shapes.iter().enumerate() {
                let z = shape.transform.position.z;
                assert!((z - (i as f32 * spacing + spacing * 0.5)).abs() < 1e-4);
                let y = shape.transform.position.y;
                assert!((-0.5..1.5).contains(&y));
            }
        }
    }

    #[test]
    fn test_easy_platforms_never_move() {
        for seed in 0..30 {
            let b = build(SegmentKind::Platform, 1.5, seed);
            assert_eq!(count_role(&b, |r| matches!(r, ShapeRole::MovingPlatform(_))), 0);
        }
    }

    #[test]
    fn test_hard_platforms_sometimes_move() {
        let moving: usize = (0..30)
            .map(|seed| {
                let b = build(SegmentKind::Platform, 3.0, seed);
                count_role(&b, |r| matches!(r, ShapeRole::MovingPlatform(_)))
            })
            .sum();
        assert!(moving > 0);
    }

    #[test]
    fn test_gauntlet_stretches_length() {
        let b = build(SegmentKind::Gauntlet, 2.0, 1);
        assert!((b.length - 26.0).abs() < 1e-4);
        assert_eq!(
            b.population,
            Population::Gauntlet {
                length: b.length,
                width: 12.0
            }
        );
    }

    #[test]
    fn test_sliding_floor_zones() {
        let b = build(SegmentKind::SlidingFloor, 1.0, 4);
        let zones = count_role(&b, |r| *r == ShapeRole::SlimeZone);
        assert!((2..=3).contains(&zones));
        assert!(matches!(b.population, Population::Standard { .. }));
    }

    #[test]
    fn test_tumbling_block_count() {
        let b = build(SegmentKind::TumblingBlocks, 2.5, 9);
        let blocks = count_role(&b, |r| matches!(r, ShapeRole::FallingBlock { .. }));
        assert_eq!(blocks, 4);
        assert_eq!(b.population, Population::None);
        for shape in b.shapes.iter().filter(|s| s.name == "FallingBlock") {
            assert!((shape.transform.position.y - shape.transform.scale.x * 3.0).abs() < 1e-5);
        }
    }
}
