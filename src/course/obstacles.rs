//! Obstacle population and per-type emitters
//!
//! Population decides how many obstacles a segment gets and where they sit;
//! emitters bind difficulty-scaled parameters and build the visual parts.
//! All tuning is linear in difficulty and computed once, here.

use glam::{Quat, Vec3};

use super::geometry::{ShapeDescriptor, ShapeKind, Tint, Transform};
use super::random::CourseRng;
use super::select::pick_obstacle_kind;
use super::state::{ObstacleKind, ObstacleParams, ObstaclePlacement, SegmentKind};

/// Keep standard obstacles this far from segment ends
const END_MARGIN: f32 = 3.0;
/// Lateral spread as a fraction of width
const STANDARD_LATERAL: f32 = 0.35;
const GAUNTLET_LATERAL: f32 = 0.3;

const LAUNCHER_COOLDOWN_SECS: f32 = 0.5;

const BAR_TINT: Tint = [1.0, 0.3, 0.2, 1.0];
const STEEL_TINT: Tint = [0.4, 0.4, 0.4, 1.0];
const ARM_TINT: Tint = [0.5, 0.5, 0.5, 1.0];
const PENDULUM_BALL_TINT: Tint = [1.0, 0.6, 0.1, 1.0];
const BUMPER_TINT: Tint = [1.0, 0.2, 0.6, 1.0];
const BLADE_TINT: Tint = [0.2, 0.8, 1.0, 1.0];
const HUB_TINT: Tint = [0.3, 0.3, 0.3, 1.0];
const PUNCH_TINT: Tint = [0.8, 0.2, 0.2, 1.0];
const ROLLER_TINT: Tint = [0.3, 0.9, 0.3, 1.0];
const LAUNCHER_TINT: Tint = [1.0, 1.0, 0.2, 1.0];

/// Obstacle count for a standard segment: ceil(d) plus zero or one
pub fn standard_count(difficulty: f32, rng: &mut CourseRng) -> usize {
    (difficulty.ceil() as i32 + rng.int_inclusive(0, 1)).max(0) as usize
}

/// Obstacle count for a gauntlet: ceil(2d) + 2
pub fn gauntlet_count(difficulty: f32) -> usize {
    ((difficulty * 2.0).ceil() as i32 + 2).max(0) as usize
}

/// Scatter obstacles within safe margins of a segment
pub fn populate_standard(
    segment: usize,
    kind: SegmentKind,
    length: f32,
    width: f32,
    difficulty: f32,
    rng: &mut CourseRng,
) -> Vec<ObstaclePlacement> {
    let count = standard_count(difficulty, rng);
    let mut placed = Vec::with_capacity(count);

    for _ in 0..count {
        let z = rng.range(END_MARGIN, length - END_MARGIN);
        let x = rng.range(-width * STANDARD_LATERAL, width * STANDARD_LATERAL);
        let obstacle = pick_obstacle_kind(kind, rng);
        placed.push(emit_obstacle(
            segment,
            obstacle,
            Vec3::new(x, 0.0, z),
            width,
            difficulty,
        ));
    }
    placed
}

/// Evenly spaced dense population with randomized lateral offsets
pub fn populate_gauntlet(
    segment: usize,
    length: f32,
    width: f32,
    difficulty: f32,
    rng: &mut CourseRng,
) -> Vec<ObstaclePlacement> {
    let count = gauntlet_count(difficulty);
    let spacing = length / (count + 1) as f32;

    (0..count)
        .map(|i| {
            let z = spacing * (i + 1) as f32;
            let x = rng.range(-width * GAUNTLET_LATERAL, width * GAUNTLET_LATERAL);
            let obstacle = pick_obstacle_kind(SegmentKind::Gauntlet, rng);
            emit_obstacle(segment, obstacle, Vec3::new(x, 0.0, z), width, difficulty)
        })
        .collect()
}

/// Build a placement for `kind` at a ground position
pub fn emit_obstacle(
    segment: usize,
    kind: ObstacleKind,
    position: Vec3,
    width: f32,
    difficulty: f32,
) -> ObstaclePlacement {
    let d = difficulty;
    let (lift, params, parts) = match kind {
        ObstacleKind::SpinningBar => spinning_bar(width, d),
        ObstacleKind::Pendulum => pendulum(d),
        ObstacleKind::Bumper => bumper(d),
        ObstacleKind::Windmill => windmill(d),
        ObstacleKind::PunchWall => punch_wall(width, d),
        ObstacleKind::Roller => roller(width, d),
        ObstacleKind::Launcher => launcher(d),
    };

    ObstaclePlacement {
        kind,
        segment,
        position,
        pivot: position + Vec3::Y * lift,
        params,
        parts,
    }
}

type Emitted = (f32, ObstacleParams, Vec<ShapeDescriptor>);

fn spinning_bar(width: f32, d: f32) -> Emitted {
    let bar_length = (width * 0.8).min(8.0);
    let parts = vec![
        ShapeDescriptor::part(
            "Bar",
            ShapeKind::Cube,
            Transform::new(Vec3::ZERO, Vec3::new(bar_length, 0.6, 0.6)),
            BAR_TINT,
        ),
        ShapeDescriptor::part(
            "Pillar",
            ShapeKind::Cylinder,
            Transform::new(Vec3::new(0.0, -0.6, 0.0), Vec3::new(0.5, 0.6, 0.5)),
            STEEL_TINT,
        ),
    ];
    let params = ObstacleParams::Spin {
        axis: Vec3::Y,
        speed: 50.0 + d * 20.0,
        knockback: 8.0 + d,
        roller: false,
    };
    (1.2, params, parts)
}

fn pendulum(d: f32) -> Emitted {
    let parts = vec![
        ShapeDescriptor::part(
            "Arm",
            ShapeKind::Cube,
            Transform::new(Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.2, 4.0, 0.2)),
            ARM_TINT,
        ),
        ShapeDescriptor::part(
            "Ball",
            ShapeKind::Sphere,
            Transform::new(Vec3::new(0.0, -4.5, 0.0), Vec3::splat(2.0)),
            PENDULUM_BALL_TINT,
        ),
    ];
    let params = ObstacleParams::Swing {
        axis: Vec3::X,
        speed: 1.5 + d * 0.3,
        max_angle: 40.0 + d * 5.0,
        knockback: 10.0 + d * 2.0,
    };
    (6.0, params, parts)
}

fn bumper(d: f32) -> Emitted {
    let parts = vec![ShapeDescriptor::part(
        "Bumper",
        ShapeKind::Cylinder,
        Transform::new(Vec3::ZERO, Vec3::new(1.5, 0.75, 1.5)),
        BUMPER_TINT,
    )];
    (0.75, ObstacleParams::Bounce { force: 12.0 + d * 2.0 }, parts)
}

fn windmill(d: f32) -> Emitted {
    let mut parts: Vec<ShapeDescriptor> = (0..4)
        .map(|i| {
            let rotation = Quat::from_rotation_z((i as f32 * 90.0).to_radians());
            ShapeDescriptor::part(
                &format!("Blade_{}", i),
                ShapeKind::Cube,
                Transform::new(rotation * Vec3::Y * 2.0, Vec3::new(0.8, 3.5, 0.5))
                    .with_rotation(rotation),
                BLADE_TINT,
            )
        })
        .collect();
    parts.push(ShapeDescriptor::part(
        "Hub",
        ShapeKind::Sphere,
        Transform::new(Vec3::ZERO, Vec3::splat(0.8)),
        HUB_TINT,
    ));
    let params = ObstacleParams::Spin {
        axis: Vec3::Z,
        speed: 60.0 + d * 15.0,
        knockback: 10.0,
        roller: false,
    };
    (2.0, params, parts)
}

fn punch_wall(width: f32, d: f32) -> Emitted {
    let parts = vec![ShapeDescriptor::part(
        "PunchWall",
        ShapeKind::Cube,
        Transform::new(Vec3::ZERO, Vec3::new(width * 0.4, 3.0, 0.8)),
        PUNCH_TINT,
    )];
    let params = ObstacleParams::Oscillate {
        travel: Vec3::new(width * 0.3, 0.0, 0.0),
        speed: 1.0 + d * 0.2,
        knockback: 8.0 + d * 2.0,
    };
    (0.0, params, parts)
}

fn roller(width: f32, d: f32) -> Emitted {
    let parts = vec![ShapeDescriptor::part(
        "Roller",
        ShapeKind::Cylinder,
        Transform::new(Vec3::ZERO, Vec3::new(2.0, width * 0.4, 2.0))
            .with_rotation(Quat::from_rotation_z(90f32.to_radians())),
        ROLLER_TINT,
    )];
    let params = ObstacleParams::Spin {
        axis: Vec3::Y,
        speed: 80.0 + d * 10.0,
        knockback: 6.0,
        roller: true,
    };
    (1.0, params, parts)
}

fn launcher(d: f32) -> Emitted {
    let parts = vec![ShapeDescriptor::part(
        "Launcher",
        ShapeKind::Cube,
        Transform::new(Vec3::ZERO, Vec3::new(2.0, 0.5, 2.0)),
        LAUNCHER_TINT,
    )];
    let params = ObstacleParams::Launch {
        force: 15.0 + d * 3.0,
        cooldown: LAUNCHER_COOLDOWN_SECS,
    };
    (0.25, params, parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_count_bounds() {
        let mut rng = CourseRng::new(8);
        for _ in 0..200 {
            let n = standard_count(2.3, &mut rng);
            assert!((3..=4).contains(&n));
        }
    }

    #[test]
    fn test_gauntlet_count_exact() {
        assert_eq!(gauntlet_count(1.0), 4);
        assert_eq!(gauntlet_count(1.5), 5);
        assert_eq!(gauntlet_count(2.2), 7);
    }

    #[test]
    fn test_standard_placements_within_margins() {
        let mut rng = CourseRng::new(21);
        for _ in 0..20 {
            let placed = populate_standard(0, SegmentKind::Straight, 24.0, 12.0, 3.0, &mut rng);
            for p in &placed {
                assert!((3.0..21.0).contains(&p.position.z));
                assert!(p.position.x.abs() <= 12.0 * 0.35);
                assert_eq!(p.position.y, 0.0);
                assert!(matches!(
                    p.kind,
                    ObstacleKind::SpinningBar
                        | ObstacleKind::Bumper
                        | ObstacleKind::Pendulum
                        | ObstacleKind::Windmill
                ));
            }
        }
    }

    #[test]
    fn test_gauntlet_even_spacing() {
        let mut rng = CourseRng::new(5);
        let placed = populate_gauntlet(2, 30.0, 12.0, 2.0, &mut rng);
        assert_eq!(placed.len(), 6);
        let spacing = 30.0 / 7.0;
        for (i, p) in placed.iter().enumerate() {
            assert!((p.position.z - spacing * (i + 1) as f32).abs() < 1e-4);
            assert!(p.position.x.abs() <= 12.0 * 0.3);
            assert_eq!(p.segment, 2);
        }
    }

    #[test]
    fn test_emitter_formulas() {
        let d = 2.0;
        let at = Vec3::new(1.0, 0.0, 5.0);

        let bar = emit_obstacle(0, ObstacleKind::SpinningBar, at, 12.0, d);
        assert_eq!(bar.params.speed(), Some(90.0));
        assert_eq!(bar.params.force(), 10.0);
        assert_eq!(bar.pivot, Vec3::new(1.0, 1.2, 5.0));

        let pend = emit_obstacle(0, ObstacleKind::Pendulum, at, 12.0, d);
        match pend.params {
            ObstacleParams::Swing {
                speed,
                max_angle,
                knockback,
                ..
            } => {
                assert!((speed - 2.1).abs() < 1e-6);
                assert_eq!(max_angle, 50.0);
                assert_eq!(knockback, 14.0);
            }
            other => panic!("unexpected params {:?}", other),
        }

        let bump = emit_obstacle(0, ObstacleKind::Bumper, at, 12.0, d);
        assert_eq!(bump.params, ObstacleParams::Bounce { force: 16.0 });

        let launch = emit_obstacle(0, ObstacleKind::Launcher, at, 12.0, d);
        assert_eq!(
            launch.params,
            ObstacleParams::Launch {
                force: 21.0,
                cooldown: 0.5
            }
        );

        let wind = emit_obstacle(0, ObstacleKind::Windmill, at, 12.0, d);
        assert_eq!(wind.params.speed(), Some(90.0));
        assert_eq!(wind.parts.len(), 5);

        let roll = emit_obstacle(0, ObstacleKind::Roller, at, 12.0, d);
        assert!(matches!(roll.params, ObstacleParams::Spin { roller: true, .. }));

        let punch = emit_obstacle(0, ObstacleKind::PunchWall, at, 10.0, d);
        match punch.params {
            ObstacleParams::Oscillate {
                travel,
                speed,
                knockback,
            } => {
                assert!(travel.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
                assert!((speed - 1.4).abs() < 1e-6);
                assert_eq!(knockback, 12.0);
            }
            other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_bar_length_capped() {
        let wide = emit_obstacle(0, ObstacleKind::SpinningBar, Vec3::ZERO, 20.0, 1.0);
        assert_eq!(wide.parts[0].transform.scale.x, 8.0);
        let narrow = emit_obstacle(0, ObstacleKind::SpinningBar, Vec3::ZERO, 5.0, 1.0);
        assert_eq!(narrow.parts[0].transform.scale.x, 4.0);
    }
}
